//! Application settings and their persistence.
//!
//! [`Settings`] is the value the window shell owns. [`codec`] turns it into the
//! line-oriented `key=value` text format and back, and [`ConfigStore`] moves
//! that text to and from disk through any [`IoBackend`](crate::backend::IoBackend).

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod codec;
pub mod store;

pub use codec::{decode, decode_into, encode};
pub use store::ConfigStore;

/// Largest grid the shell can draw
pub const MAX_GRID: i32 = 30;

/// 8-bit RGB color triple
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}

/// Persisted window and grid configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Cells per side, always within `1..=MAX_GRID` after a load
    pub grid_size: i32,
    pub window_width: i32,
    pub window_height: i32,
    pub background_color: Rgb,
    pub grid_color: Rgb,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: 10,
            window_width: 320,
            window_height: 240,
            background_color: Rgb::new(0, 0, 255),
            grid_color: Rgb::new(255, 0, 0),
        }
    }
}

impl Settings {
    /// Force `grid_size` into `1..=MAX_GRID`.
    pub fn clamp_grid_size(&mut self) {
        self.grid_size = self.grid_size.clamp(1, MAX_GRID);
    }

    /// Apply a grid size given on the command line.
    ///
    /// Out-of-range overrides are ignored rather than clamped. Returns whether
    /// the override took effect.
    pub fn apply_grid_override(&mut self, grid_size: i32) -> bool {
        if (1..=MAX_GRID).contains(&grid_size) {
            self.grid_size = grid_size;
            true
        } else {
            false
        }
    }
}

use anyhow::Result;
use file_io_benchmark::{ConfigStore, IoMethod, Rgb, Settings};
use tempfile::tempdir;

/// A first launch with no config file starts from the defaults for every method.
#[test]
fn missing_config_falls_back_to_defaults() -> Result<()> {
    let dir = tempdir()?;
    let store = ConfigStore::new(dir.path().join("config.txt"));

    for method in IoMethod::ALL {
        assert_eq!(store.load(method), Settings::default(), "{}", method);
        assert!(store.try_load(method).is_err());
    }
    Ok(())
}

/// Startup/shutdown cycle: load, override the grid, save, and load again
/// through a different method.
#[test]
fn settings_survive_a_session() -> Result<()> {
    let dir = tempdir()?;
    let store = ConfigStore::new(dir.path().join("config.txt"));

    let mut settings = store.load(IoMethod::BufferedStdio);
    assert!(settings.apply_grid_override(25));
    assert!(!settings.apply_grid_override(31));
    settings.window_width = 640;
    settings.window_height = 480;
    settings.grid_color = Rgb::new(12, 200, 7);
    store.save(IoMethod::BufferedStdio, &settings)?;

    let reloaded = store.load(IoMethod::DirectRaw);
    assert_eq!(reloaded, settings);
    assert_eq!(reloaded.grid_size, 25);
    Ok(())
}

#[test]
fn saved_file_uses_fixed_key_order() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.txt");
    let store = ConfigStore::new(&path);

    store.save(IoMethod::MemoryMapped, &Settings::default())?;

    let text = std::fs::read_to_string(&path)?;
    let keys: Vec<&str> = text
        .lines()
        .filter_map(|line| line.split_once('=').map(|(key, _)| key))
        .collect();
    assert_eq!(
        keys,
        vec![
            "gridSize",
            "windowWidth",
            "windowHeight",
            "bgColor",
            "gridColor"
        ]
    );
    assert!(text.contains("bgColor=0 0 255"));
    Ok(())
}

/// Hand-edited files: CRLF endings, unknown keys and an out-of-range grid.
#[test]
fn hand_edited_config_is_tolerated() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.txt");
    std::fs::write(
        &path,
        "theme=dark\r\ngridSize=999\r\nwindowWidth=800\r\n\r\ngarbage line\r\ngridColor=1 2 3\r\n",
    )?;

    let settings = ConfigStore::new(&path).load(IoMethod::StreamIo);

    assert_eq!(settings.grid_size, 30);
    assert_eq!(settings.window_width, 800);
    assert_eq!(settings.window_height, 240);
    assert_eq!(settings.grid_color, Rgb::new(1, 2, 3));
    assert_eq!(settings.background_color, Rgb::new(0, 0, 255));
    Ok(())
}

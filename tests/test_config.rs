use std::path::PathBuf;

use knob_invaders::config::*;
use knob_invaders::error::ConfigError;

#[test]
fn defaults_are_valid() {
    let config = GameConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.players, 1);
    assert_eq!((config.formation.rows, config.formation.cols), (5, 10));
    assert_eq!(config.pools.player_bullets, 10);
    assert_eq!(config.pools.enemy_bullets, 5);
    assert!(config.assets.sprite_dir.is_none());
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let config = GameConfig::from_toml(
        r#"
        players = 2
        seed = 7

        [formation]
        rows = 3

        [assets]
        sprite_dir = "art"
        "#,
    )
    .unwrap();
    assert_eq!(config.players, 2);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.formation.rows, 3);
    assert_eq!(config.formation.cols, 10);
    assert_eq!(config.pools.enemy_bullets, 5);
    assert_eq!(config.assets.sprite_dir, Some(PathBuf::from("art")));
}

#[test]
fn empty_toml_is_default() {
    assert_eq!(GameConfig::from_toml("").unwrap(), GameConfig::default());
}

#[test]
fn syntax_error_is_parse_error() {
    assert!(matches!(
        GameConfig::from_toml("players = = 2"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn out_of_range_values_are_rejected() {
    let cases = [
        ("players = 0", "players"),
        ("players = 3", "players"),
        ("[formation]\nrows = 0", "formation.rows"),
        ("[formation]\nrows = 7", "formation.rows"),
        ("[formation]\ncols = 12", "formation.cols"),
        ("[pools]\nplayer_bullets = 0", "pools.player_bullets"),
        ("[pools]\nenemy_bullets = 17", "pools.enemy_bullets"),
    ];
    for (text, expected) in cases {
        match GameConfig::from_toml(text) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected, "{text}"),
            other => panic!("{text}: expected invalid {expected}, got {other:?}"),
        }
    }
}

#[test]
fn limits_are_accepted() {
    let text = format!(
        "players = 2\n[formation]\nrows = {MAX_ROWS}\ncols = {MAX_COLS}\n[pools]\nplayer_bullets = {MAX_POOL}\nenemy_bullets = 1\n"
    );
    assert!(GameConfig::from_toml(&text).is_ok());
}

#[test]
fn load_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let (config, source) = GameConfig::load(&path).unwrap();
    assert_eq!(config, GameConfig::default());
    assert_eq!(source, ConfigSource::Defaults(path.clone()));
    assert_eq!(
        source.to_string(),
        format!("no config at {}, using defaults", path.display())
    );
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.toml");
    std::fs::write(&path, "high_score_file = \"best.txt\"\n").unwrap();
    let (config, source) = GameConfig::load(&path).unwrap();
    assert_eq!(config.high_score_file, PathBuf::from("best.txt"));
    assert_eq!(source, ConfigSource::File(path.clone()));
}

#[test]
fn load_invalid_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.toml");
    std::fs::write(&path, "players = 9\n").unwrap();
    assert!(matches!(
        GameConfig::load(&path),
        Err(ConfigError::Invalid { field: "players", .. })
    ));
}

use gavelbox::Config;

const FIXTURES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

#[test]
fn load_valid_config() {
    let path = format!("{FIXTURES_PATH}/configs/valid_full.toml");
    let config = Config::from_file(&path).expect("failed to load config");

    assert!(config.languages.contains_key("python"));
    assert!(config.languages.contains_key("java"));
    assert_eq!(config.default_limits.time_limit_ms, Some(10_000));
    assert_eq!(config.efficiency.optimal_ms, 1_000);
}

#[test]
fn load_minimal_config() {
    let path = format!("{FIXTURES_PATH}/configs/valid_minimal.toml");
    let config = Config::from_file(&path).expect("failed to load config");

    assert!(config.languages.contains_key("test"));
}

#[test]
fn load_invalid_source_name() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_source_name.toml");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn load_missing_file() {
    let path = format!("{FIXTURES_PATH}/configs/does_not_exist.toml");
    assert!(Config::from_file(&path).is_err());
}

use cntrl::core::config::Config;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_load_missing_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.yaml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Cntrl").join("config.yaml");

    let mut config = Config::default();
    config.display.hostname = "ROG-GT502".to_string();
    config.features.enable_shutdown = true;
    config.stats.disk_cache_seconds = 120;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.hostname_override(), Some("ROG-GT502"));
    assert_eq!(loaded.stats.disk_cache_ttl(), Duration::from_secs(120));
}

#[test]
fn test_config_partial_file_merges_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(
        &path,
        "features:\n  enable_media: false\nstats:\n  gpu_enabled: false\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(!config.features.enable_media);
    assert!(!config.stats.gpu_enabled);
    assert!(config.features.enable_processes);
    assert!(!config.features.enable_shutdown);
    assert_eq!(config.server.port, 9990);
    assert_eq!(config.stats.disk_cache_seconds, 30);
}

#[test]
fn test_config_invalid_yaml_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "features: [not, a, map").unwrap();

    assert!(Config::load_from(&path).is_err());
}

#[test]
fn test_create_default_never_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");

    assert!(Config::create_default(&path).unwrap());
    fs::write(&path, "display:\n  hostname: kept\n").unwrap();
    assert!(!Config::create_default(&path).unwrap());

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.display.hostname, "kept");
}

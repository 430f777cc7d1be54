//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use aoview::config::AppConfig;
use aoview_core::ShapeTemplate;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("AOV_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("AOV_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_env_override_numeric() {
    std::env::set_var("AOV_SAMPLER__SAMPLE_COUNT", "64");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.sampler.sample_count, 64);
    // Untouched keys keep their file or default values
    assert_eq!(config.sampler.throttle_ms, 100);
    std::env::remove_var("AOV_SAMPLER__SAMPLE_COUNT");
}

#[test]
#[serial]
fn test_default_file_matches_builtin_defaults() {
    std::env::remove_var("AOV_WINDOW__TITLE");

    let config = AppConfig::load().unwrap();
    let builtin = AppConfig::default();
    assert_eq!(config.camera.initial_zoom, builtin.camera.initial_zoom);
    assert_eq!(config.camera.initial_spin, builtin.camera.initial_spin);
    assert_eq!(config.sampler.throttle_ms, builtin.sampler.throttle_ms);
    assert!(matches!(config.mesh.subject, ShapeTemplate::Torus { .. }));
    assert!(matches!(config.mesh.ground, ShapeTemplate::Cuboid { .. }));
}

#[test]
#[serial]
fn test_invalid_env_value_fails() {
    std::env::set_var("AOV_SAMPLER__RESOLUTION", "0");
    let result = AppConfig::load();
    std::env::remove_var("AOV_SAMPLER__RESOLUTION");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_oversized_resolution_env_fails() {
    std::env::set_var("AOV_SAMPLER__RESOLUTION", "70000");
    let result = AppConfig::load();
    std::env::remove_var("AOV_SAMPLER__RESOLUTION");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_load_from_custom_dir() {
    let dir = std::env::temp_dir().join(format!("aoview_config_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("default.toml"),
        "[camera]\ninitial_zoom = 300.0\n\n[mesh.subject]\ntype = \"Icosphere\"\nradius = 20.0\nsubdivisions = 2\n",
    )
    .unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.camera.initial_zoom, 300.0);
    // Keys not in the file fall back to built-in defaults
    assert_eq!(config.camera.max_zoom, 512.0);
    assert!(matches!(
        config.mesh.subject,
        ShapeTemplate::Icosphere { subdivisions: 2, .. }
    ));
}

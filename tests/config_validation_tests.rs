//! Config Validation Tests
//!
//! TOML loading via real temp files, default fallback, hard domain
//! rejection, and warning-only unknown-key handling.

use std::io::Write;
use std::path::Path;

use ppfg_engine::config::{validation, ConfigError, EngineConfig};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_complete_config_from_file() {
    let file = write_config(
        r#"
        [well]
        name = "TEST-7"
        field = "Synthetic"

        [formation]
        poisson_ratio = 0.32
        eaton_exponent = 1.2
        hydrostatic_gradient_psi_ft = 0.452

        [risk]
        high_margin_ppg = 0.1
        medium_margin_ppg = 0.75

        [monte_carlo]
        trials = 2000
        seed = 99
        "#,
    );

    let config = EngineConfig::load_from_file(file.path()).expect("should load");
    assert_eq!(config.well.name, "TEST-7");
    assert!((config.formation.poisson_ratio - 0.32).abs() < 1e-12);
    assert!((config.formation.eaton_exponent - 1.2).abs() < 1e-12);
    assert!((config.risk.medium_margin_ppg - 0.75).abs() < 1e-12);
    assert_eq!(config.monte_carlo.trials, 2000);
    assert_eq!(config.monte_carlo.seed, 99);
}

#[test]
fn partial_config_keeps_defaults_for_missing_sections() {
    let file = write_config(
        r#"
        [monte_carlo]
        trials = 50
        "#,
    );

    let config = EngineConfig::load_from_file(file.path()).expect("should load");
    assert_eq!(config.monte_carlo.trials, 50);
    // Everything else stays at built-in defaults
    assert!((config.formation.poisson_ratio - 0.4).abs() < 1e-12);
    assert!((config.risk.high_margin_ppg - 0.0).abs() < 1e-12);
    assert_eq!(config.well.name, "UNNAMED");
}

#[test]
fn out_of_domain_poisson_is_rejected() {
    let file = write_config(
        r#"
        [formation]
        poisson_ratio = 0.55
        "#,
    );

    let result = EngineConfig::load_from_file(file.path());
    assert!(
        matches!(result, Err(ConfigError::Invalid(_))),
        "poisson 0.55 must be a hard error, got {result:?}"
    );
}

#[test]
fn misordered_risk_thresholds_are_rejected() {
    let file = write_config(
        r#"
        [risk]
        high_margin_ppg = 1.0
        medium_margin_ppg = 0.25
        "#,
    );

    assert!(EngineConfig::load_from_file(file.path()).is_err());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("formation = { poisson_ratio = ");
    let result = EngineConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_, _))));
}

#[test]
fn unknown_keys_warn_but_do_not_fail() {
    let file = write_config(
        r#"
        [formation]
        poisson_ratio = 0.3
        eaton_expnent = 2.0
        "#,
    );

    // Loads despite the typo key
    let config = EngineConfig::load_from_file(file.path()).expect("typos are non-fatal");
    assert!((config.formation.poisson_ratio - 0.3).abs() < 1e-12);

    // And the typo is detectable with a suggestion
    let contents = std::fs::read_to_string(file.path()).expect("read back");
    let warnings = validation::validate_unknown_keys(&contents);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].field.contains("eaton_expnent"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("formation.eaton_exponent")
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let result = EngineConfig::load_from_file(Path::new("/nonexistent/ppfg_config.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_, _))));
}

#[test]
fn config_round_trips_through_toml() {
    let mut config = EngineConfig::default();
    config.well.name = "ROUNDTRIP-1".to_string();
    config.monte_carlo.trials = 777;

    let serialized = toml::to_string(&config).expect("serialize");
    let parsed = EngineConfig::from_toml_str(&serialized, Path::new("roundtrip.toml"))
        .expect("round trip");
    assert_eq!(parsed.well.name, "ROUNDTRIP-1");
    assert_eq!(parsed.monte_carlo.trials, 777);
}

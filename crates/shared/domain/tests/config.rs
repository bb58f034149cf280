use rune_domain::config::{LoggingConfig, RuntimeConfig, SerializationConfig, ValidationConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let validation = ValidationConfig::default();
    assert!(validation.strict);
    assert!(!validation.fail_fast);
    assert!(!validation.raise_on_failure);

    let serialization = SerializationConfig::default();
    assert!(serialization.emit_model_header);
    assert_eq!(serialization.generated_key_length, 12);

    let logging = LoggingConfig::default();
    assert_eq!(logging.name, "rune");
    assert_eq!(logging.level, "info");
    assert!(logging.path.is_none());
}

#[test]
fn runtime_config_deserializes_partially() {
    let raw = json!({
        "validation": { "fail_fast": true },
        "logging": { "level": "debug", "path": "/tmp/rune-logs" }
    });

    let cfg: RuntimeConfig = serde_json::from_value(raw).expect("config deserialize");
    assert!(cfg.validation.fail_fast);
    assert!(cfg.validation.strict);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.logging.path, Some(std::path::PathBuf::from("/tmp/rune-logs")));
    assert!(cfg.serialization.emit_model_header);
}

#[test]
fn clones_share_until_mutated() {
    let base = RuntimeConfig::default();
    let mut tuned = base.clone();
    tuned.validation.raise_on_failure = true;

    assert!(!base.validation.raise_on_failure);
    assert!(tuned.validation.raise_on_failure);
}

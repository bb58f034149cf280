use rune_domain::constants::{DATA, KEY, KEY_EXTERNAL, REF_SCOPED, TYPE, is_metadata_token};
use rune_domain::roles::{KeyKind, MetaRoles};

#[test]
fn constants_match_wire_tokens() {
    assert_eq!(KEY, "@key");
    assert_eq!(KEY_EXTERNAL, "@key:external");
    assert_eq!(REF_SCOPED, "@ref:scoped");
    assert_eq!(DATA, "@data");
    assert_eq!(TYPE, "@type");
}

#[test]
fn metadata_tokens_are_recognised() {
    assert!(is_metadata_token("@ref:external"));
    assert!(is_metadata_token("@version"));
    assert!(!is_metadata_token("@unknown"));
    assert!(!is_metadata_token("fieldName"));
}

#[test]
fn roles_serialize_as_bits() {
    let roles = MetaRoles::KEY | MetaRoles::REF;
    let raw = serde_json::to_value(roles).expect("serialize roles");
    assert_eq!(raw, serde_json::json!(9));

    let back: MetaRoles = serde_json::from_value(raw).expect("deserialize roles");
    assert_eq!(back, roles);
}

#[test]
fn key_kinds_serialize_lowercase() {
    let raw = serde_json::to_value(KeyKind::External).expect("serialize kind");
    assert_eq!(raw, serde_json::json!("external"));
    assert_eq!(KeyKind::Scoped.to_string(), "scoped");
}

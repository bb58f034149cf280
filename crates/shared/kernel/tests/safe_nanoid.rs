use rune_kernel::SAFE_ALPHABET;
use rune_kernel::domain::config::SerializationConfig;
use rune_kernel::safe_nanoid;
use std::collections::HashSet;

#[test]
fn default_ids_use_the_unambiguous_alphabet() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);
    assert!(id.chars().all(|ch| SAFE_ALPHABET.contains(&ch)), "unexpected character in {id}");
    assert!(!id.contains(['I', 'O', 'l', '0', '1']));
}

#[test]
fn generated_key_length_follows_serialization_config() {
    let config = SerializationConfig { generated_key_length: 20, ..SerializationConfig::default() };
    let id = safe_nanoid!(config.generated_key_length);
    assert_eq!(id.len(), 20);
}

#[test]
fn keys_do_not_repeat_within_a_document() {
    let keys: HashSet<String> = (0..256).map(|_| safe_nanoid!()).collect();
    assert_eq!(keys.len(), 256);
}

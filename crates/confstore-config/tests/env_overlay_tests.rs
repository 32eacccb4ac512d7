//! Environment overlay tests against the real process environment

use confstore_config::{ConfigStore, StoreOptions, ValueTree};
use serial_test::serial;

#[test]
#[serial]
fn test_existing_key_is_overridden_from_env() {
    std::env::set_var("name", "env_example");
    let store = ConfigStore::new();
    store.set("name", "example").unwrap();

    store.load_from_env();
    std::env::remove_var("name");

    assert_eq!(store.get("name").unwrap(), ValueTree::from("env_example"));
    assert_eq!(
        store.env_overrides().get("name").map(String::as_str),
        Some("env_example")
    );
}

#[test]
#[serial]
fn test_unknown_variable_is_ingested() {
    std::env::set_var("custom_env_var", "custom value");
    let store = ConfigStore::new();
    assert!(!store.exists("custom_env_var"));

    store.load_from_env();
    std::env::remove_var("custom_env_var");

    assert!(store.exists("custom_env_var"));
    assert_eq!(
        store.get("custom_env_var").unwrap(),
        ValueTree::from("custom value")
    );
    // Ingested keys are not recorded as overrides
    assert!(!store.env_overrides().contains_key("custom_env_var"));
}

#[test]
#[serial]
fn test_env_values_stay_strings() {
    std::env::set_var("CONFSTORE_TEST_PORT", "8080");
    let store = ConfigStore::new();
    store.set("CONFSTORE_TEST_PORT", 1).unwrap();

    store.load_from_env();
    std::env::remove_var("CONFSTORE_TEST_PORT");

    assert_eq!(
        store.get("CONFSTORE_TEST_PORT").unwrap(),
        ValueTree::from("8080")
    );
}

#[test]
#[serial]
fn test_ingest_can_be_disabled_from_env() {
    std::env::set_var("CONFSTORE_INGEST_ENV", "false");
    std::env::set_var("confstore_unrelated", "value");
    let store = ConfigStore::with_options(StoreOptions::from_env());

    store.load_from_env();
    std::env::remove_var("CONFSTORE_INGEST_ENV");
    std::env::remove_var("confstore_unrelated");

    assert!(!store.options().ingest_environment);
    assert!(!store.exists("confstore_unrelated"));
}

#[test]
#[serial]
fn test_overlay_does_not_notify_listeners() {
    std::env::set_var("watched", "from_env");
    let store = ConfigStore::new();
    store.set("watched", "initial").unwrap();
    let (tx, rx) = std::sync::mpsc::channel();
    let tx = std::sync::Mutex::new(tx);
    store.add_change_listener(move |key, _| {
        let _ = tx.lock().map(|tx| tx.send(key.to_string()));
    });

    store.load_from_env();
    std::env::remove_var("watched");

    assert_eq!(store.get("watched").unwrap(), ValueTree::from("from_env"));
    assert!(rx.try_recv().is_err());
}

//! File persistence tests for the configuration store

use confstore_config::{ConfigStore, IoOperation, StoreError, StoreOptions, ValueTree};
use tempfile::TempDir;

fn complex_value() -> ValueTree {
    ValueTree::from([
        ("key1", ValueTree::from("value1")),
        ("key2", ValueTree::from(42)),
        (
            "key3",
            ValueTree::from([("nestedKey", ValueTree::from("nestedValue"))]),
        ),
    ])
}

fn populated_store() -> ConfigStore {
    let store = ConfigStore::new();
    store.set("name", "example").unwrap();
    store.set("complex", complex_value()).unwrap();
    store.set("ratio", 0.75).unwrap();
    store.set("enabled", true).unwrap();
    store
        .set("tags", vec![ValueTree::from("a"), ValueTree::from("b")])
        .unwrap();
    store.set("nothing", ValueTree::Null).unwrap();
    store
}

fn assert_round_trip(file_name: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);
    let store = populated_store();
    let before = store.get_all();

    store.save_to_file(&path).unwrap();
    store.clear();
    assert!(store.get_all().is_empty());
    store.load_from_file(&path).unwrap();

    for (key, value) in &before {
        assert_eq!(&store.get(key).unwrap(), value, "key {} in {}", key, file_name);
    }
    // The version tag is loaded as an ordinary entry
    assert_eq!(store.get("version").unwrap(), ValueTree::from("1.0.0"));
}

#[test]
fn test_json_round_trip() {
    assert_round_trip("config.json");
}

#[test]
fn test_yaml_round_trip() {
    assert_round_trip("config.yaml");
}

#[test]
fn test_yml_round_trip() {
    assert_round_trip("config.yml");
}

#[test]
fn test_partial_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.yaml");
    let store = populated_store();

    store.save_partial_to_file(&path, ["name"]).unwrap();
    store.clear();
    store.load_partial_from_file(&path, ["name", "complex"]).unwrap();

    assert_eq!(store.get("name").unwrap(), ValueTree::from("example"));
    assert!(!store.exists("complex"));
    assert!(!store.exists("version"));
    assert_eq!(store.get_all().len(), 1);
}

#[test]
fn test_partial_load_ignores_unrequested_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("full.json");
    populated_store().save_to_file(&path).unwrap();

    let store = ConfigStore::new();
    store.load_partial_from_file(&path, ["ratio", "absent"]).unwrap();

    assert_eq!(store.get("ratio").unwrap(), ValueTree::from(0.75));
    assert_eq!(store.get_all().len(), 1);
}

#[test]
fn test_ini_is_rejected_everywhere() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.ini");
    let store = populated_store();
    let before = store.get_all();

    assert!(matches!(
        store.save_to_file(&path),
        Err(StoreError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        store.save_partial_to_file(&path, ["name"]),
        Err(StoreError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        store.load_from_file(&path),
        Err(StoreError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        store.load_partial_from_file(&path, ["name"]),
        Err(StoreError::UnsupportedFormat { .. })
    ));
    assert_eq!(store.get_all(), before);
    assert!(!path.exists());
}

#[test]
fn test_malformed_document_leaves_store_unmodified() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"name\": ").unwrap();
    let store = populated_store();
    let before = store.get_all();

    let err = store.load_from_file(&path).unwrap_err();
    assert!(matches!(err, StoreError::ParseError { .. }));
    assert_eq!(store.get_all(), before);
}

#[test]
fn test_yaml_scalars_follow_probe_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.yaml");
    std::fs::write(&path, "flag: \"yes\"\nport: \"8080\"\nratio: \"0.5\"\nname: demo\n").unwrap();

    let store = ConfigStore::new();
    store.load_from_file(&path).unwrap();

    assert_eq!(store.get("flag").unwrap(), ValueTree::from(true));
    assert_eq!(store.get("port").unwrap(), ValueTree::from(8080));
    assert_eq!(store.get("ratio").unwrap(), ValueTree::from(0.5));
    assert_eq!(store.get("name").unwrap(), ValueTree::from("demo"));
}

#[test]
fn test_backup_ignores_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("backup.bak");
    let store = populated_store();

    store.backup_to_file(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let restored: ValueTree = serde_json::from_str(&content).unwrap();
    assert_eq!(restored.get("complex"), Some(&complex_value()));
    assert!(restored.get("version").is_none());
}

#[test]
fn test_json_indent_option() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("narrow.json");
    let store = ConfigStore::with_options(StoreOptions {
        json_indent: 2,
        ..StoreOptions::default()
    });
    store.set("port", 1).unwrap();

    store.save_to_file(&path).unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "{\n  \"version\": \"1.0.0\",\n  \"port\": 1\n}\n"
    );
}

#[test]
fn test_inspect_scenario() {
    let store = ConfigStore::new();
    store.set("name", "example").unwrap();
    store.set("complex", complex_value()).unwrap();

    let values = store.inspect(["name", "complex"]);

    assert_eq!(values, vec![ValueTree::from("example"), complex_value()]);
}

#[test]
fn test_oversized_json_indent_is_clamped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wide.json");
    let backup = dir.path().join("wide.bak");
    let store = ConfigStore::with_options(StoreOptions {
        json_indent: usize::MAX,
        ..StoreOptions::default()
    });
    store.set("port", 1).unwrap();

    store.save_to_file(&path).unwrap();
    store.backup_to_file(&backup).unwrap();

    let indent = " ".repeat(16);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{{\n{0}\"version\": \"1.0.0\",\n{0}\"port\": 1\n}}\n", indent)
    );
    assert_eq!(
        std::fs::read_to_string(&backup).unwrap(),
        format!("{{\n{}\"port\": 1\n}}\n", indent)
    );
}

#[test]
fn test_infinite_yaml_float_cannot_be_saved_as_json() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("limits.yaml");
    let target = dir.path().join("limits.json");
    let backup = dir.path().join("limits.bak");
    std::fs::write(&source, "x: .inf\nnested:\n  ratios: [0.5, .nan]\n").unwrap();

    let store = ConfigStore::new();
    store.load_from_file(&source).unwrap();
    assert_eq!(store.get("x").unwrap(), ValueTree::Float(f64::INFINITY));

    let err = store.save_to_file(&target).unwrap_err();
    match err {
        StoreError::ParseError { format, message, .. } => {
            assert_eq!(format, "JSON");
            assert!(message.contains("non-finite"), "{}", message);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
    assert!(!target.exists());

    store.remove("x").unwrap();
    let err = store.backup_to_file(&backup).unwrap_err();
    assert!(err.to_string().contains("nested.ratios.1"), "{}", err);
    assert!(!backup.exists());

    // YAML spells both values, so the same store still saves there
    store.save_to_file(dir.path().join("copy.yaml")).unwrap();
}

#[test]
fn test_inspect_reads_each_key_separately() {
    struct WritingKeys<'a> {
        store: &'a ConfigStore,
        step: usize,
    }

    impl<'a> Iterator for WritingKeys<'a> {
        type Item = &'static str;

        fn next(&mut self) -> Option<Self::Item> {
            self.step += 1;
            match self.step {
                1 => Some("a"),
                2 => {
                    self.store.set("b", 2).unwrap();
                    Some("b")
                }
                _ => None,
            }
        }
    }

    let store = ConfigStore::new();
    store.set("a", 1).unwrap();
    store.set("b", 1).unwrap();

    // A write between two keys is visible to the later key
    let values = store.inspect(WritingKeys {
        store: &store,
        step: 0,
    });

    assert_eq!(values, vec![ValueTree::from(1), ValueTree::from(2)]);
}

#[test]
fn test_backup_failure_names_the_operation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("store.bak");
    let store = populated_store();

    let err = store.backup_to_file(&path).unwrap_err();

    assert!(matches!(
        err,
        StoreError::IoError {
            operation: IoOperation::Backup,
            ..
        }
    ));
    assert!(err
        .to_string()
        .starts_with("Failed to back up configuration file"));
}

//! The saved renderer preference is deleted at startup regardless of its
//! prior state, and a blocked store never stops detection.

use std::sync::Arc;

use mathgate::{
    DeniedSettingsStore, FileSettingsStore, GateConfig, GateOutcome, HandleSlot,
    MemorySettingsStore, ReadinessGate, SimulatedRuntime,
};

const KEY: &str = "MathJax-Menu-Settings";

fn legacy_slot() -> (Arc<HandleSlot>, Arc<SimulatedRuntime>) {
    let slot = Arc::new(HandleSlot::new());
    let runtime = Arc::new(SimulatedRuntime::legacy("2.7.7"));
    slot.install(runtime.clone());
    (slot, runtime)
}

#[tokio::test]
async fn test_absent_key_stays_absent() {
    let (slot, _) = legacy_slot();
    let store = Arc::new(MemorySettingsStore::new());

    let gate = ReadinessGate::builder(slot).store(store.clone()).build();
    assert_eq!(gate.run().await, GateOutcome::AppliedLegacy);

    assert!(!store.contains(KEY).await);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_present_empty_key_is_cleared() {
    let (slot, _) = legacy_slot();
    let store = Arc::new(MemorySettingsStore::new());
    store.insert(KEY, "").await;

    let gate = ReadinessGate::builder(slot).store(store.clone()).build();
    gate.run().await;

    assert!(!store.contains(KEY).await);
}

#[tokio::test]
async fn test_present_key_with_data_is_cleared_and_other_keys_survive() {
    let (slot, _) = legacy_slot();
    let store = Arc::new(MemorySettingsStore::new());
    store.insert(KEY, r#"{"renderer":"SVG","zoom":"Click"}"#).await;
    store.insert("unrelated-setting", "kept").await;

    let gate = ReadinessGate::builder(slot).store(store.clone()).build();
    gate.run().await;

    assert!(!store.contains(KEY).await);
    assert!(store.contains("unrelated-setting").await);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_denied_storage_is_non_fatal_and_detection_proceeds() {
    let (slot, runtime) = legacy_slot();

    let gate = ReadinessGate::builder(slot)
        .store(Arc::new(DeniedSettingsStore::new()))
        .build();

    assert_eq!(gate.run().await, GateOutcome::AppliedLegacy);
    assert_eq!(runtime.hub().unwrap().configure_calls(), 1);
}

#[tokio::test]
async fn test_file_backed_store_clears_only_the_preference_file() {
    let dir = tempfile::tempdir().unwrap();
    let preference = dir.path().join(format!("{}.settings.json", KEY));
    let other = dir.path().join("other.settings.json");
    std::fs::write(&preference, r#"{"renderer":"SVG"}"#).unwrap();
    std::fs::write(&other, "{}").unwrap();

    let (slot, _) = legacy_slot();
    let store = Arc::new(FileSettingsStore::new(dir.path()).unwrap());

    let gate = ReadinessGate::builder(slot).store(store).build();
    assert_eq!(gate.run().await, GateOutcome::AppliedLegacy);

    assert!(!preference.exists());
    assert!(other.exists());
}

#[tokio::test]
async fn test_custom_settings_key_is_honored() {
    let (slot, _) = legacy_slot();
    let store = Arc::new(MemorySettingsStore::new());
    store.insert("Custom-Settings", "x").await;
    store.insert(KEY, "y").await;

    let mut config = GateConfig::default();
    config.settings_key = "Custom-Settings".to_string();

    let gate = ReadinessGate::builder(slot)
        .config(config)
        .store(store.clone())
        .build();
    gate.run().await;

    assert!(!store.contains("Custom-Settings").await);
    assert!(store.contains(KEY).await);
}

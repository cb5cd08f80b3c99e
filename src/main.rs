use std::sync::Arc;
use std::time::Duration;

use mathgate::{
    GateConfig, GateOutcome, HandleSlot, MemorySettingsStore, ReadinessGate, SimulatedRuntime,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== mathgate demo: legacy runtime appearing after 300ms ===\n");

    let slot = Arc::new(HandleSlot::new());

    // A saved preference that would pin the inaccessible renderer.
    let store = Arc::new(MemorySettingsStore::new());
    store
        .insert("MathJax-Menu-Settings", r#"{"renderer":"SVG"}"#)
        .await;

    // Simulate the environment loading the runtime a moment later.
    let runtime = Arc::new(SimulatedRuntime::legacy("2.7.7"));
    {
        let slot = slot.clone();
        let runtime = runtime.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            slot.install(runtime);
        });
    }

    let mut config = GateConfig::default();
    config.expected_version = Some("2.7.7".to_string());
    config.debug = true;

    let gate = ReadinessGate::builder(slot)
        .config(config)
        .store(store.clone())
        .build();

    match gate.run().await {
        GateOutcome::AppliedLegacy => {
            let hub = runtime.hub().expect("legacy runtime has a hub");
            println!("\n=== Accessible renderer applied ===");
            println!("  configure calls: {}", hub.configure_calls());
            println!("  re-render enqueues: {}", hub.rerender_calls());
            if let Some(settings) = hub.last_settings() {
                println!("  renderer: {}", settings.renderer);
            }
        }
        GateOutcome::AppliedModern => {
            println!("\n=== Accessible renderer active after startup ===");
        }
        GateOutcome::AlreadyApplied => {
            println!("\n=== Renderer configuration was already applied ===");
        }
        GateOutcome::UnrecognizedShape => {
            println!("\n=== Runtime shape not recognized; nothing changed ===");
        }
        GateOutcome::TimedOut => {
            println!("\n=== Runtime never appeared; nothing changed ===");
        }
        GateOutcome::ConfigFailed { protocol, error } => {
            println!("\n=== Configuration failed ({:?}): {} ===", protocol, error);
        }
    }

    println!(
        "saved preference still present: {}",
        store.contains("MathJax-Menu-Settings").await
    );
}

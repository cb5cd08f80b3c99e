//! # mathgate — accessible-renderer readiness gate
//!
//! `mathgate` waits for a MathJax-style math-typesetting runtime to appear
//! in a shared slot, works out which initialization protocol that runtime
//! speaks, and applies the configuration that selects its
//! accessibility-friendly renderer — exactly once, and without ever
//! letting a broken or absent runtime take the embedder down.
//!
//! Two modes are supported:
//!
//! - **Post-load polling** ([`ReadinessGate::run`]): bounded, cooperative
//!   polling until the handle appears, then one protocol-appropriate
//!   configuration pass (legacy: set renderer + enqueue re-render;
//!   modern: await startup completion, then re-typeset).
//! - **Pre-load hooks** ([`ReadinessGate::preload`]): when the gate runs
//!   before the runtime loads, it leaves protocol-compatible hooks in the
//!   slot for the runtime to invoke during its own startup, plus a
//!   one-shot watchdog that flags unknown shapes.
//!
//! A saved user preference for the renderer would override either path,
//! so both start by deleting the preference key from scoped storage.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mathgate::{GateConfig, HandleSlot, ReadinessGate};
//!
//! #[tokio::main]
//! async fn main() {
//!     let slot = Arc::new(HandleSlot::new());
//!     // ... the environment publishes the runtime into `slot` ...
//!     let gate = ReadinessGate::builder(slot)
//!         .config(GateConfig::default())
//!         .build();
//!     let outcome = gate.run().await;
//!     println!("{:?}", outcome);
//! }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod gate;
pub mod runtime;
pub mod storage;

pub use crate::classify::{classify, classify_with_config, Protocol};
pub use crate::config::GateConfig;
pub use crate::error::GateError;
pub use crate::gate::{GateBuilder, GateOutcome, PreloadOutcome, ReadinessGate};
pub use crate::runtime::{
    HandleSlot, LegacyHub, PreloadConfig, Renderer, RendererSettings, SimulatedHub,
    SimulatedRuntime, SimulatedStartup, StartupLifecycle, TypesetRuntime,
};
pub use crate::storage::{
    DeniedSettingsStore, FileSettingsStore, MemorySettingsStore, SettingsStore,
};

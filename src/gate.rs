//! The readiness gate.
//!
//! [`ReadinessGate`] (constructed via [`GateBuilder`]) is the single entry
//! point: clear the saved renderer preference, wait for the typesetting
//! runtime to be published into the shared slot, classify its protocol,
//! and apply the accessible renderer exactly once.
//!
//! The lifecycle is `Idle -> Polling -> terminal`, with every terminal
//! state in [`GateOutcome`]. Nothing here is fatal to the embedder: every
//! failure is caught where it occurs, logged, and folded into a terminal
//! outcome.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::classify::{classify_with_config, Protocol};
use crate::config::GateConfig;
use crate::runtime::{
    HandleSlot, PreloadConfig, RendererSettings, TypesetRuntime,
};
use crate::storage::{MemorySettingsStore, SettingsStore};

/// Terminal states of one gate run. No retries happen after any of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Legacy protocol: renderer option set and a re-render enqueued.
    AppliedLegacy,
    /// Modern protocol: re-typeset invoked after startup completed.
    AppliedModern,
    /// This handle generation was already configured by an earlier run.
    AlreadyApplied,
    /// Handle present but matching neither marker set; left untouched.
    UnrecognizedShape,
    /// No handle appeared within the detection budget.
    TimedOut,
    /// A protocol handler's configuration call failed; logged, not retried.
    ConfigFailed {
        protocol: Protocol,
        error: String,
    },
}

/// Result of the pre-load variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadOutcome {
    /// Hooks installed; the runtime will invoke them on its own startup.
    Installed,
    /// A handle already exists; installing hooks now could clobber an
    /// in-progress initialization, so nothing was done.
    SkippedAlreadyPresent,
}

/// Readiness detector with builder-based configuration.
///
/// Use [`ReadinessGate::builder(slot)`](Self::builder) to obtain a
/// [`GateBuilder`].
pub struct ReadinessGate {
    slot: Arc<HandleSlot>,
    store: Arc<dyn SettingsStore>,
    config: GateConfig,
}

impl ReadinessGate {
    /// Create a new builder over the shared handle slot.
    pub fn builder(slot: Arc<HandleSlot>) -> GateBuilder {
        GateBuilder {
            slot,
            store: None,
            config: GateConfig::default(),
        }
    }

    /// Run the full startup sequence: clear the saved preference, then
    /// detect and configure. Never panics and never returns an error; the
    /// outcome says which terminal state was reached.
    pub async fn run(&self) -> GateOutcome {
        self.clear_saved_preference().await;
        self.detect().await
    }

    /// Pre-load variant: install protocol hooks before the runtime loads.
    ///
    /// Skipped entirely when a handle is already published. On success a
    /// one-shot watchdog is scheduled that flags a runtime which loaded
    /// with an unrecognizable shape.
    pub async fn preload(&self) -> PreloadOutcome {
        if !self.slot.install_preload(PreloadConfig::accessible()) {
            warn!("typesetting runtime already present; pre-load configuration skipped");
            return PreloadOutcome::SkippedAlreadyPresent;
        }
        info!("pre-load configuration installed; waiting for the runtime to pick it up");

        let slot = self.slot.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            Self::watch_for_unknown_shape(slot, config).await;
        });
        PreloadOutcome::Installed
    }

    /// One-shot unknown-shape check, run `unknown_watchdog_ms` after
    /// pre-load. Returns true when a handle exists but speaks no known
    /// protocol. Exposed separately so the check is testable without
    /// racing a detached task.
    pub async fn unknown_version_watchdog(&self) -> bool {
        Self::watch_for_unknown_shape(self.slot.clone(), self.config.clone()).await
    }

    async fn watch_for_unknown_shape(slot: Arc<HandleSlot>, config: GateConfig) -> bool {
        sleep(Duration::from_millis(config.unknown_watchdog_ms)).await;
        let Some((handle, _)) = slot.snapshot() else {
            return false;
        };
        match classify_with_config(handle.as_ref(), &config) {
            Ok(Protocol::Unknown) => {
                warn!(
                    shape = %handle.describe(),
                    "typesetting runtime loaded with an unknown shape; no renderer changes applied"
                );
                true
            }
            Err(err) => {
                warn!(%err, "typesetting runtime loaded but could not be inspected");
                true
            }
            Ok(_) => false,
        }
    }

    async fn clear_saved_preference(&self) {
        match self.store.remove(&self.config.settings_key).await {
            Ok(()) => info!(
                key = %self.config.settings_key,
                "cleared saved renderer preference"
            ),
            // Blocked storage must not stop detection.
            Err(err) => warn!(
                key = %self.config.settings_key,
                %err,
                "could not clear saved renderer preference; continuing"
            ),
        }
    }

    /// Bounded poll loop. Attempts are strictly sequential: each one
    /// schedules the next only after completing, so no two overlap.
    async fn detect(&self) -> GateOutcome {
        let started = Instant::now();
        let budget = Duration::from_millis(self.config.max_wait_time_ms);
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            if let Some((handle, generation)) = self.slot.snapshot() {
                return self.dispatch(handle, generation).await;
            }
            let waited = started.elapsed();
            if waited >= budget {
                warn!(
                    waited_ms = waited.as_millis() as u64,
                    "typesetting runtime not found within the detection budget"
                );
                return GateOutcome::TimedOut;
            }
            sleep(interval).await;
        }
    }

    async fn dispatch(&self, handle: Arc<dyn TypesetRuntime>, generation: u64) -> GateOutcome {
        let protocol = match classify_with_config(handle.as_ref(), &self.config) {
            Ok(protocol) => protocol,
            Err(err) => {
                // A handle we cannot safely read gets the same explicit
                // non-action as an unknown shape.
                warn!(%err, "handle inspection failed; no renderer changes applied");
                return GateOutcome::UnrecognizedShape;
            }
        };

        if self.config.debug {
            debug!(shape = %handle.describe(), "detected typesetting runtime");
        }

        match protocol {
            Protocol::Unknown => {
                warn!(
                    shape = %handle.describe(),
                    "typesetting runtime has an unrecognized shape; no renderer changes applied"
                );
                GateOutcome::UnrecognizedShape
            }
            Protocol::LegacyHub | Protocol::Startup => {
                if !self.slot.mark_applied(generation) {
                    info!(
                        generation,
                        "renderer configuration already applied for this handle generation"
                    );
                    return GateOutcome::AlreadyApplied;
                }
                match protocol {
                    Protocol::LegacyHub => self.apply_legacy(handle).await,
                    Protocol::Startup => self.apply_modern(handle).await,
                    Protocol::Unknown => unreachable!("filtered above"),
                }
            }
        }
    }

    /// Legacy protocol: set the accessible renderer options, then enqueue
    /// a re-render against the hub's processing queue.
    async fn apply_legacy(&self, handle: Arc<dyn TypesetRuntime>) -> GateOutcome {
        let Some(hub) = handle.legacy_hub() else {
            // Classifier saw the marker; the handle mutated under us.
            warn!("legacy hub disappeared between classification and apply");
            return GateOutcome::UnrecognizedShape;
        };

        let settings = RendererSettings::legacy();
        let result = async {
            hub.configure(&settings).await?;
            hub.enqueue_rerender().await
        }
        .await;

        match result {
            Ok(()) => {
                info!(
                    renderer = %settings.renderer,
                    "accessible renderer applied and re-render enqueued (legacy protocol)"
                );
                GateOutcome::AppliedLegacy
            }
            Err(err) => {
                error!(%err, "legacy protocol configuration failed");
                GateOutcome::ConfigFailed {
                    protocol: Protocol::LegacyHub,
                    error: err.to_string(),
                }
            }
        }
    }

    /// Modern protocol: wait for the runtime's own startup-completion
    /// signal, then trigger the global re-typeset.
    async fn apply_modern(&self, handle: Arc<dyn TypesetRuntime>) -> GateOutcome {
        let Some(startup) = handle.startup() else {
            warn!("startup lifecycle disappeared between classification and apply");
            return GateOutcome::UnrecognizedShape;
        };

        if let Err(err) = startup.ready().await {
            error!(%err, "startup-completion signal failed");
            return GateOutcome::ConfigFailed {
                protocol: Protocol::Startup,
                error: err.to_string(),
            };
        }

        match startup.typeset().await {
            Ok(()) => {
                info!("re-typeset completed with the accessible renderer (modern protocol)");
                GateOutcome::AppliedModern
            }
            Err(err) => {
                error!(%err, "re-typeset invocation failed");
                GateOutcome::ConfigFailed {
                    protocol: Protocol::Startup,
                    error: err.to_string(),
                }
            }
        }
    }
}

/// Builder for configuring a [`ReadinessGate`].
pub struct GateBuilder {
    slot: Arc<HandleSlot>,
    store: Option<Arc<dyn SettingsStore>>,
    config: GateConfig,
}

impl GateBuilder {
    pub fn config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    /// Scoped storage holding the saved renderer preference. Defaults to
    /// an empty in-memory store.
    pub fn store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> ReadinessGate {
        ReadinessGate {
            slot: self.slot,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemorySettingsStore::new())),
            config: self.config,
        }
    }
}

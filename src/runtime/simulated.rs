//! Simulated runtime doubles.
//!
//! Drop-in [`TypesetRuntime`] implementations for tests and the demo
//! binary. They count capability calls, can be told to fail any of them,
//! and the startup double exposes an explicit completion trigger so "only
//! after ready resolves" ordering is observable.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use super::handle::{LegacyHub, RendererSettings, StartupLifecycle, TypesetRuntime};
use crate::error::GateError;

/// Legacy hub double: records configure/re-render calls.
#[derive(Default)]
pub struct SimulatedHub {
    configure_calls: AtomicUsize,
    rerender_calls: AtomicUsize,
    last_settings: Mutex<Option<RendererSettings>>,
    fail_configure: AtomicBool,
    fail_rerender: AtomicBool,
}

impl SimulatedHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_configure(&self) {
        self.fail_configure.store(true, Ordering::Relaxed);
    }

    pub fn fail_rerender(&self) {
        self.fail_rerender.store(true, Ordering::Relaxed);
    }

    pub fn configure_calls(&self) -> usize {
        self.configure_calls.load(Ordering::Relaxed)
    }

    pub fn rerender_calls(&self) -> usize {
        self.rerender_calls.load(Ordering::Relaxed)
    }

    pub fn last_settings(&self) -> Option<RendererSettings> {
        self.last_settings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl LegacyHub for SimulatedHub {
    async fn configure(&self, settings: &RendererSettings) -> Result<(), GateError> {
        self.configure_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_configure.load(Ordering::Relaxed) {
            return Err(GateError::HandleInspection(
                "simulated configure failure".to_string(),
            ));
        }
        let mut last = self.last_settings.lock().unwrap_or_else(|e| e.into_inner());
        *last = Some(settings.clone());
        Ok(())
    }

    async fn enqueue_rerender(&self) -> Result<(), GateError> {
        self.rerender_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_rerender.load(Ordering::Relaxed) {
            return Err(GateError::ReRender(
                "simulated queue rejection".to_string(),
            ));
        }
        Ok(())
    }
}

/// Startup lifecycle double with an explicit completion trigger.
pub struct SimulatedStartup {
    ready_tx: watch::Sender<bool>,
    ready_rx: watch::Receiver<bool>,
    typeset_calls: AtomicUsize,
    fail_typeset: AtomicBool,
}

impl Default for SimulatedStartup {
    fn default() -> Self {
        let (ready_tx, ready_rx) = watch::channel(false);
        SimulatedStartup {
            ready_tx,
            ready_rx,
            typeset_calls: AtomicUsize::new(0),
            fail_typeset: AtomicBool::new(false),
        }
    }
}

impl SimulatedStartup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the startup-completion signal.
    pub fn complete_startup(&self) {
        let _ = self.ready_tx.send(true);
    }

    pub fn fail_typeset(&self) {
        self.fail_typeset.store(true, Ordering::Relaxed);
    }

    pub fn typeset_calls(&self) -> usize {
        self.typeset_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StartupLifecycle for SimulatedStartup {
    async fn ready(&self) -> Result<(), GateError> {
        let mut rx = self.ready_rx.clone();
        loop {
            let done = *rx.borrow_and_update();
            if done {
                return Ok(());
            }
            rx.changed().await.map_err(|_| {
                GateError::HandleInspection("startup signal dropped".to_string())
            })?;
        }
    }

    async fn typeset(&self) -> Result<(), GateError> {
        self.typeset_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_typeset.load(Ordering::Relaxed) {
            return Err(GateError::ReRender(
                "simulated typeset failure".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configurable runtime double.
pub struct SimulatedRuntime {
    version: Option<String>,
    fail_version_access: bool,
    hub: Option<Arc<SimulatedHub>>,
    startup: Option<Arc<SimulatedStartup>>,
}

impl SimulatedRuntime {
    /// Legacy-line runtime: hub markers plus a version string.
    pub fn legacy(version: &str) -> Self {
        SimulatedRuntime {
            version: Some(version.to_string()),
            fail_version_access: false,
            hub: Some(Arc::new(SimulatedHub::new())),
            startup: None,
        }
    }

    /// Modern-line runtime: startup lifecycle markers, no version field.
    pub fn modern() -> Self {
        SimulatedRuntime {
            version: None,
            fail_version_access: false,
            hub: None,
            startup: Some(Arc::new(SimulatedStartup::new())),
        }
    }

    /// A handle exposing neither marker set.
    pub fn bare() -> Self {
        SimulatedRuntime {
            version: None,
            fail_version_access: false,
            hub: None,
            startup: None,
        }
    }

    /// Make the version accessor fail, as a thrown property getter would.
    pub fn with_failing_version_access(mut self) -> Self {
        self.fail_version_access = true;
        self
    }

    pub fn hub(&self) -> Option<Arc<SimulatedHub>> {
        self.hub.clone()
    }

    pub fn startup_handle(&self) -> Option<Arc<SimulatedStartup>> {
        self.startup.clone()
    }
}

impl TypesetRuntime for SimulatedRuntime {
    fn version(&self) -> Result<Option<String>, GateError> {
        if self.fail_version_access {
            return Err(GateError::HandleInspection(
                "simulated version getter failure".to_string(),
            ));
        }
        Ok(self.version.clone())
    }

    fn legacy_hub(&self) -> Option<Arc<dyn LegacyHub>> {
        self.hub.clone().map(|hub| hub as Arc<dyn LegacyHub>)
    }

    fn startup(&self) -> Option<Arc<dyn StartupLifecycle>> {
        self.startup
            .clone()
            .map(|startup| startup as Arc<dyn StartupLifecycle>)
    }

    fn describe(&self) -> Value {
        json!({
            "version": self.version,
            "hub": self.hub.is_some(),
            "startup": self.startup.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hub_records_settings() {
        let hub = SimulatedHub::new();
        hub.configure(&RendererSettings::legacy()).await.unwrap();
        hub.enqueue_rerender().await.unwrap();
        assert_eq!(hub.configure_calls(), 1);
        assert_eq!(hub.rerender_calls(), 1);
        assert_eq!(hub.last_settings(), Some(RendererSettings::legacy()));
    }

    #[tokio::test]
    async fn test_startup_ready_blocks_until_completed() {
        let startup = Arc::new(SimulatedStartup::new());
        let waiter = {
            let startup = startup.clone();
            tokio::spawn(async move { startup.ready().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        startup.complete_startup();
        waiter.await.unwrap().unwrap();
    }

    #[test]
    fn test_describe_reports_marker_presence() {
        let legacy = SimulatedRuntime::legacy("2.7.7");
        assert_eq!(
            legacy.describe(),
            json!({"version": "2.7.7", "hub": true, "startup": false})
        );
        let bare = SimulatedRuntime::bare();
        assert_eq!(
            bare.describe(),
            json!({"version": null, "hub": false, "startup": false})
        );
    }
}

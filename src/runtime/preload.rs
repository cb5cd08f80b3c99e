//! Pre-load configuration hooks.
//!
//! In pre-load mode the gate runs before the typesetting runtime loads:
//! instead of polling for a published handle, it leaves a [`PreloadConfig`]
//! in the slot. A loading runtime that finds it invokes the hook matching
//! its own protocol during startup, so the accessible renderer is in place
//! before the first typeset pass.

use tracing::{error, info};

use super::handle::{LegacyHub, RendererSettings, StartupLifecycle};

/// Initialization hooks compatible with both known protocols.
///
/// The hooks never propagate a failure back into the runtime's startup
/// sequence; errors are logged and swallowed so a broken configuration
/// attempt cannot break the host page.
#[derive(Debug, Clone)]
pub struct PreloadConfig {
    legacy_settings: RendererSettings,
    modern_settings: RendererSettings,
}

impl PreloadConfig {
    /// Hooks that select the accessible renderer on either protocol.
    pub fn accessible() -> Self {
        PreloadConfig {
            legacy_settings: RendererSettings::legacy(),
            modern_settings: RendererSettings::modern(),
        }
    }

    pub fn legacy_settings(&self) -> &RendererSettings {
        &self.legacy_settings
    }

    pub fn modern_settings(&self) -> &RendererSettings {
        &self.modern_settings
    }

    /// Legacy protocol: invoked by the runtime at the end of its own
    /// configuration phase, before the first typeset pass. Only configures;
    /// no re-render is needed since nothing has been rendered yet.
    pub async fn on_legacy_end_config(&self, hub: &dyn LegacyHub) {
        match hub.configure(&self.legacy_settings).await {
            Ok(()) => info!(
                renderer = %self.legacy_settings.renderer,
                "accessible renderer pre-configured (legacy protocol)"
            ),
            Err(err) => error!(%err, "pre-load configuration failed (legacy protocol)"),
        }
    }

    /// Modern protocol: invoked by the runtime once its startup sequence
    /// completes; triggers the initial typeset with the accessible output.
    pub async fn on_startup_ready(&self, startup: &dyn StartupLifecycle) {
        match startup.typeset().await {
            Ok(()) => info!(
                renderer = %self.modern_settings.renderer,
                "accessible renderer active (modern protocol)"
            ),
            Err(err) => error!(%err, "pre-load typeset failed (modern protocol)"),
        }
    }
}

//! The external handle model.
//!
//! The typesetting runtime is owned by the environment, not by this crate.
//! [`TypesetRuntime`] is the read-only observation surface the gate polls;
//! the two capability traits correspond to the two initialization
//! protocols the known major versions expose:
//!
//! - [`LegacyHub`]: the older line's nested control object with a
//!   configuration call and a processing queue.
//! - [`StartupLifecycle`]: the newer line's startup object with an
//!   awaitable completion signal and a global typeset operation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::GateError;

/// Renderer choices the gate can apply.
///
/// `HtmlCss` is the accessible output form on the legacy line; `Chtml` is
/// its counterpart on the modern line. Both serialize to the literal the
/// runtime expects in its option map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Renderer {
    #[serde(rename = "HTML-CSS")]
    HtmlCss,
    #[serde(rename = "CHTML")]
    Chtml,
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Renderer::HtmlCss => write!(f, "HTML-CSS"),
            Renderer::Chtml => write!(f, "CHTML"),
        }
    }
}

/// Options pushed at the runtime when a protocol handler fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererSettings {
    pub renderer: Renderer,
    /// Legacy line only: suppress the status message strip while
    /// re-rendering. `None` leaves the runtime's own default alone.
    pub message_style: Option<String>,
}

impl RendererSettings {
    /// Accessible settings for the legacy protocol.
    pub fn legacy() -> Self {
        RendererSettings {
            renderer: Renderer::HtmlCss,
            message_style: Some("none".to_string()),
        }
    }

    /// Accessible settings for the modern protocol.
    pub fn modern() -> Self {
        RendererSettings {
            renderer: Renderer::Chtml,
            message_style: None,
        }
    }
}

/// The externally-owned typesetting runtime handle.
///
/// Accessors may fail: the underlying object belongs to foreign code and a
/// property read can throw there. Such failures surface as
/// [`GateError::HandleInspection`] and the gate treats the handle as
/// unrecognizable rather than guessing.
pub trait TypesetRuntime: Send + Sync {
    /// The version-identifying field, if the runtime exposes one.
    fn version(&self) -> Result<Option<String>, GateError>;

    /// Legacy-protocol marker: the hub control object, if present.
    fn legacy_hub(&self) -> Option<Arc<dyn LegacyHub>>;

    /// Modern-protocol marker: the startup lifecycle object, if present.
    fn startup(&self) -> Option<Arc<dyn StartupLifecycle>>;

    /// Structural self-description used in debug diagnostics and in the
    /// unrecognized-shape log line.
    fn describe(&self) -> Value;
}

/// Legacy (older major version) control object.
#[async_trait]
pub trait LegacyHub: Send + Sync {
    /// Set the renderer-selection options.
    async fn configure(&self, settings: &RendererSettings) -> Result<(), GateError>;

    /// Push a re-render request onto the hub's processing queue.
    async fn enqueue_rerender(&self) -> Result<(), GateError>;
}

/// Modern (newer major version) startup lifecycle object.
#[async_trait]
pub trait StartupLifecycle: Send + Sync {
    /// Resolves once the runtime finishes its own startup sequence.
    async fn ready(&self) -> Result<(), GateError>;

    /// Global re-typeset operation. Must only be invoked after [`ready`]
    /// has resolved.
    ///
    /// [`ready`]: StartupLifecycle::ready
    async fn typeset(&self) -> Result<(), GateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_serializes_to_runtime_literals() {
        assert_eq!(
            serde_json::to_string(&Renderer::HtmlCss).unwrap(),
            "\"HTML-CSS\""
        );
        assert_eq!(serde_json::to_string(&Renderer::Chtml).unwrap(), "\"CHTML\"");
        assert_eq!(Renderer::HtmlCss.to_string(), "HTML-CSS");
    }

    #[test]
    fn test_accessible_settings_per_protocol() {
        let legacy = RendererSettings::legacy();
        assert_eq!(legacy.renderer, Renderer::HtmlCss);
        assert_eq!(legacy.message_style.as_deref(), Some("none"));

        let modern = RendererSettings::modern();
        assert_eq!(modern.renderer, Renderer::Chtml);
        assert!(modern.message_style.is_none());
    }
}

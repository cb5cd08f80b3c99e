//! Protocol classification.
//!
//! Capability presence, not version arithmetic, decides the dispatch: the
//! legacy hub marker selects the legacy protocol (optionally fenced behind
//! an exact version literal), the startup-lifecycle marker selects the
//! modern protocol, and anything else is left alone.

use crate::config::GateConfig;
use crate::error::GateError;
use crate::runtime::TypesetRuntime;

/// Which initialization protocol a published handle speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Older major version: hub control object with a processing queue.
    LegacyHub,
    /// Newer major version: startup lifecycle with a typeset trigger.
    Startup,
    /// Neither marker set; the gate must not guess.
    Unknown,
}

/// Classify a handle by its capability markers.
///
/// When `expected_version` is set, a handle carrying the legacy hub but a
/// missing or different version string does not qualify as legacy; it
/// falls through to the modern probe and, failing that, to `Unknown`.
pub fn classify(
    handle: &dyn TypesetRuntime,
    expected_version: Option<&str>,
) -> Result<Protocol, GateError> {
    if handle.legacy_hub().is_some() {
        match expected_version {
            None => return Ok(Protocol::LegacyHub),
            Some(expected) => {
                let version = handle.version()?;
                if version.as_deref() == Some(expected) {
                    return Ok(Protocol::LegacyHub);
                }
            }
        }
    }
    if handle.startup().is_some() {
        return Ok(Protocol::Startup);
    }
    Ok(Protocol::Unknown)
}

/// [`classify`] with the version literal taken from a [`GateConfig`].
pub fn classify_with_config(
    handle: &dyn TypesetRuntime,
    config: &GateConfig,
) -> Result<Protocol, GateError> {
    classify(handle, config.expected_version.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::SimulatedRuntime;

    #[test]
    fn test_legacy_markers_without_version_fence() {
        let runtime = SimulatedRuntime::legacy("2.7.7");
        assert_eq!(classify(&runtime, None).unwrap(), Protocol::LegacyHub);
    }

    #[test]
    fn test_legacy_version_fence_exact_match() {
        let runtime = SimulatedRuntime::legacy("2.7.7");
        assert_eq!(
            classify(&runtime, Some("2.7.7")).unwrap(),
            Protocol::LegacyHub
        );
    }

    #[test]
    fn test_legacy_version_fence_mismatch_is_unknown() {
        let runtime = SimulatedRuntime::legacy("2.6.0");
        assert_eq!(classify(&runtime, Some("2.7.7")).unwrap(), Protocol::Unknown);
    }

    #[test]
    fn test_startup_markers() {
        let runtime = SimulatedRuntime::modern();
        assert_eq!(classify(&runtime, None).unwrap(), Protocol::Startup);
        // The version fence only applies to the legacy branch.
        assert_eq!(classify(&runtime, Some("2.7.7")).unwrap(), Protocol::Startup);
    }

    #[test]
    fn test_no_markers_is_unknown() {
        let runtime = SimulatedRuntime::bare();
        assert_eq!(classify(&runtime, None).unwrap(), Protocol::Unknown);
    }

    #[test]
    fn test_failing_version_accessor_propagates() {
        let runtime = SimulatedRuntime::legacy("2.7.7").with_failing_version_access();
        let err = classify(&runtime, Some("2.7.7")).unwrap_err();
        assert!(matches!(err, GateError::HandleInspection(_)));
    }

    #[test]
    fn test_classify_with_config_uses_configured_fence() {
        let runtime = SimulatedRuntime::legacy("2.6.0");
        let mut config = GateConfig::default();
        config.expected_version = Some("2.7.7".to_string());
        assert_eq!(
            classify_with_config(&runtime, &config).unwrap(),
            Protocol::Unknown
        );
    }
}

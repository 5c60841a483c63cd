use std::sync::Arc;

use tracing::warn;

use super::backend::EngineFactory;
use super::scripted::ScriptedFactory;
use crate::config::RecognitionSettings;

/// Outcome of probing the host for a speech-recognition capability
///
/// Absence is a reportable condition, not a crash: sessions built on an
/// `Unavailable` capability construct normally, surface the reason once, and
/// treat every engine-touching operation as a no-op.
#[derive(Clone)]
pub enum Capability {
    /// A recognition engine can be built on this host
    Available(Arc<dyn EngineFactory>),
    /// No recognition capability; `reason` is shown to the user
    Unavailable { reason: String },
}

impl Capability {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    /// Capability that always reports the stock "unsupported host" reason
    pub fn unsupported_host() -> Self {
        Capability::Unavailable {
            reason: "speech recognition is not supported by this host".to_string(),
        }
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Available(factory) => {
                f.debug_tuple("Available").field(&factory.name()).finish()
            }
            Capability::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Probe the configured recognition backend
///
/// Returns `Unavailable` (never an error) when the backend is missing or
/// cannot be constructed, so callers can surface the reason through the
/// session error channel.
pub fn detect(settings: &RecognitionSettings) -> Capability {
    match settings.backend.as_str() {
        "scripted" => match settings.script_path.as_deref() {
            Some(path) => match ScriptedFactory::from_file(path) {
                Ok(factory) => Capability::Available(Arc::new(factory)),
                Err(e) => {
                    warn!("failed to load recognition script {}: {}", path, e);
                    Capability::Unavailable {
                        reason: format!("recognition script unusable: {e}"),
                    }
                }
            },
            None => Capability::Unavailable {
                reason: "scripted recognition backend requires a script_path".to_string(),
            },
        },
        "none" => Capability::unsupported_host(),
        other => Capability::Unavailable {
            reason: format!("unknown recognition backend: {other}"),
        },
    }
}

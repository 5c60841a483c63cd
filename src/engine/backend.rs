use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Configuration handed to an engine factory when building a handle
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// BCP-47 language tag the engine recognizes
    pub language: String,
    /// Keep listening across utterances instead of stopping after the first
    pub continuous: bool,
    /// Deliver interim (non-final) hypotheses while the user is speaking
    pub interim_results: bool,
    /// How many alternatives to request per result
    pub max_alternatives: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: crate::language::DEFAULT_LANGUAGE.to_string(),
            continuous: true,
            interim_results: true,
            max_alternatives: 1,
        }
    }
}

impl EngineConfig {
    /// Continuous, interim-enabled dictation in the given language
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }
}

/// One recognition hypothesis for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    pub transcript: String,
    pub confidence: Option<f32>,
}

/// A single recognized utterance, final or interim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Hypotheses ordered best-first
    pub alternatives: Vec<Hypothesis>,
    /// Whether this result is finalized (interim results may still change)
    pub is_final: bool,
}

impl RecognitionResult {
    /// The engine's best hypothesis
    pub fn top(&self) -> Option<&Hypothesis> {
        self.alternatives.first()
    }
}

/// A batch of results as delivered by the engine
///
/// The engine re-delivers its full result list each time; `resume_index` is
/// the cursor of the first result that changed since the previous batch.
/// Consumers must only process results from the cursor onward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBatch {
    pub resume_index: usize,
    pub results: Vec<RecognitionResult>,
}

impl ResultBatch {
    /// Results at or after the resume cursor, in index order
    pub fn new_results(&self) -> &[RecognitionResult] {
        let start = self.resume_index.min(self.results.len());
        &self.results[start..]
    }
}

/// Classified engine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultKind {
    /// Silence timeout: no speech detected
    NoSpeech,
    /// Microphone/audio input failure
    AudioCapture,
    /// Microphone permission denied
    NotAllowed,
    /// Network failure reaching the recognition service
    Network,
    /// Recognition was aborted
    Aborted,
    /// Recognition service refused the request
    ServiceNotAllowed,
    /// Anything the engine could not classify
    Other,
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FaultKind::NoSpeech => "no-speech",
            FaultKind::AudioCapture => "audio-capture",
            FaultKind::NotAllowed => "not-allowed",
            FaultKind::Network => "network",
            FaultKind::Aborted => "aborted",
            FaultKind::ServiceNotAllowed => "service-not-allowed",
            FaultKind::Other => "other",
        };
        f.write_str(label)
    }
}

/// A runtime failure reported by the engine
#[derive(Debug, Clone)]
pub struct EngineFault {
    pub kind: FaultKind,
    pub detail: Option<String>,
}

impl EngineFault {
    pub fn new(kind: FaultKind) -> Self {
        Self { kind, detail: None }
    }
}

impl std::fmt::Display for EngineFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.kind, detail),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EngineFault {}

/// Event stream produced by a live engine handle
///
/// The channel closing means the engine ended the stream on its own (e.g.
/// after a fatal fault or end of input).
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A batch of recognition results
    Results(ResultBatch),
    /// A recognition failure; the engine may or may not keep going
    Fault(EngineFault),
}

/// Streaming speech-recognition engine handle
///
/// Implementations:
/// - Scripted: replays a scripted event sequence (demo/batch/testing)
/// - A platform recognition service, when the host provides one
#[async_trait::async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Begin producing results
    ///
    /// Returns a channel receiver that will receive engine events
    async fn start(&mut self) -> Result<mpsc::Receiver<EngineEvent>>;

    /// Cease producing results
    ///
    /// Must be safe to call when the engine already stopped on its own.
    async fn stop(&mut self) -> Result<()>;

    /// Check if the engine is currently producing results
    fn is_listening(&self) -> bool;

    /// Get engine name for logging
    fn name(&self) -> &str;
}

/// Builds engine handles for a probed capability
///
/// A session discards its handle and asks the factory for a replacement
/// whenever the language changes; live engines cannot be reconfigured.
pub trait EngineFactory: Send + Sync {
    fn create(&self, config: EngineConfig) -> Result<Box<dyn RecognitionEngine>>;

    /// Get factory name for logging
    fn name(&self) -> &str;
}

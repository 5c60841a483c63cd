//! Scripted recognition engine
//!
//! Replays a predeclared sequence of engine events, optionally spaced out in
//! time. This is the batch/demo counterpart of a live platform engine: the
//! shipped binary runs it when configured with a script file, and tests drive
//! it directly.
//!
//! Script files are JSON:
//!
//! ```json
//! {
//!   "steps": [
//!     { "delay_ms": 200, "type": "results", "resume_index": 0,
//!       "results": [ { "text": "hello period", "is_final": true } ] },
//!     { "type": "fault", "kind": "no-speech" }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use super::backend::{
    EngineConfig, EngineEvent, EngineFactory, EngineFault, FaultKind, Hypothesis,
    RecognitionEngine, RecognitionResult, ResultBatch,
};

/// One scripted utterance inside a results step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptResult {
    pub text: String,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// The event a script step produces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Results {
        #[serde(default)]
        resume_index: usize,
        results: Vec<ScriptResult>,
    },
    Fault {
        kind: FaultKind,
    },
}

/// A single step of the replay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Pause before emitting this step
    #[serde(default)]
    pub delay_ms: u64,

    #[serde(flatten)]
    pub event: ScriptEvent,
}

/// A full replay script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recognition script {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse recognition script {}", path.display()))
    }
}

impl ScriptEvent {
    fn to_engine_event(&self) -> EngineEvent {
        match self {
            ScriptEvent::Results {
                resume_index,
                results,
            } => EngineEvent::Results(ResultBatch {
                resume_index: *resume_index,
                results: results
                    .iter()
                    .map(|r| RecognitionResult {
                        alternatives: vec![Hypothesis {
                            transcript: r.text.clone(),
                            confidence: r.confidence,
                        }],
                        is_final: r.is_final,
                    })
                    .collect(),
            }),
            ScriptEvent::Fault { kind } => EngineEvent::Fault(EngineFault::new(*kind)),
        }
    }
}

/// Engine handle that replays a [`Script`] from the beginning on every start
pub struct ScriptedEngine {
    script: Script,
    language: String,
    listening: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl ScriptedEngine {
    pub fn new(script: Script, config: &EngineConfig) -> Self {
        Self {
            script,
            language: config.language.clone(),
            listening: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait::async_trait]
impl RecognitionEngine for ScriptedEngine {
    async fn start(&mut self) -> Result<mpsc::Receiver<EngineEvent>> {
        let (tx, rx) = mpsc::channel(16);

        // Fresh flags per start so a leftover feeder from a previous run
        // cannot clobber this run's state.
        self.listening = Arc::new(AtomicBool::new(true));
        self.cancel = Arc::new(AtomicBool::new(false));

        let steps = self.script.steps.clone();
        let listening = Arc::clone(&self.listening);
        let cancel = Arc::clone(&self.cancel);
        let language = self.language.clone();

        tokio::spawn(async move {
            debug!("scripted engine started ({} steps, lang {})", steps.len(), language);

            for step in &steps {
                if step.delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
                }

                if cancel.load(Ordering::SeqCst) {
                    break;
                }

                if tx.send(step.event.to_engine_event()).await.is_err() {
                    // Receiver detached; nothing left to feed
                    break;
                }
            }

            listening.store(false, Ordering::SeqCst);
            debug!("scripted engine finished");
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.cancel.store(true, Ordering::SeqCst);
        self.listening.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Factory handing out [`ScriptedEngine`] handles over a shared script
#[derive(Debug, Clone)]
pub struct ScriptedFactory {
    script: Script,
}

impl ScriptedFactory {
    pub fn new(script: Script) -> Self {
        Self { script }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Script::from_file(path)?))
    }
}

impl EngineFactory for ScriptedFactory {
    fn create(&self, config: EngineConfig) -> Result<Box<dyn RecognitionEngine>> {
        Ok(Box::new(ScriptedEngine::new(self.script.clone(), &config)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// Shared test fixtures
//
// `PushFactory` builds recognition engines whose event streams are fed by
// hand from the test, so event ordering is fully deterministic.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use webscribe::engine::{
    Capability, EngineConfig, EngineEvent, EngineFactory, EngineFault, FaultKind, Hypothesis,
    RecognitionEngine, RecognitionResult, ResultBatch,
};
use webscribe::session::SessionEvent;

/// One started engine run, feedable from the test
#[derive(Clone)]
pub struct PushHandle {
    pub language: String,
    pub tx: mpsc::Sender<EngineEvent>,
}

/// Factory that records every engine it builds and every run it starts
#[derive(Clone, Default)]
pub struct PushFactory {
    runs: Arc<Mutex<Vec<PushHandle>>>,
    created: Arc<Mutex<Vec<String>>>,
}

impl PushFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capability(&self) -> Capability {
        Capability::Available(Arc::new(self.clone()))
    }

    /// Languages the factory was asked to build engines for, in order
    pub fn created_languages(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    /// The handle feeding run `index` (in start order)
    pub fn run(&self, index: usize) -> PushHandle {
        self.runs.lock().unwrap()[index].clone()
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }

    /// Drop the stored sender for run `index`, closing its event stream
    /// (simulates the engine ending the stream on its own). Only valid when
    /// the test holds no other clone of that handle.
    pub fn close_run(&self, index: usize) {
        self.runs.lock().unwrap().remove(index);
    }
}

impl EngineFactory for PushFactory {
    fn create(&self, config: EngineConfig) -> Result<Box<dyn RecognitionEngine>> {
        self.created.lock().unwrap().push(config.language.clone());

        Ok(Box::new(PushEngine {
            language: config.language,
            runs: Arc::clone(&self.runs),
            listening: false,
        }))
    }

    fn name(&self) -> &str {
        "push"
    }
}

pub struct PushEngine {
    language: String,
    runs: Arc<Mutex<Vec<PushHandle>>>,
    listening: bool,
}

#[async_trait::async_trait]
impl RecognitionEngine for PushEngine {
    async fn start(&mut self) -> Result<mpsc::Receiver<EngineEvent>> {
        let (tx, rx) = mpsc::channel(16);

        self.runs.lock().unwrap().push(PushHandle {
            language: self.language.clone(),
            tx,
        });
        self.listening = true;

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.listening = false;
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.listening
    }

    fn name(&self) -> &str {
        "push"
    }
}

pub fn final_result(text: &str) -> RecognitionResult {
    RecognitionResult {
        alternatives: vec![Hypothesis {
            transcript: text.to_string(),
            confidence: Some(0.9),
        }],
        is_final: true,
    }
}

pub fn interim_result(text: &str) -> RecognitionResult {
    RecognitionResult {
        alternatives: vec![Hypothesis {
            transcript: text.to_string(),
            confidence: None,
        }],
        is_final: false,
    }
}

pub fn batch(resume_index: usize, results: Vec<RecognitionResult>) -> EngineEvent {
    EngineEvent::Results(ResultBatch {
        resume_index,
        results,
    })
}

pub fn fault(kind: FaultKind) -> EngineEvent {
    EngineEvent::Fault(EngineFault::new(kind))
}

/// Receive the next session event, failing the test after two seconds
pub async fn next_event(rx: &mut broadcast::Receiver<SessionEvent>) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for session event")
        .expect("session event channel closed")
}

/// Skip events until one matches the predicate
pub async fn wait_for(
    rx: &mut broadcast::Receiver<SessionEvent>,
    pred: impl Fn(&SessionEvent) -> bool,
) -> SessionEvent {
    loop {
        let event = next_event(rx).await;
        if pred(&event) {
            return event;
        }
    }
}

pub async fn wait_for_transcript_update(rx: &mut broadcast::Receiver<SessionEvent>) -> String {
    match wait_for(rx, |e| matches!(e, SessionEvent::TranscriptUpdate { .. })).await {
        SessionEvent::TranscriptUpdate { transcript, .. } => transcript,
        _ => unreachable!(),
    }
}

pub async fn wait_for_error(rx: &mut broadcast::Receiver<SessionEvent>) -> String {
    match wait_for(rx, |e| matches!(e, SessionEvent::Error { .. })).await {
        SessionEvent::Error { message } => message,
        _ => unreachable!(),
    }
}

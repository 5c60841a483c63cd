use super::config::SessionConfig;
use super::error::SessionError;
use super::stats::{SessionState, SessionStats};
use super::transcript::{finalized_text, TranscriptBuffer};
use crate::engine::{Capability, EngineConfig, EngineEvent, EngineFactory, RecognitionEngine};
use crate::language;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, info, warn};

/// Notifications emitted by a recognition session
///
/// Delivered over a broadcast channel in processing order; subscribers that
/// lag simply miss events (the transcript itself is always queryable).
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Fired once per result batch that contributed finalized text
    TranscriptUpdate { appended: String, transcript: String },
    /// An engine fault or capability failure, normalized to a short message
    Error { message: String },
    /// The session moved to a new lifecycle state
    StateChanged { state: SessionState },
}

struct Inner {
    state: SessionState,
    language: String,

    /// The live engine handle; `None` when the capability is unavailable or
    /// the handle was released
    engine: Option<Box<dyn RecognitionEngine>>,

    /// Bumped whenever the handle is started, replaced, or invalidated.
    /// Events from a handle whose generation no longer matches are discarded,
    /// so a discarded handle's in-flight callbacks can never mutate the
    /// buffer.
    generation: u64,

    transcript: TranscriptBuffer,

    /// Last reported error (last-error semantics, not a log); cleared by a
    /// fresh successful start or an explicit reset
    last_error: Option<String>,

    /// Whether the capability-unavailable condition was already reported
    capability_reported: bool,
}

/// A dictation session that manages one recognition engine lifecycle,
/// accumulates finalized results into a stable transcript, and surfaces
/// recoverable vs. fatal errors
pub struct RecognitionSession {
    config: SessionConfig,

    /// Engine factory when the host has a recognition capability
    factory: Option<Arc<dyn EngineFactory>>,

    /// Why the capability is missing, when it is
    unavailable_reason: Option<String>,

    /// When the session was created
    started_at: DateTime<Utc>,

    inner: Arc<Mutex<Inner>>,

    events: broadcast::Sender<SessionEvent>,
}

impl RecognitionSession {
    /// Create a new recognition session
    ///
    /// With an available capability this eagerly builds an engine handle for
    /// the configured language. With an unavailable one the session still
    /// constructs: the reason becomes the current error string and every
    /// engine-touching operation is a no-op.
    pub fn new(config: SessionConfig, capability: Capability) -> Result<Self, SessionError> {
        language::find(&config.language)
            .ok_or_else(|| SessionError::UnknownLanguage(config.language.clone()))?;

        let (factory, unavailable_reason) = match capability {
            Capability::Available(factory) => (Some(factory), None),
            Capability::Unavailable { reason } => {
                warn!(
                    "session {} created without recognition capability: {}",
                    config.session_id, reason
                );
                (None, Some(reason))
            }
        };

        let engine = match factory.as_ref() {
            Some(factory) => Some(
                factory
                    .create(EngineConfig::for_language(config.language.as_str()))
                    .map_err(|e| SessionError::Engine(e.to_string()))?,
            ),
            None => None,
        };

        let (events, _) = broadcast::channel(64);

        info!(
            "created recognition session {} (language {})",
            config.session_id, config.language
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                state: SessionState::Idle,
                language: config.language.clone(),
                engine,
                generation: 0,
                transcript: TranscriptBuffer::new(),
                last_error: unavailable_reason.clone(),
                capability_reported: false,
            })),
            factory,
            unavailable_reason,
            started_at: Utc::now(),
            events,
            config,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Start listening
    ///
    /// Legal from `Idle` and `Stopped`; clears the error string on success.
    /// Fails with `InvalidState` while already listening and with
    /// `CapabilityUnavailable` (reported through the event channel exactly
    /// once) when the host has no recognition capability.
    pub async fn start(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;

        let Some(factory) = self.factory.as_ref() else {
            if !inner.capability_reported {
                inner.capability_reported = true;
                let message = self
                    .unavailable_reason
                    .clone()
                    .unwrap_or_else(|| SessionError::CapabilityUnavailable.to_string());
                inner.last_error = Some(message.clone());
                drop(inner);
                self.emit(SessionEvent::Error { message });
            }
            return Err(SessionError::CapabilityUnavailable);
        };

        if inner.state == SessionState::Listening {
            warn!(
                "start ignored: session {} is already listening",
                self.config.session_id
            );
            return Err(SessionError::InvalidState {
                op: "start",
                state: inner.state,
            });
        }

        // The handle is released on teardown and after a failed language
        // switch; rebuild it for the current language if needed.
        if inner.engine.is_none() {
            let engine = factory
                .create(EngineConfig::for_language(inner.language.as_str()))
                .map_err(|e| SessionError::Engine(e.to_string()))?;
            inner.engine = Some(engine);
        }

        let engine_events = match inner.engine.as_mut() {
            Some(engine) => engine
                .start()
                .await
                .map_err(|e| SessionError::Engine(e.to_string()))?,
            None => return Err(SessionError::CapabilityUnavailable),
        };

        inner.state = SessionState::Listening;
        inner.last_error = None;
        inner.generation += 1;
        let generation = inner.generation;
        drop(inner);

        info!(
            "session {} listening (generation {})",
            self.config.session_id, generation
        );
        self.emit(SessionEvent::StateChanged {
            state: SessionState::Listening,
        });
        self.spawn_event_pump(engine_events, generation);

        Ok(())
    }

    /// Stop listening
    ///
    /// Idempotent: a no-op when not listening, including when the engine
    /// already ended the stream on its own.
    pub async fn stop(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;

        if inner.state != SessionState::Listening {
            debug!(
                "stop ignored: session {} is not listening",
                self.config.session_id
            );
            return Ok(());
        }

        if let Some(engine) = inner.engine.as_mut() {
            if let Err(e) = engine.stop().await {
                warn!("failed to stop recognition engine: {}", e);
            }
        }

        inner.state = SessionState::Stopped;
        drop(inner);

        info!("session {} stopped", self.config.session_id);
        self.emit(SessionEvent::StateChanged {
            state: SessionState::Stopped,
        });

        Ok(())
    }

    /// Switch the dictation language
    ///
    /// Live engines cannot change language, so the current handle is stopped
    /// and discarded before a replacement is built for the new language. The
    /// session is forced to `Stopped` and the transcript is cleared: segments
    /// from different languages must not be concatenated. Does not start
    /// listening.
    pub async fn set_language(&self, code: &str) -> Result<(), SessionError> {
        let lang =
            language::find(code).ok_or_else(|| SessionError::UnknownLanguage(code.to_string()))?;

        let Some(factory) = self.factory.as_ref() else {
            return Err(SessionError::CapabilityUnavailable);
        };

        let mut inner = self.inner.lock().await;

        // Fully discard the old handle, generation included, before touching
        // the buffer: its in-flight callbacks must not land in the fresh one.
        if let Some(mut engine) = inner.engine.take() {
            if let Err(e) = engine.stop().await {
                warn!("failed to stop replaced engine: {}", e);
            }
        }
        inner.generation += 1;
        inner.state = SessionState::Stopped;
        inner.transcript.clear();

        let engine = factory
            .create(EngineConfig::for_language(lang.code))
            .map_err(|e| SessionError::Engine(e.to_string()))?;
        inner.engine = Some(engine);
        inner.language = lang.code.to_string();
        drop(inner);

        info!(
            "session {} language set to {} ({})",
            self.config.session_id, lang.code, lang.name
        );
        self.emit(SessionEvent::StateChanged {
            state: SessionState::Stopped,
        });

        Ok(())
    }

    /// Return to `Idle` with an empty transcript and no error
    pub async fn reset(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;

        if inner.state == SessionState::Listening {
            if let Some(engine) = inner.engine.as_mut() {
                if let Err(e) = engine.stop().await {
                    warn!("failed to stop recognition engine: {}", e);
                }
            }
        }

        inner.generation += 1;
        inner.state = SessionState::Idle;
        inner.transcript.clear();
        inner.last_error = None;
        drop(inner);

        info!("session {} reset", self.config.session_id);
        self.emit(SessionEvent::StateChanged {
            state: SessionState::Idle,
        });

        Ok(())
    }

    /// Release the engine handle for teardown
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;

        inner.generation += 1;
        if let Some(mut engine) = inner.engine.take() {
            if let Err(e) = engine.stop().await {
                warn!("failed to stop recognition engine: {}", e);
            }
        }
        inner.state = SessionState::Stopped;
        drop(inner);

        info!("session {} shut down", self.config.session_id);
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    pub async fn is_listening(&self) -> bool {
        self.state().await == SessionState::Listening
    }

    pub async fn language(&self) -> String {
        self.inner.lock().await.language.clone()
    }

    /// The accumulated transcript (finalized segments only)
    pub async fn transcript(&self) -> String {
        self.inner.lock().await.transcript.text()
    }

    /// Current error string, if any
    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.last_error.clone()
    }

    /// Get a snapshot of the session for status queries
    pub async fn stats(&self) -> SessionStats {
        let inner = self.inner.lock().await;
        let duration = Utc::now().signed_duration_since(self.started_at);

        SessionStats {
            session_id: self.config.session_id.clone(),
            state: inner.state,
            language: inner.language.clone(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            segments_count: inner.transcript.segment_count(),
            transcript_chars: inner.transcript.char_count(),
            error: inner.last_error.clone(),
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine; the transcript is always queryable.
        let _ = self.events.send(event);
    }

    /// Drain engine events into the transcript and error state
    ///
    /// One event is processed to completion at a time. Results only apply
    /// while the session is listening and the originating handle is still the
    /// live one; faults are recorded but do not force a state transition (the
    /// session reflects whatever the engine subsequently does).
    fn spawn_event_pump(&self, mut engine_events: mpsc::Receiver<EngineEvent>, generation: u64) {
        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        let session_id = self.config.session_id.clone();

        tokio::spawn(async move {
            debug!("event pump started for session {session_id} (generation {generation})");

            while let Some(event) = engine_events.recv().await {
                let mut guard = inner.lock().await;

                if guard.generation != generation {
                    debug!("session {session_id}: dropping event from stale engine handle");
                    continue;
                }

                match event {
                    EngineEvent::Results(batch) => {
                        if guard.state != SessionState::Listening {
                            continue;
                        }

                        if let Some(appended) = finalized_text(&batch) {
                            guard.transcript.append(appended.clone());
                            let transcript = guard.transcript.text();
                            drop(guard);
                            let _ = events.send(SessionEvent::TranscriptUpdate {
                                appended,
                                transcript,
                            });
                        }
                    }
                    EngineEvent::Fault(fault) => {
                        let message = format!("recognition error: {fault}");
                        warn!("session {session_id}: {message}");
                        guard.last_error = Some(message.clone());
                        drop(guard);
                        let _ = events.send(SessionEvent::Error { message });
                    }
                }
            }

            // The engine ended the stream on its own; reflect that if this
            // handle is still the live one.
            let mut guard = inner.lock().await;
            if guard.generation == generation && guard.state == SessionState::Listening {
                guard.state = SessionState::Stopped;
                drop(guard);
                info!("session {session_id}: engine ended the stream, session stopped");
                let _ = events.send(SessionEvent::StateChanged {
                    state: SessionState::Stopped,
                });
            }

            debug!("event pump stopped for session {session_id} (generation {generation})");
        });
    }
}

pub mod config;
pub mod engine;
pub mod export;
pub mod http;
pub mod language;
pub mod session;

pub use config::{Config, RecognitionSettings};
pub use engine::{
    Capability, EngineConfig, EngineEvent, EngineFactory, EngineFault, FaultKind, Hypothesis,
    RecognitionEngine, RecognitionResult, ResultBatch, Script, ScriptedFactory,
};
pub use export::{transcript_download, TranscriptDownload, TRANSCRIPT_FILENAME, TRANSCRIPT_MIME};
pub use http::{create_router, AppState};
pub use language::{Language, DEFAULT_LANGUAGE, LANGUAGES};
pub use session::{
    RecognitionSession, SessionConfig, SessionError, SessionEvent, SessionState, SessionStats,
};

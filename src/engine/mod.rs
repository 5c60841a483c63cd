//! Speech-recognition engine boundary
//!
//! The engine is an opaque streaming capability: configured with a language,
//! it delivers cursor-indexed result batches and discrete faults over a
//! channel. Hosts without any recognition capability are represented by
//! [`Capability::Unavailable`], which sessions surface as a reportable
//! condition rather than a crash.

pub mod backend;
pub mod probe;
pub mod scripted;

pub use backend::{
    EngineConfig, EngineEvent, EngineFactory, EngineFault, FaultKind, Hypothesis,
    RecognitionEngine, RecognitionResult, ResultBatch,
};
pub use probe::{detect, Capability};
pub use scripted::{Script, ScriptEvent, ScriptResult, ScriptStep, ScriptedEngine, ScriptedFactory};

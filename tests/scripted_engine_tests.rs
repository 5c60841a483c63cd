// Integration tests for the scripted engine and capability probe
//
// The scripted backend replays a declared event sequence; these tests run a
// full session on top of it and exercise the script file loader.

mod common;

use std::io::Write;

use anyhow::Result;
use common::wait_for;
use tempfile::TempDir;
use webscribe::config::RecognitionSettings;
use webscribe::engine::{
    probe, Capability, Script, ScriptEvent, ScriptResult, ScriptStep, ScriptedFactory,
};
use webscribe::session::{RecognitionSession, SessionConfig, SessionEvent, SessionState};

fn results_step(delay_ms: u64, resume_index: usize, results: Vec<ScriptResult>) -> ScriptStep {
    ScriptStep {
        delay_ms,
        event: ScriptEvent::Results {
            resume_index,
            results,
        },
    }
}

fn scripted(text: &str, is_final: bool) -> ScriptResult {
    ScriptResult {
        text: text.to_string(),
        is_final,
        confidence: None,
    }
}

#[tokio::test]
async fn test_session_replays_a_script_to_completion() -> Result<()> {
    let script = Script {
        steps: vec![
            results_step(0, 0, vec![scripted("hel", false)]),
            results_step(0, 0, vec![scripted("hello period", true)]),
            results_step(0, 1, vec![
                scripted("hello period", true),
                scripted(" see you", true),
            ]),
        ],
    };

    let capability = Capability::Available(std::sync::Arc::new(ScriptedFactory::new(script)));
    let session = RecognitionSession::new(SessionConfig::with_language("en-US"), capability)?;
    let mut events = session.subscribe();

    session.start().await?;

    // The script runs dry, the stream closes, and the session reflects it
    wait_for(&mut events, |e| {
        matches!(
            e,
            SessionEvent::StateChanged {
                state: SessionState::Stopped
            }
        )
    })
    .await;

    assert_eq!(session.transcript().await, "hello . see you");

    Ok(())
}

#[tokio::test]
async fn test_stop_interrupts_a_replay() -> Result<()> {
    let script = Script {
        steps: vec![
            results_step(0, 0, vec![scripted("first ", true)]),
            // Long tail the test stops before
            results_step(60_000, 0, vec![scripted("never", true)]),
        ],
    };

    let capability = Capability::Available(std::sync::Arc::new(ScriptedFactory::new(script)));
    let session = RecognitionSession::new(SessionConfig::with_language("en-US"), capability)?;
    let mut events = session.subscribe();

    session.start().await?;
    wait_for(&mut events, |e| {
        matches!(e, SessionEvent::TranscriptUpdate { .. })
    })
    .await;

    session.stop().await?;

    assert_eq!(session.state().await, SessionState::Stopped);
    assert_eq!(session.transcript().await, "first ");

    Ok(())
}

#[test]
fn test_script_round_trips_through_a_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("script.json");

    let mut file = std::fs::File::create(&path)?;
    write!(
        file,
        r#"{{
            "steps": [
                {{ "delay_ms": 50, "type": "results", "resume_index": 0,
                   "results": [ {{ "text": "hello period", "is_final": true }} ] }},
                {{ "type": "fault", "kind": "no-speech" }}
            ]
        }}"#
    )?;

    let script = Script::from_file(&path)?;
    assert_eq!(script.steps.len(), 2);
    assert_eq!(script.steps[0].delay_ms, 50);
    assert!(matches!(
        &script.steps[0].event,
        ScriptEvent::Results { results, .. } if results[0].is_final
    ));
    assert_eq!(script.steps[1].delay_ms, 0);
    assert!(matches!(&script.steps[1].event, ScriptEvent::Fault { .. }));

    Ok(())
}

#[test]
fn test_missing_script_file_is_an_error() {
    assert!(Script::from_file("/nonexistent/script.json").is_err());
}

#[test]
fn test_probe_resolves_a_scripted_backend() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("script.json");
    std::fs::write(&path, r#"{ "steps": [] }"#)?;

    let settings = RecognitionSettings {
        backend: "scripted".to_string(),
        script_path: Some(path.to_string_lossy().to_string()),
        default_language: "vi".to_string(),
    };

    assert!(probe::detect(&settings).is_available());

    Ok(())
}

#[test]
fn test_probe_reports_unusable_and_missing_backends() {
    let no_path = RecognitionSettings {
        backend: "scripted".to_string(),
        script_path: None,
        default_language: "vi".to_string(),
    };
    assert!(!probe::detect(&no_path).is_available());

    let none = RecognitionSettings {
        backend: "none".to_string(),
        script_path: None,
        default_language: "vi".to_string(),
    };
    match probe::detect(&none) {
        Capability::Unavailable { reason } => {
            assert!(reason.contains("not supported"), "unexpected reason: {reason}")
        }
        Capability::Available(_) => panic!("expected Unavailable"),
    }

    let unknown = RecognitionSettings {
        backend: "telepathy".to_string(),
        script_path: None,
        default_language: "vi".to_string(),
    };
    assert!(!probe::detect(&unknown).is_available());
}

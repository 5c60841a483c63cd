// Unit tests for service configuration loading

use anyhow::Result;
use tempfile::TempDir;
use webscribe::Config;

fn write_config(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("webscribe.toml");
    std::fs::write(&path, contents).expect("write config");
    dir.path().join("webscribe").to_string_lossy().to_string()
}

#[test]
fn test_load_full_config() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
        [service]
        name = "webscribe"

        [service.http]
        bind = "127.0.0.1"
        port = 8090

        [recognition]
        backend = "scripted"
        script_path = "config/demo-script.json"
        default_language = "en-US"
        "#,
    );

    let cfg = Config::load(&path)?;

    assert_eq!(cfg.service.name, "webscribe");
    assert_eq!(cfg.service.http.bind, "127.0.0.1");
    assert_eq!(cfg.service.http.port, 8090);
    assert_eq!(cfg.recognition.backend, "scripted");
    assert_eq!(
        cfg.recognition.script_path.as_deref(),
        Some("config/demo-script.json")
    );
    assert_eq!(cfg.recognition.default_language, "en-US");

    Ok(())
}

#[test]
fn test_default_language_falls_back_to_catalog_default() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
        [service]
        name = "webscribe"

        [service.http]
        bind = "0.0.0.0"
        port = 8090

        [recognition]
        backend = "none"
        "#,
    );

    let cfg = Config::load(&path)?;

    assert_eq!(cfg.recognition.backend, "none");
    assert_eq!(cfg.recognition.script_path, None);
    assert_eq!(cfg.recognition.default_language, "vi");

    Ok(())
}

#[test]
fn test_missing_config_file_is_an_error() {
    assert!(Config::load("/nonexistent/webscribe").is_err());
}

//! Tests for the configuration file layer.

use std::io::Write;

use palaver::agent::Agent;
use palaver::config::AgentConfig;
use palaver::error::PalaverError;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_values_override_defaults() {
    let file = write_config(
        r#"
model = "gpt-4o"
base_url = "http://localhost:8080/v1"
max_memory = 20

[settings]
temperature = 0.3
max_tokens = 512
"#,
    );

    let config = AgentConfig::from_file(file.path()).unwrap();

    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
    assert_eq!(config.max_memory, 20);
    assert_eq!(config.settings.temperature, Some(0.3));
    assert_eq!(config.settings.max_tokens, Some(512));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.connect_timeout_secs, 10);
}

#[test]
fn invalid_toml_is_reported() {
    let file = write_config("model = [unclosed");
    let err = AgentConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, PalaverError::Toml(_)));
}

#[test]
fn explicit_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AgentConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
    assert!(matches!(err, PalaverError::Io(_)));
}

#[test]
fn env_layer_sits_above_the_file() {
    let file = write_config("model = \"from-file\"\napi_key = \"sk-file\"");
    let mut config = AgentConfig::from_file(file.path()).unwrap();

    config
        .apply_env_from(|key| match key {
            "OPENAI_API_KEY" => Some("sk-env".to_string()),
            "PALAVER_MAX_MEMORY" => Some("42".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.model, "from-file");
    assert_eq!(config.api_key.as_deref(), Some("sk-env"));
    assert_eq!(config.max_memory, 42);
}

#[test]
fn agent_from_config_requires_api_key() {
    let err = Agent::from_config(&AgentConfig::default()).unwrap_err();
    assert!(matches!(err, PalaverError::Authentication(ref m) if m == "Missing OPENAI_API_KEY"));
}

#[test]
fn agent_from_config_applies_memory_bound() {
    let config = AgentConfig::default()
        .with_api_key("sk-test")
        .with_model("gpt-4o")
        .with_max_memory(7);
    let agent = Agent::from_config(&config).unwrap();
    assert_eq!(agent.model(), "gpt-4o");
    assert_eq!(agent.memory().max_size(), 7);
}

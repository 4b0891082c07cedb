//! Unit tests for configuration sources and their precedence
//!
//! Environment tests mutate process-wide state, so they run serially.

#[cfg(test)]
mod config_loading_tests {
    use std::io::Write;

    use omnipdf_smoke::config::{CliOverrides, ConfigError, SmokeConfig};
    use serial_test::serial;

    const SMOKE_VARS: [&str; 10] = [
        "SMOKE_BASE_URL",
        "SMOKE_PATH",
        "SMOKE_MARKER",
        "SMOKE_TIMEOUT_SECS",
        "BACKEND_TIMEOUT_SECS",
        "PDF_PROCESSOR_URL",
        "PDF_EXTRACTOR_URL",
        "CHAT_URL",
        "DOCLING_TRANSLATION_URL",
        "EMBEDDER_URL",
    ];

    fn clear_env() {
        for key in SMOKE_VARS {
            std::env::remove_var(key);
        }
    }

    fn set_env(key: &str, value: &str) {
        std::env::set_var(key, value);
    }

    fn write_yaml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    #[serial]
    fn test_env_defaults() {
        clear_env();
        let config = SmokeConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://localhost:8501");
        assert_eq!(config.target_url(), "http://localhost:8501/");
        assert_eq!(config.marker, "Streamlit");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.backend_timeout_secs, 5);
        assert_eq!(config.services[0].name, "PDF Processor");
        assert_eq!(config.services[0].url, "http://localhost:8080/pdf_processor");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        set_env("SMOKE_BASE_URL", "http://omnipdf-frontend:8501");
        set_env("SMOKE_MARKER", "OmniPDF");
        set_env("SMOKE_TIMEOUT_SECS", "10");
        set_env("CHAT_URL", "http://chat:9000");

        let config = SmokeConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.target_url(), "http://omnipdf-frontend:8501/");
        assert_eq!(config.marker, "OmniPDF");
        assert_eq!(config.timeout_secs, 10);
        let chat = config
            .services
            .iter()
            .find(|s| s.name == "Chat Service")
            .unwrap();
        assert_eq!(chat.url, "http://chat:9000");
    }

    #[test]
    #[serial]
    fn test_env_unparseable_timeout() {
        clear_env();
        set_env("SMOKE_TIMEOUT_SECS", "soon");
        let result = SmokeConfig::from_env();
        clear_env();

        match result {
            Err(ConfigError::Parse { field, value, .. }) => {
                assert_eq!(field, "SMOKE_TIMEOUT_SECS");
                assert_eq!(value, "soon");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_env_invalid_url_rejected() {
        clear_env();
        set_env("SMOKE_BASE_URL", "frontend");
        let result = SmokeConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_yaml_partial_file_uses_defaults() {
        let file = write_yaml("base_url: http://staging.example.com\nmarker: OmniPDF\n");
        let config = SmokeConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://staging.example.com");
        assert_eq!(config.marker, "OmniPDF");
        assert_eq!(config.path, "/");
        assert_eq!(config.services.len(), 5);
    }

    #[test]
    fn test_yaml_services() {
        let file = write_yaml("services:\n  - name: Chat Service\n    url: http://chat:9000\n");
        let config = SmokeConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.services.len(), 1);
        assert_eq!(config.services[0].url, "http://chat:9000");
    }

    #[test]
    fn test_yaml_validation_and_parse_errors() {
        let invalid = write_yaml("path: no-leading-slash\n");
        assert!(matches!(
            SmokeConfig::from_yaml_file(invalid.path()),
            Err(ConfigError::Validation(_))
        ));

        let malformed = write_yaml("timeout_secs: [1, 2\n");
        assert!(matches!(
            SmokeConfig::from_yaml_file(malformed.path()),
            Err(ConfigError::Parse { .. })
        ));

        assert!(matches!(
            SmokeConfig::from_yaml_file("/nonexistent/omnipdf-smoke.yaml"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_cli_overrides_win_over_file() {
        let file = write_yaml("base_url: http://staging.example.com\ntimeout_secs: 60\n");
        let config = SmokeConfig::from_yaml_file(file.path())
            .unwrap()
            .with_overrides(CliOverrides {
                base_url: Some("http://127.0.0.1:8501".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8501");
        assert_eq!(config.timeout_secs, 60);
    }
}

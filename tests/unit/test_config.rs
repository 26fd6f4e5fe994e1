//! Unit tests for the config module
//!
//! Tests cover:
//! - Defaults
//! - Loading from a file
//! - Validation
//! - TOML round trip

use nevera::config::{Config, InterruptPolicy, Status};
use std::io::Write;

mod load_tests {
    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[snippets]
endpoint = "http://localhost:9999/api/functions"

[animation]
cycle_ms = 1000
max_lines = 10
on_interrupt = "commit"

[ui]
status = "processing"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(config.snippets.endpoint, "http://localhost:9999/api/functions");
        assert_eq!(config.animation.cycle_ms, 1000);
        assert_eq!(config.animation.max_lines, 10);
        assert_eq!(config.animation.on_interrupt, InterruptPolicy::Commit);
        assert_eq!(config.ui.status, Status::Processing);
        // Untouched keys keep their defaults
        assert_eq!(config.animation.char_delay_ms, 35);
        assert_eq!(config.ui.clock_format, "%H:%M:%S");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Config::load(Some("/nonexistent/nevera.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation\ncycle_ms = ").unwrap();
        assert!(Config::load(Some(file.path().to_str().unwrap())).is_err());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\nstall_probability = 2.0").unwrap();
        let err = Config::load(Some(file.path().to_str().unwrap())).unwrap_err();
        assert_eq!(
            nevera::errors::get_exit_code(&err),
            nevera::errors::EXIT_CONFIG_ERROR
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(Config::from_toml_str("[ui]\nstatus = \"sleeping\"").is_err());
    }
}

mod serialization_tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.animation.stall_probability = 0.0;
        config.ui.status = Status::Analyzing;
        config.server.snippets = vec!["x = 1;".to_string()];

        let text = toml::to_string(&config).unwrap();
        let back = Config::from_toml_str(&text).unwrap();

        assert_eq!(back.animation.stall_probability, 0.0);
        assert_eq!(back.ui.status, Status::Analyzing);
        assert_eq!(back.server.snippets, vec!["x = 1;".to_string()]);
    }

    #[test]
    fn test_serialized_enums_are_lowercase() {
        let text = toml::to_string(&Config::default()).unwrap();
        assert!(text.contains("status = \"active\""));
        assert!(text.contains("on_interrupt = \"discard\""));
    }
}

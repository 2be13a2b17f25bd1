#[cfg(test)]
mod tests {
    use crate::config::{AssistantConfig, Config, DashboardConfig, DataConfig, GeocoderConfig};
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.assistant.api_key = "sk-test".to_string();
        config.assistant.briefing_assistant_id = "asst_briefing".to_string();
        config.assistant.comparison_assistant_id = "asst_comparison".to_string();
        config
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.data.outbreaks_path, PathBuf::from("news_output.csv"));
        assert_eq!(
            config.data.details_path,
            PathBuf::from("llm_news_detail.csv")
        );
        assert!(!config.verbose);
    }

    #[test]
    fn test_assistant_config_default() {
        let config = AssistantConfig::default();

        // api_key and assistant ids may be empty if env vars are not set
        assert_eq!(config.api_base_url, "https://api.openai.com/v1");
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.max_wait_seconds, 300);
        assert_eq!(config.max_wait(), Duration::from_secs(300));
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay_ms, 1000);
    }

    #[test]
    fn test_geocoder_config_default() {
        let config = GeocoderConfig::default();

        assert_eq!(config.api_base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.point_weight, 100);
        assert!(!config.user_agent.is_empty());
    }

    #[test]
    fn test_dashboard_config_default() {
        let config = DashboardConfig::default();

        assert_eq!(config.title, "Global Influenza Dashboard");
        assert_eq!(
            config.topics,
            vec!["Avian influenza".to_string(), "swine flu".to_string()]
        );
        assert_eq!(config.extract_delay_ms, 5000);
        assert!(config.country_prompt.contains("influenza"));
    }

    #[test]
    fn test_from_file_partial_sections() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("briefing.toml");
        std::fs::write(
            &path,
            r#"
verbose = true

[assistant]
api_key = "sk-file"
briefing_assistant_id = "asst_a"
comparison_assistant_id = "asst_b"
poll_interval_ms = 500

[dashboard]
topics = ["H5N1"]
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert!(config.verbose);
        assert_eq!(config.assistant.api_key, "sk-file");
        assert_eq!(config.assistant.briefing_assistant_id, "asst_a");
        assert_eq!(config.assistant.comparison_assistant_id, "asst_b");
        assert_eq!(config.assistant.poll_interval_ms, 500);
        // 未写出的字段回落到默认值
        assert_eq!(config.assistant.max_wait_seconds, 300);
        assert_eq!(config.dashboard.topics, vec!["H5N1".to_string()]);
        assert_eq!(config.dashboard.extract_delay_ms, 5000);
        assert_eq!(config.data.outbreaks_path, DataConfig::default().outbreaks_path);
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/briefing.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "[assistant\npoll_interval_ms = ").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "[geocoder]\npoint_weight = 42\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.geocoder.point_weight, 42);
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_secrets() {
        let mut config = valid_config();
        config.assistant.api_key = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.assistant.briefing_assistant_id = String::new();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.assistant.comparison_assistant_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let mut config = valid_config();
        config.assistant.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}

#[cfg(test)]
mod tests {
    use crate::agents::{AgentRole, ModelTier};
    use crate::config::{BudgetConfig, Config, DEFAULT_CONFIG_FILE};
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.agent.runtime_binary, "claude");
        assert_eq!(config.agent.tool_server_name, "mpa-supabase");
        assert_eq!(config.agent.permission_mode, "default");
        assert_eq!(config.datastore.timeout_seconds, 30);
        assert!(config.config_path.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_budget_defaults_per_role() {
        let config = Config::default();

        assert_eq!(config.budget(AgentRole::Prospector), 1.0);
        assert_eq!(config.budget(AgentRole::Researcher), 2.0);
        assert_eq!(config.budget(AgentRole::Connector), 1.5);
        assert_eq!(config.budget(AgentRole::Orchestrator), 5.0);
    }

    #[test]
    fn test_model_ids_per_tier() {
        let config = Config::default();

        assert_eq!(config.model_id(ModelTier::Sonnet), "claude-sonnet-4-5");
        assert_eq!(config.model_id(ModelTier::Haiku), "claude-haiku-4-5");
        assert_eq!(config.model_id(ModelTier::Opus), "claude-opus-4-1");
    }

    #[test]
    fn test_set_all_budgets() {
        let mut budgets = BudgetConfig::default();
        budgets.set_all(0.5);

        assert_eq!(
            budgets,
            BudgetConfig {
                prospector: 0.5,
                researcher: 0.5,
                connector: 0.5,
                orchestrator: 0.5,
            }
        );
    }

    #[test]
    fn test_from_file_partial_sections() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
verbose = true

[datastore]
url = "https://abc.supabase.co"
api_key = "anon"

[agent]
runtime_binary = "/opt/claude/bin/claude"

[agent.models]
haiku = "claude-haiku-next"

[budgets]
orchestrator = 8.0
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert!(config.verbose);
        assert_eq!(
            config.datastore.url.as_deref(),
            Some("https://abc.supabase.co")
        );
        assert_eq!(config.datastore.api_key.as_deref(), Some("anon"));
        assert_eq!(config.datastore.timeout_seconds, 30);
        assert_eq!(config.agent.runtime_binary, "/opt/claude/bin/claude");
        assert_eq!(config.agent.tool_server_name, "mpa-supabase");
        assert_eq!(config.model_id(ModelTier::Haiku), "claude-haiku-next");
        assert_eq!(config.model_id(ModelTier::Sonnet), "claude-sonnet-4-5");
        assert_eq!(config.budget(AgentRole::Orchestrator), 8.0);
        assert_eq!(config.budget(AgentRole::Prospector), 1.0);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_from_file_errors() {
        let temp_dir = TempDir::new().unwrap();

        let missing = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        assert!(Config::from_file(&missing).is_err());

        let broken = temp_dir.path().join("broken.toml");
        std::fs::write(&broken, "[budgets\nprospector = ").unwrap();
        let err = Config::from_file(&broken).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("explicit.toml");
        std::fs::write(&path, "[agent]\npermission_mode = \"acceptEdits\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.agent.permission_mode, "acceptEdits");
    }
}

#[cfg(test)]
mod tests {
    use crate::agents::{AgentRole, ModelTier};
    use crate::cli::{Args, Command, DEFAULT_COMPANY};
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_subcommand_is_required() {
        assert!(Args::try_parse_from(["mpa-deal-intel"]).is_err());
    }

    #[test]
    fn test_orchestrate_passes_flags_through() {
        let args =
            Args::try_parse_from(["mpa-deal-intel", "orchestrate", "--market-map", "Manufacturing", "NS"])
                .unwrap();

        assert_eq!(
            args.command,
            Command::Orchestrate {
                direct: false,
                args: vec![
                    "--market-map".to_string(),
                    "Manufacturing".to_string(),
                    "NS".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_orchestrate_direct_and_empty() {
        let args = Args::try_parse_from([
            "mpa-deal-intel",
            "orchestrate",
            "--direct",
            "Find companies with succession signals",
        ])
        .unwrap();
        assert!(matches!(args.command, Command::Orchestrate { direct: true, ref args } if args.len() == 1));

        let args = Args::try_parse_from(["mpa-deal-intel", "orchestrate"]).unwrap();
        assert_eq!(
            args.command,
            Command::Orchestrate {
                direct: false,
                args: vec![],
            }
        );
    }

    #[test]
    fn test_worker_defaults() {
        let args = Args::try_parse_from(["mpa-deal-intel", "prospect"]).unwrap();
        assert_eq!(
            args.command,
            Command::Prospect {
                model: ModelTier::Sonnet,
                task: None,
            }
        );

        let args = Args::try_parse_from(["mpa-deal-intel", "research"]).unwrap();
        assert_eq!(
            args.command,
            Command::Research {
                company: DEFAULT_COMPANY.to_string()
            }
        );

        let args = Args::try_parse_from(["mpa-deal-intel", "connect", "Sustane Technologies"]).unwrap();
        assert_eq!(
            args.command,
            Command::Connect {
                company: "Sustane Technologies".to_string()
            }
        );
    }

    #[test]
    fn test_prospect_model_option() {
        let args =
            Args::try_parse_from(["mpa-deal-intel", "prospect", "--model", "haiku", "Scan NB"]).unwrap();
        assert_eq!(
            args.command,
            Command::Prospect {
                model: ModelTier::Haiku,
                task: Some("Scan NB".to_string()),
            }
        );
        assert!(Args::try_parse_from(["mpa-deal-intel", "prospect", "--model", "gpt"]).is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::try_parse_from([
            "mpa-deal-intel",
            "serve-tools",
            "--verbose",
            "--budget",
            "0.25",
        ])
        .unwrap();
        assert_eq!(args.command, Command::ServeTools);
        assert!(args.verbose);
        assert_eq!(args.budget, Some(0.25));
    }

    #[test]
    fn test_into_config_with_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mpa.toml");
        std::fs::write(&path, "[budgets]\nresearcher = 3.0\n").unwrap();

        let args = Args::try_parse_from([
            "mpa-deal-intel",
            "--config",
            path.to_str().unwrap(),
            "--runtime-binary",
            "/opt/claude",
            "-v",
            "research",
        ])
        .unwrap();
        let (config, command) = args.into_config().unwrap();

        assert_eq!(config.budget(AgentRole::Researcher), 3.0);
        assert_eq!(config.agent.runtime_binary, "/opt/claude");
        assert!(config.verbose);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert!(matches!(command, Command::Research { .. }));
    }

    #[test]
    fn test_into_config_budget_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let args = Args::try_parse_from([
            "mpa-deal-intel",
            "--config",
            path.to_str().unwrap(),
            "--budget",
            "0.5",
            "prospect",
        ])
        .unwrap();
        let (config, _) = args.into_config().unwrap();

        for role in AgentRole::WORKERS {
            assert_eq!(config.budget(role), 0.5);
        }
        assert_eq!(config.budget(AgentRole::Orchestrator), 0.5);
    }

    #[test]
    fn test_into_config_rejects_non_positive_budget() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        for budget in ["0", "-1.5"] {
            let flag = format!("--budget={}", budget);
            let args = Args::try_parse_from([
                "mpa-deal-intel",
                "--config",
                path.to_str().unwrap(),
                flag.as_str(),
                "prospect",
            ])
            .unwrap();
            let err = args.into_config().unwrap_err();
            assert!(err.to_string().contains("--budget"));
        }

        let args = Args::try_parse_from([
            "mpa-deal-intel",
            "--config",
            path.to_str().unwrap(),
            "--budget",
            "0.001",
            "prospect",
        ])
        .unwrap();
        let (config, _) = args.into_config().unwrap();
        assert_eq!(config.budget(AgentRole::Prospector), 0.001);
    }

    #[test]
    fn test_into_config_missing_file_fails() {
        let args =
            Args::try_parse_from(["mpa-deal-intel", "--config", "/nonexistent/mpa.toml", "prospect"])
                .unwrap();
        assert!(args.into_config().is_err());
    }
}

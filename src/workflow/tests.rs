#[cfg(test)]
mod tests {
    use crate::agents::orchestrator;
    use crate::agents::{AgentRole, ModelTier};
    use crate::config::Config;
    use crate::llm::runtime::ScriptedRuntime;
    use crate::workflow::{
        orchestrate, orchestrator_request, run_orchestrator, run_worker, tool_server_launch,
        worker_request,
    };
    use serde_json::json;
    use std::path::PathBuf;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_worker_request_uses_profile_and_budget() {
        let config = Config::default();
        let request = worker_request(
            &config,
            AgentRole::Prospector,
            "Scan".to_string(),
            ModelTier::Haiku,
        );

        assert_eq!(request.model, "claude-haiku-4-5");
        assert_eq!(request.max_budget_usd, 1.0);
        assert!(request.agents.is_empty());
        assert!(
            request
                .allowed_tools
                .contains(&"mcp__mpa-supabase__save_signal".to_string())
        );
        assert_eq!(request.permission_mode, "default");
    }

    #[test]
    fn test_orchestrator_request_carries_subagents() {
        let request = orchestrator_request(&Config::default(), "Review".to_string());

        assert_eq!(request.model, "claude-sonnet-4-5");
        assert_eq!(request.max_budget_usd, 5.0);
        assert_eq!(request.agents.len(), 3);
        assert!(request.allowed_tools.contains(&"Task".to_string()));
    }

    #[test]
    fn test_tool_server_launch_forwards_config() {
        let mut config = Config::default();
        let launch = tool_server_launch(&config).unwrap();
        assert_eq!(launch.name, "mpa-supabase");
        assert_eq!(launch.args, vec!["serve-tools".to_string()]);

        config.config_path = Some(PathBuf::from("/etc/mpa/mpa.toml"));
        let launch = tool_server_launch(&config).unwrap();
        assert_eq!(
            launch.args,
            args(&["--config", "/etc/mpa/mpa.toml", "serve-tools"])
        );
    }

    #[tokio::test]
    async fn test_empty_orchestrate_prints_usage_without_launching() {
        let runtime = ScriptedRuntime::new(vec![]);
        let report = orchestrate(&runtime, &Config::default(), &[], false)
            .await
            .unwrap();

        assert!(report.is_none());
        assert!(runtime.requests().is_empty());
    }

    #[tokio::test]
    async fn test_prospect_flag_sends_daily_template() {
        let runtime = ScriptedRuntime::new(vec![json!({"type": "result", "subtype": "success"})]);
        orchestrate(&runtime, &Config::default(), &args(&["--prospect"]), false)
            .await
            .unwrap();

        let requests = runtime.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, orchestrator::daily_prospecting());
        assert_eq!(requests[0].agents.len(), 3);
    }

    #[tokio::test]
    async fn test_direct_routing_launches_worker() {
        let runtime = ScriptedRuntime::new(vec![]);
        orchestrate(
            &runtime,
            &Config::default(),
            &args(&["Find companies with succession signals in the seafood industry"]),
            true,
        )
        .await
        .unwrap();

        let requests = runtime.requests();
        assert_eq!(
            requests[0].system_prompt,
            AgentRole::Prospector.profile().system_prompt
        );
        assert!(requests[0].agents.is_empty());
    }

    #[tokio::test]
    async fn test_direct_templates_stay_with_orchestrator() {
        let cases = [
            args(&["--pipeline"]),
            args(&["--research", "Acme"]),
            args(&["--market-map", "Seafood"]),
            args(&["--intro", "Acme"]),
        ];
        for case in cases {
            let runtime = ScriptedRuntime::new(vec![]);
            orchestrate(&runtime, &Config::default(), &case, true)
                .await
                .unwrap();

            let requests = runtime.requests();
            assert_eq!(requests.len(), 1);
            assert_eq!(
                requests[0].system_prompt,
                AgentRole::Orchestrator.profile().system_prompt
            );
            assert_eq!(requests[0].agents.len(), 3);
        }

        let runtime = ScriptedRuntime::new(vec![]);
        orchestrate(&runtime, &Config::default(), &args(&["--pipeline"]), true)
            .await
            .unwrap();
        assert!(
            runtime.requests()[0]
                .allowed_tools
                .contains(&"mcp__mpa-supabase__get_pipeline".to_string())
        );
    }

    #[tokio::test]
    async fn test_direct_without_match_falls_back_to_orchestrator() {
        let runtime = ScriptedRuntime::new(vec![]);
        orchestrate(
            &runtime,
            &Config::default(),
            &args(&["Summarize the week"]),
            true,
        )
        .await
        .unwrap();

        assert_eq!(runtime.requests()[0].agents.len(), 3);
    }

    #[tokio::test]
    async fn test_fatal_error_policy() {
        let config = Config::default();

        let runtime = ScriptedRuntime::new(vec![]).failing_with("killed");
        let report = run_worker(
            &runtime,
            &config,
            AgentRole::Connector,
            "Map".to_string(),
            ModelTier::Sonnet,
        )
        .await;
        assert!(report.fatal.is_some());

        let runtime = ScriptedRuntime::new(vec![]).failing_with("killed");
        let err = run_orchestrator(&runtime, &config, "Review".to_string())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("killed"));
    }
}

use triad::{AgentRole, ApiError, ApiKey, Triad};

const TASK: &str = "Explain quantum entanglement for a general audience.";

#[tokio::test]
#[ignore]
async fn test_anthropic_three_stage_run() {
    let Ok(key) = std::env::var("ANTHROPIC_API_KEY") else {
        return;
    };

    let triad = Triad::builder().anthropic(None).build().expect("build");
    let result = triad
        .run_to_completion(TASK, &ApiKey::new(key))
        .await
        .expect("run should succeed");

    for stage in &result.stages {
        assert!(
            !stage.output_text.trim().is_empty(),
            "{} produced no output",
            stage.role
        );
    }
    assert_eq!(
        result.stage(AgentRole::Writer).input_text,
        result.stage(AgentRole::Researcher).output_text
    );
    assert_eq!(
        result.stage(AgentRole::Critic).input_text,
        result.stage(AgentRole::Writer).output_text
    );
}

#[tokio::test]
#[ignore]
async fn test_anthropic_rejects_invalid_key() {
    let triad = Triad::builder().anthropic(None).build().expect("build");
    let err = triad
        .run_to_completion(TASK, &ApiKey::new("sk-ant-invalid"))
        .await
        .unwrap_err();

    let err = match err {
        triad::TriadError::Pipeline(e) => e,
        other => panic!("unexpected error: {other:?}"),
    };
    assert_eq!(err.failed_role(), Some(AgentRole::Researcher));
    assert!(matches!(
        err.api_error(),
        Some(ApiError::AuthenticationFailed(_))
    ));
}

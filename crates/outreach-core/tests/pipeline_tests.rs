//! Integration tests for the sequential runner with a scripted
//! completion service.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use outreach_core::testing::StubCompletion;
use outreach_core::{
    AgentRole, CancelToken, CompletionError, ExecutorConfig, PipelineContext, PipelineError,
    PipelineInput, PipelineRunner, RetryPolicy, StageDefinition, StageExecutor, StageFailure,
};

const ARTIFACT: &str = "buyer_contact.md";

fn stage(name: &str, depends_on: &[&str], output_file: Option<&str>) -> StageDefinition {
    StageDefinition {
        name: name.to_string(),
        role: AgentRole {
            role: format!("{} agent", name),
            goal: "Help sell {our_product} to {target_company}".to_string(),
            backstory: "You are thorough.".to_string(),
        },
        prompt_template: format!("Do the {} work for {{target_company}}.", name),
        expected_output: "Markdown".to_string(),
        depends_on: depends_on.iter().map(|d| d.to_string()).collect(),
        output_file: output_file.map(str::to_string),
    }
}

fn four_stages() -> Vec<StageDefinition> {
    vec![
        stage("research", &[], None),
        stage("org_structure", &["research"], None),
        stage("contacts", &["research", "org_structure"], None),
        stage(
            "strategy",
            &["research", "org_structure", "contacts"],
            Some(ARTIFACT),
        ),
    ]
}

fn config(dir: &Path) -> ExecutorConfig {
    ExecutorConfig {
        output_dir: dir.to_path_buf(),
        ..ExecutorConfig::default()
    }
}

fn runner(stub: Arc<StubCompletion>, config: ExecutorConfig) -> PipelineRunner {
    PipelineRunner::new(four_stages(), stub, config).unwrap()
}

fn globex() -> PipelineInput {
    PipelineInput::new("Globex", "AI CRM").unwrap()
}

// =============================================================================
// Wiring and context
// =============================================================================

#[tokio::test]
async fn test_stages_run_in_fixed_order() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(StubCompletion::new());
    let runner = runner(stub.clone(), config(dir.path()));

    for (company, product) in [("Globex", "AI CRM"), ("Initech", "{our_product} literally")] {
        let input = PipelineInput::new(company, product).unwrap();
        let run = runner.execute(&input, &CancelToken::new()).await.unwrap();
        assert_eq!(
            run.context.stage_names(),
            vec!["research", "org_structure", "contacts", "strategy"]
        );
    }

    assert_eq!(stub.call_count(), 8);
    assert_eq!(runner.pipeline_id(), "research→org_structure→contacts→strategy");
}

#[tokio::test]
async fn test_each_prompt_contains_all_prior_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let outputs = [
        "Globex builds doomsday devices.",
        "Sales ops sits under the COO.",
        "| VP Sales Ops | champion |",
        "Final outreach plan.",
    ];
    let stub = Arc::new(
        StubCompletion::new()
            .reply(outputs[0])
            .reply(outputs[1])
            .reply(outputs[2])
            .reply(outputs[3]),
    );
    let runner = runner(stub.clone(), config(dir.path()));

    let run = runner.execute(&globex(), &CancelToken::new()).await.unwrap();
    let requests = stub.requests();
    assert_eq!(requests.len(), 4);

    for (k, request) in requests.iter().enumerate() {
        for prior in &outputs[..k] {
            assert!(
                request.prompt.contains(prior),
                "prompt {} is missing prior output {:?}",
                k,
                prior
            );
        }
        assert_eq!(request.prompt, run.context.results()[k].rendered_prompt);
    }

    assert!(!requests[0].prompt.contains("# Context"));
    assert!(requests[3].prompt.contains("## contacts\n\n| VP Sales Ops | champion |"));
}

#[tokio::test]
async fn test_role_and_input_are_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(StubCompletion::new());
    let runner = runner(stub.clone(), config(dir.path()));

    runner.run(&globex()).await.unwrap();

    let first = &stub.requests()[0];
    let system = first.system.as_deref().unwrap();
    assert!(system.starts_with("You are the research agent."));
    assert!(system.contains("Help sell AI CRM to Globex"));
    assert!(first.prompt.contains("Do the research work for Globex."));
    assert!(!first.prompt.contains("{target_company}"));
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_failure_aborts_remaining_stages() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(
        StubCompletion::new()
            .reply("research notes")
            .fail(CompletionError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
    );
    let runner = runner(stub.clone(), config(dir.path()));

    let err = runner.run(&globex()).await.unwrap_err();

    assert_eq!(err.stage(), Some("org_structure"));
    match err {
        PipelineError::Stage(stage_err) => {
            assert_eq!(stage_err.stage, "org_structure");
            assert!(matches!(
                stage_err.cause,
                StageFailure::Completion { attempts: 1, .. }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(stub.call_count(), 2);
    assert!(!dir.path().join(ARTIFACT).exists());
}

#[tokio::test]
async fn test_empty_completion_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(StubCompletion::new().reply("   \n"));
    let runner = runner(stub.clone(), config(dir.path()));

    let err = runner.run(&globex()).await.unwrap_err();
    match err {
        PipelineError::Stage(stage_err) => {
            assert_eq!(stage_err.stage, "research");
            assert!(matches!(
                stage_err.cause,
                StageFailure::Completion {
                    source: CompletionError::Empty,
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn test_slow_completion_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(StubCompletion::new().hang(Duration::from_secs(10)));
    let config = ExecutorConfig {
        call_timeout: Duration::from_millis(50),
        ..config(dir.path())
    };
    let runner = runner(stub, config);

    let err = runner.run(&globex()).await.unwrap_err();
    match err {
        PipelineError::Stage(stage_err) => assert!(matches!(
            stage_err.cause,
            StageFailure::Completion {
                source: CompletionError::Timeout(_),
                ..
            }
        )),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_transient_failure_retried_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(
        StubCompletion::new()
            .fail(CompletionError::RateLimited("429".to_string()))
            .reply("research notes"),
    );
    let config = ExecutorConfig {
        retry: RetryPolicy {
            max_retries: 2,
            initial_backoff: Duration::from_millis(1),
        },
        ..config(dir.path())
    };
    let runner = runner(stub.clone(), config);

    let run = runner.execute(&globex(), &CancelToken::new()).await.unwrap();
    assert_eq!(run.proofs[0].attempts, 2);
    assert_eq!(run.context.results()[0].output_text, "research notes");
    assert_eq!(stub.call_count(), 5);
}

#[tokio::test]
async fn test_permanent_failure_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(StubCompletion::new().fail(CompletionError::Api {
        status: 401,
        message: "invalid key".to_string(),
    }));
    let config = ExecutorConfig {
        retry: RetryPolicy::with_retries(3),
        ..config(dir.path())
    };
    let runner = runner(stub.clone(), config);

    assert!(runner.run(&globex()).await.is_err());
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn test_cancel_before_first_stage() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(StubCompletion::new());
    let runner = runner(stub.clone(), config(dir.path()));

    let cancel = CancelToken::new();
    cancel.cancel();

    let err = runner.execute(&globex(), &cancel).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Cancelled { ref before_stage } if before_stage == "research"
    ));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_executor_reports_missing_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(StubCompletion::new());
    let executor = StageExecutor::new(stub.clone(), config(dir.path()));

    let mut broken = stage("research", &[], None);
    broken.prompt_template = "Find {decision_maker} at {target_company}".to_string();

    let err = executor
        .execute(&broken, &globex(), &PipelineContext::new())
        .await
        .unwrap_err();

    assert_eq!(err.stage, "research");
    assert!(matches!(err.cause, StageFailure::Template(_)));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_executor_reports_missing_dependency() {
    let dir = tempfile::tempdir().unwrap();
    let executor = StageExecutor::new(Arc::new(StubCompletion::new()), config(dir.path()));

    let err = executor
        .execute(
            &stage("org_structure", &["research"], None),
            &globex(),
            &PipelineContext::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err.cause, StageFailure::MissingDependency(ref d) if d == "research"));
}

// =============================================================================
// Persistence and end-to-end
// =============================================================================

#[tokio::test]
async fn test_artifact_overwritten_each_run() {
    let dir = tempfile::tempdir().unwrap();

    let first = Arc::new(StubCompletion::new().with_fallback("run one output, which is longer"));
    runner(first, config(dir.path())).run(&globex()).await.unwrap();

    let second = Arc::new(StubCompletion::new().with_fallback("run two"));
    runner(second, config(dir.path())).run(&globex()).await.unwrap();

    let content = std::fs::read_to_string(dir.path().join(ARTIFACT)).unwrap();
    assert_eq!(content, "run two");
}

#[tokio::test]
async fn test_end_to_end_output_matches_terminal_stub() {
    let dir = tempfile::tempdir().unwrap();
    let stub = Arc::new(
        StubCompletion::new()
            .reply("company overview")
            .reply("org overview")
            .reply("contact table")
            .reply("# Outreach strategy for Globex"),
    );
    let runner = runner(stub, config(dir.path()));

    let run = runner.execute(&globex(), &CancelToken::new()).await.unwrap();

    assert_eq!(run.output(), "# Outreach strategy for Globex");
    assert_eq!(run.proofs.len(), 4);
    assert_eq!(run.artifact.as_deref(), Some(dir.path().join(ARTIFACT).as_path()));
    assert_eq!(runner.artifact_path(), Some(dir.path().join(ARTIFACT)));

    let persisted = std::fs::read_to_string(dir.path().join(ARTIFACT)).unwrap();
    assert_eq!(persisted, "# Outreach strategy for Globex");
}

#[tokio::test]
async fn test_terminal_output_kept_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let strategy = "# Strategy\n\n- step one\n";
    let stub = Arc::new(
        StubCompletion::new()
            .reply("company overview\n")
            .reply("  org overview")
            .reply("contact table\n\n")
            .reply(strategy),
    );
    let runner = runner(stub.clone(), config(dir.path()));

    let output = runner.run(&globex()).await.unwrap();

    assert_eq!(output, strategy);
    let persisted = std::fs::read_to_string(dir.path().join(ARTIFACT)).unwrap();
    assert_eq!(persisted, strategy);

    let last_prompt = &stub.requests()[3].prompt;
    assert!(last_prompt.contains("company overview\n"));
    assert!(last_prompt.contains("  org overview"));
    assert!(last_prompt.contains("contact table\n\n"));
}

// =============================================================================
// Definition validation
// =============================================================================

fn build(stages: Vec<StageDefinition>) -> Result<PipelineRunner, PipelineError> {
    PipelineRunner::new(stages, Arc::new(StubCompletion::new()), ExecutorConfig::default())
}

#[test]
fn test_rejects_forward_dependency() {
    let err = build(vec![
        stage("research", &["org_structure"], None),
        stage("org_structure", &[], None),
    ])
    .err()
    .unwrap();
    assert!(matches!(err, PipelineError::InvalidDefinition(_)));
}

#[test]
fn test_rejects_undeclared_placeholder() {
    let mut contacts = stage("contacts", &[], None);
    contacts.prompt_template = "Use {research} to find people".to_string();

    let err = build(vec![stage("research", &[], None), contacts]).err().unwrap();
    assert!(err.to_string().contains("unknown placeholder `research`"));
}

#[test]
fn test_accepts_declared_stage_placeholder() {
    let mut contacts = stage("contacts", &["research"], None);
    contacts.prompt_template = "Use this research:\n{research}".to_string();

    assert!(build(vec![stage("research", &[], None), contacts]).is_ok());
}

#[test]
fn test_rejects_duplicates_and_misplaced_artifacts() {
    let duplicate = build(vec![stage("research", &[], None), stage("research", &[], None)]);
    assert!(duplicate.is_err());

    let misplaced = build(vec![
        stage("research", &[], Some(ARTIFACT)),
        stage("strategy", &["research"], None),
    ]);
    assert!(misplaced.is_err());

    assert!(build(Vec::new()).is_err());
    assert!(build(vec![stage("target_company", &[], None)]).is_err());
}

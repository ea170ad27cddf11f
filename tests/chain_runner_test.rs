use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use quiz_chain_solver::models::AttemptResult;
use quiz_chain_solver::{run_chain, ChainLimits, ChainOutcome, QuizCtx, QuizSolver};

/// 按顺序返回预设结果，用完后一直返回最后一个
struct ScriptedSolver {
    script: Mutex<VecDeque<Result<AttemptResult, String>>>,
    last: Result<AttemptResult, String>,
    calls: Mutex<Vec<(usize, String)>>,
}

impl ScriptedSolver {
    fn new(script: Vec<Result<AttemptResult, String>>, last: Result<AttemptResult, String>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn always(result: AttemptResult) -> Self {
        Self::new(Vec::new(), Ok(result))
    }

    fn calls(&self) -> Vec<(usize, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizSolver for ScriptedSolver {
    async fn solve(&self, ctx: &QuizCtx) -> Result<AttemptResult> {
        self.calls
            .lock()
            .unwrap()
            .push((ctx.attempt, ctx.quiz_url.clone()));
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone());
        next.map_err(anyhow::Error::msg)
    }
}

fn ok(success: bool, next: Option<&str>) -> AttemptResult {
    AttemptResult {
        success,
        next_url: next.map(str::to_string),
        error: if success { None } else { Some("Wrong answer".to_string()) },
    }
}

fn limits(max_attempts: usize) -> ChainLimits {
    ChainLimits {
        max_attempts,
        budget: Duration::from_secs(170),
        safety_margin: Duration::from_secs(10),
    }
}

#[tokio::test]
async fn test_attempt_cap_stops_after_exactly_three() {
    let solver = ScriptedSolver::always(ok(true, Some("https://quiz.example/next")));

    let report = run_chain(&solver, "https://quiz.example/start", limits(3)).await;

    assert_eq!(solver.calls().len(), 3);
    assert_eq!(report.attempts, 3);
    assert_eq!(report.solved, 3);
    assert_eq!(report.outcome, ChainOutcome::AttemptCapReached);
}

#[tokio::test]
async fn test_exceeded_deadline_invokes_nothing() {
    let solver = ScriptedSolver::always(ok(true, None));
    let limits = ChainLimits {
        max_attempts: 50,
        budget: Duration::ZERO,
        safety_margin: Duration::from_secs(10),
    };

    let report = run_chain(&solver, "https://quiz.example/start", limits).await;

    assert!(solver.calls().is_empty());
    assert_eq!(report.attempts, 0);
    assert_eq!(report.outcome, ChainOutcome::DeadlineReached);
}

#[tokio::test]
async fn test_follows_next_urls_until_chain_ends() {
    let solver = ScriptedSolver::new(
        vec![
            Ok(ok(true, Some("https://quiz.example/q2"))),
            Ok(ok(true, Some("https://quiz.example/q3"))),
        ],
        Ok(ok(true, None)),
    );

    let report = run_chain(&solver, "https://quiz.example/q1", limits(50)).await;

    assert_eq!(
        solver.calls(),
        vec![
            (1, "https://quiz.example/q1".to_string()),
            (2, "https://quiz.example/q2".to_string()),
            (3, "https://quiz.example/q3".to_string()),
        ]
    );
    assert_eq!(report.outcome, ChainOutcome::Completed);
    assert_eq!(report.solved, 3);
}

#[tokio::test]
async fn test_wrong_answer_with_next_url_advances() {
    let solver = ScriptedSolver::new(
        vec![Ok(ok(false, Some("https://quiz.example/q2")))],
        Ok(ok(true, None)),
    );

    let report = run_chain(&solver, "https://quiz.example/q1", limits(50)).await;

    assert_eq!(report.attempts, 2);
    assert_eq!(report.solved, 1);
    assert_eq!(solver.calls()[1].1, "https://quiz.example/q2");
    assert_eq!(report.outcome, ChainOutcome::Completed);
}

#[tokio::test]
async fn test_failure_without_next_url_stops() {
    let solver = ScriptedSolver::always(ok(false, None));

    let report = run_chain(&solver, "https://quiz.example/q1", limits(50)).await;

    assert_eq!(report.attempts, 1);
    assert_eq!(report.outcome, ChainOutcome::StoppedAfterFailure);
}

#[tokio::test]
async fn test_solver_error_aborts_chain() {
    let solver = ScriptedSolver::new(
        vec![Ok(ok(true, Some("https://quiz.example/q2")))],
        Err("connection refused".to_string()),
    );

    let report = run_chain(&solver, "https://quiz.example/q1", limits(50)).await;

    assert_eq!(solver.calls().len(), 2);
    assert_eq!(report.solved, 1);
    match report.outcome {
        ChainOutcome::Aborted(reason) => assert!(reason.contains("connection refused")),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

//! Judge orchestrator
//!
//! Drives the per-submission judging loop: one workspace per submission, one
//! compile step for compiled languages, then sequential test-case execution
//! with short-circuiting on the first failure. All launcher and workspace
//! faults are converted into complete, typed results; nothing from the
//! execution layer escapes as an unhandled error.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

pub use crate::judge::compare::{normalize_output, outputs_match};
pub use crate::judge::efficiency::{EfficiencyResult, Tier, classify};
pub use crate::judge::verdict::{SubmissionVerdict, TestCase, Verdict};

mod compare;
mod efficiency;
mod verdict;

use crate::config::{CompileConfig, Config, ConfigError, Language, STDIN_FILE};
use crate::docker::{DockerSandbox, LaunchRequest, Phase, Sandbox, SandboxError};
use crate::types::{ExecutionRequest, ExecutionResult, ExecutionStatus, ResourceLimits};
use crate::workspace::{Workspace, WorkspaceManager};

/// Validation faults, raised before any workspace is acquired
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("source of {size} bytes exceeds the {limit} byte limit")]
    CodeTooLarge { size: u64, limit: u64 },
}

/// Base limits for the compile step; compilers need more headroom than the
/// judged program itself
fn default_compile_limits() -> ResourceLimits {
    ResourceLimits {
        time_limit_ms: Some(30_000),
        memory_limit_mb: Some(2048),
        cpu_limit: Some(1.0),
        pid_limit: Some(256),
        max_code_size_bytes: None,
    }
}

/// Sandboxed execution and judging engine for one deployment
///
/// Generic over the [`Sandbox`] backend; production code uses
/// [`DockerSandbox`], tests substitute a scripted fake.
#[derive(Debug)]
pub struct Judge<S = DockerSandbox> {
    config: Config,
    sandbox: S,
    workspaces: WorkspaceManager,
}

impl Judge<DockerSandbox> {
    /// Create a judge backed by the Docker CLI
    pub fn new(config: Config) -> Self {
        let sandbox = DockerSandbox::new(&config);
        Self::with_sandbox(config, sandbox)
    }
}

impl<S: Sandbox> Judge<S> {
    /// Create a judge with an explicit sandbox backend
    pub fn with_sandbox(config: Config, sandbox: S) -> Self {
        let workspaces = WorkspaceManager::new(&config);
        Self {
            config,
            sandbox,
            workspaces,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one ad hoc run (no judging)
    ///
    /// Returns `Err` only for validation faults detected before workspace
    /// acquisition; every execution-layer failure is reported inside the
    /// [`ExecutionResult`].
    #[instrument(skip(self, request, cancel), fields(language = %request.language))]
    pub async fn execute(
        &self,
        request: &ExecutionRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, JudgeError> {
        let language = self.config.get_language(&request.language)?;
        self.check_code_size(&request.source)?;

        let workspace = match self.workspaces.acquire().await {
            Ok(workspace) => workspace,
            Err(error) => {
                return Ok(ExecutionResult::fault(format!(
                    "failed to create workspace: {error}"
                )));
            }
        };

        let result = self
            .execute_in(
                &workspace,
                language,
                &request.source,
                request.stdin.as_deref(),
                request.limits.as_ref(),
                cancel,
            )
            .await;

        if let Err(error) = workspace.release().await {
            warn!(%error, "failed to release workspace");
        }

        Ok(result)
    }

    /// Judge one submission against all test cases
    ///
    /// Compiles once per submission, then evaluates test cases strictly in
    /// order, stopping at the first failure. Returns `Err` only for
    /// validation faults; everything else is a complete verdict.
    #[instrument(skip(self, source, testcases, cancel), fields(language = %language_id, total = testcases.len()))]
    pub async fn judge(
        &self,
        language_id: &str,
        source: &str,
        testcases: &[TestCase],
        cancel: &CancellationToken,
    ) -> Result<SubmissionVerdict, JudgeError> {
        // Configuration faults fail fast, before any workspace exists
        let language = self.config.get_language(language_id)?;
        self.check_code_size(source)?;

        let total = testcases.len();
        let workspace = match self.workspaces.acquire().await {
            Ok(workspace) => workspace,
            Err(error) => {
                return Ok(SubmissionVerdict::fault(
                    total,
                    format!("failed to create workspace: {error}"),
                ));
            }
        };

        let verdict = self
            .judge_in(&workspace, language, source, testcases, cancel)
            .await;

        if let Err(error) = workspace.release().await {
            warn!(%error, "failed to release workspace");
        }

        info!(verdict = %verdict.verdict, passed = verdict.passed, "submission judged");
        Ok(verdict)
    }

    fn check_code_size(&self, source: &str) -> Result<(), JudgeError> {
        if let Some(limit) = self.config.default_limits.max_code_size_bytes {
            let size = source.len() as u64;
            if size > limit {
                return Err(JudgeError::CodeTooLarge { size, limit });
            }
        }
        Ok(())
    }

    async fn execute_in(
        &self,
        workspace: &Workspace,
        language: &Language,
        source: &str,
        stdin: Option<&str>,
        limits: Option<&ResourceLimits>,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        if let Err(error) = workspace
            .write_file(&language.source_name, source.as_bytes())
            .await
        {
            return ExecutionResult::fault(format!("failed to write source: {error}"));
        }

        let has_stdin = matches!(stdin, Some(data) if !data.is_empty());
        if has_stdin
            && let Err(error) = workspace
                .write_file(STDIN_FILE, stdin.unwrap_or_default().as_bytes())
                .await
        {
            return ExecutionResult::fault(format!("failed to write stdin: {error}"));
        }

        if let Some(ref compile) = language.compile {
            let compiled = match self.compile(workspace, language, compile, cancel).await {
                Ok(result) => result,
                Err(error) => return fault_from(error),
            };
            if compiled.status != ExecutionStatus::Success {
                return compiled;
            }
        }

        match self
            .run_once(workspace, language, has_stdin, limits, cancel)
            .await
        {
            Ok(result) => result,
            Err(error) => fault_from(error),
        }
    }

    async fn judge_in(
        &self,
        workspace: &Workspace,
        language: &Language,
        source: &str,
        testcases: &[TestCase],
        cancel: &CancellationToken,
    ) -> SubmissionVerdict {
        let total = testcases.len();

        if let Err(error) = workspace
            .write_file(&language.source_name, source.as_bytes())
            .await
        {
            return SubmissionVerdict::fault(total, format!("failed to write source: {error}"));
        }

        // Compile once per submission; the artifact stays in the workspace
        // for every test-case run.
        if let Some(ref compile) = language.compile {
            let compiled = match self.compile(workspace, language, compile, cancel).await {
                Ok(result) => result,
                Err(error) => return SubmissionVerdict::fault(total, error.to_string()),
            };
            match compiled.status {
                ExecutionStatus::Success => {}
                ExecutionStatus::CompilationError => {
                    return SubmissionVerdict::compile_error(total, compiled.stderr);
                }
                _ => return SubmissionVerdict::fault(total, compiled.stderr),
            }
        }

        let hard_ceiling_ms = self
            .run_limits(language, None)
            .time_limit_ms
            .unwrap_or(u64::MAX);

        let mut passed = 0;
        let mut total_time_ms: u64 = 0;
        let mut max_time_ms: u64 = 0;

        for (index, testcase) in testcases.iter().enumerate() {
            let case_number = index + 1;
            debug!(case_number, "running test case");

            let has_stdin = !testcase.input.is_empty();
            if has_stdin
                && let Err(error) = workspace
                    .write_file(STDIN_FILE, testcase.input.as_bytes())
                    .await
            {
                return SubmissionVerdict::fault(
                    total,
                    format!("failed to write test input: {error}"),
                );
            }

            let result = match self
                .run_once(workspace, language, has_stdin, None, cancel)
                .await
            {
                Ok(result) => result,
                Err(error) => return SubmissionVerdict::fault(total, error.to_string()),
            };

            if result.timed_out || result.duration_ms > hard_ceiling_ms {
                return SubmissionVerdict::rejected(
                    Verdict::TimeLimitExceeded,
                    case_number,
                    total,
                    total_time_ms,
                    max_time_ms,
                );
            }

            if result.status != ExecutionStatus::Success {
                return SubmissionVerdict::rejected(
                    Verdict::RuntimeError,
                    case_number,
                    total,
                    total_time_ms,
                    max_time_ms,
                );
            }

            if !outputs_match(&testcase.output, &result.stdout) {
                return SubmissionVerdict::rejected(
                    Verdict::WrongAnswer,
                    case_number,
                    total,
                    total_time_ms,
                    max_time_ms,
                );
            }

            passed += 1;
            total_time_ms += result.duration_ms;
            max_time_ms = max_time_ms.max(result.duration_ms);
        }

        let efficiency = classify(max_time_ms, &self.config.efficiency);
        let warnings = efficiency::advisory_warning(efficiency.tier)
            .map(|warning| vec![warning.to_owned()])
            .unwrap_or_default();

        SubmissionVerdict {
            verdict: Verdict::Accepted,
            passed,
            total,
            time_ms: total_time_ms,
            max_time_ms,
            failed_testcase: None,
            efficiency: Some(efficiency),
            warnings,
            message: None,
        }
    }

    /// Run the compile step once, normalizing its exit code
    async fn compile(
        &self,
        workspace: &Workspace,
        language: &Language,
        compile: &CompileConfig,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, SandboxError> {
        let limits = match compile.limits {
            Some(ref overrides) => default_compile_limits().with_overrides(overrides),
            None => default_compile_limits(),
        };

        let command = Language::expand_command(&compile.command, &language.source_name);
        let raw = self
            .sandbox
            .run(LaunchRequest {
                image: &language.image,
                workspace,
                command,
                env: &compile.env,
                limits,
                phase: Phase::Compile,
                cancel,
            })
            .await?;

        let result = raw.into_result(Phase::Compile);

        if result.status == ExecutionStatus::Success
            && !workspace.file_exists(&compile.artifact).await?
        {
            return Ok(ExecutionResult::fault(format!(
                "compiler exited cleanly but produced no '{}'",
                compile.artifact
            )));
        }

        Ok(result)
    }

    /// Run the program once against whatever is in the workspace
    async fn run_once(
        &self,
        workspace: &Workspace,
        language: &Language,
        has_stdin: bool,
        user_limits: Option<&ResourceLimits>,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, SandboxError> {
        let limits = self.run_limits(language, user_limits);
        let command = language.run_command(has_stdin);

        let raw = self
            .sandbox
            .run(LaunchRequest {
                image: &language.image,
                workspace,
                command,
                env: &language.run.env,
                limits,
                phase: Phase::Run,
                cancel,
            })
            .await?;

        Ok(raw.into_result(Phase::Run))
    }

    /// Effective run limits: config defaults, then language overrides, then
    /// per-request overrides
    fn run_limits(&self, language: &Language, user_limits: Option<&ResourceLimits>) -> ResourceLimits {
        let mut limits = self.config.effective_limits(language.run.limits.as_ref());
        if let Some(user) = user_limits {
            limits = limits.with_overrides(user);
        }
        limits
    }
}

fn fault_from(error: SandboxError) -> ExecutionResult {
    ExecutionResult::fault(error.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::docker::RawOutput;

    /// Scripted sandbox: pops one pre-baked outcome per invocation and
    /// records every command it was asked to run.
    struct FakeSandbox {
        outcomes: Mutex<VecDeque<Result<RawOutput, SandboxError>>>,
        commands: Mutex<Vec<Vec<String>>>,
        calls: AtomicUsize,
    }

    impl FakeSandbox {
        fn new(outcomes: Vec<Result<RawOutput, SandboxError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                commands: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Sandbox for FakeSandbox {
        async fn run(&self, request: LaunchRequest<'_>) -> Result<RawOutput, SandboxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.commands.lock().unwrap().push(request.command.clone());
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("sandbox invoked more times than scripted");

            // A successful compile step leaves its artifact behind, like a
            // real compiler writing into the mounted workspace.
            if request.phase == Phase::Compile
                && let Ok(ref raw) = outcome
                && raw.exit_code == Some(0)
            {
                request.workspace.write_file("Main.class", b"").await.unwrap();
            }

            outcome
        }
    }

    fn ok(stdout: &str) -> Result<RawOutput, SandboxError> {
        ok_with_duration(stdout, 10)
    }

    fn ok_with_duration(stdout: &str, ms: u64) -> Result<RawOutput, SandboxError> {
        Ok(RawOutput {
            stdout: stdout.to_owned(),
            stderr: String::new(),
            exit_code: Some(0),
            duration: Duration::from_millis(ms),
            timed_out: false,
        })
    }

    fn crashed(stderr: &str) -> Result<RawOutput, SandboxError> {
        Ok(RawOutput {
            stdout: String::new(),
            stderr: stderr.to_owned(),
            exit_code: Some(1),
            duration: Duration::from_millis(10),
            timed_out: false,
        })
    }

    fn killed_on_ceiling(ms: u64) -> Result<RawOutput, SandboxError> {
        Ok(RawOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            duration: Duration::from_millis(ms),
            timed_out: true,
        })
    }

    fn test_judge(outcomes: Vec<Result<RawOutput, SandboxError>>) -> (Judge<FakeSandbox>, TempDir) {
        let scratch = tempfile::tempdir().unwrap();
        let config = Config {
            scratch_root: scratch.path().to_path_buf(),
            ..Config::default()
        };
        (Judge::with_sandbox(config, FakeSandbox::new(outcomes)), scratch)
    }

    fn cases(expected: &[&str]) -> Vec<TestCase> {
        expected.iter().map(|out| TestCase::new("", *out)).collect()
    }

    #[tokio::test]
    async fn accepted_single_case() {
        let (judge, _scratch) = test_judge(vec![ok("Hello\n")]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "print(\"Hello\")", &cases(&["Hello"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::Accepted);
        assert_eq!(verdict.passed, 1);
        assert_eq!(verdict.total, 1);
        assert_eq!(verdict.efficiency.as_ref().unwrap().tier, Tier::Optimal);
        assert!(verdict.warnings.is_empty());
    }

    #[tokio::test]
    async fn wrong_answer_short_circuits() {
        // Five cases; the third produces the wrong output
        let (judge, _scratch) = test_judge(vec![ok("1"), ok("2"), ok("wrong")]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "...", &cases(&["1", "2", "3", "4", "5"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::WrongAnswer);
        assert_eq!(verdict.passed, 2);
        assert_eq!(verdict.failed_testcase, Some(3));
        assert!(verdict.efficiency.is_none());
        // Cases 4 and 5 never reach the sandbox
        assert_eq!(judge.sandbox.calls(), 3);
    }

    #[tokio::test]
    async fn python_error_is_runtime_error_not_compile_error() {
        // Python has no compile step, so a syntax error surfaces at run time
        let (judge, _scratch) = test_judge(vec![crashed("SyntaxError: invalid syntax")]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "print(", &cases(&["Hello"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::RuntimeError);
        assert_eq!(verdict.failed_testcase, Some(1));
        assert_eq!(verdict.passed, 0);
    }

    #[tokio::test]
    async fn java_compiles_once_for_all_cases() {
        // One compile invocation, then three runs
        let (judge, _scratch) = test_judge(vec![ok(""), ok("1"), ok("2"), ok("3")]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("java", "public class Main {}", &cases(&["1", "2", "3"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::Accepted);
        assert_eq!(verdict.passed, 3);
        assert_eq!(judge.sandbox.calls(), 4);

        let commands = judge.sandbox.commands.lock().unwrap();
        assert_eq!(commands[0], vec!["javac", "Main.java"]);
        assert_eq!(commands[1], vec!["java", "-cp", ".", "Main"]);
    }

    #[tokio::test]
    async fn java_compile_failure_is_terminal() {
        let (judge, _scratch) = test_judge(vec![crashed("error: class Solution is public")]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("java", "public class Solution {}", &cases(&["1", "2"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::CompileError);
        assert_eq!(verdict.passed, 0);
        assert_eq!(verdict.failed_testcase, None);
        // No test case ever runs
        assert_eq!(judge.sandbox.calls(), 1);
    }

    #[tokio::test]
    async fn enforced_kill_is_time_limit_exceeded() {
        let (judge, _scratch) = test_judge(vec![ok("1"), killed_on_ceiling(10_500)]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "...", &cases(&["1", "2", "3"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::TimeLimitExceeded);
        assert_eq!(verdict.passed, 1);
        assert_eq!(verdict.failed_testcase, Some(2));
        assert_eq!(judge.sandbox.calls(), 2);
    }

    #[tokio::test]
    async fn duration_over_ceiling_is_time_limit_exceeded() {
        // Even a clean exit counts as TLE if it lands past the hard ceiling
        let (judge, _scratch) = test_judge(vec![ok_with_duration("1", 10_001)]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "...", &cases(&["1"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::TimeLimitExceeded);
    }

    #[tokio::test]
    async fn acceptable_tier_emits_one_warning() {
        // Five cases, 2000 ms each
        let outcomes = (0..5).map(|i| ok_with_duration(&format!("{i}"), 2_000)).collect();
        let (judge, _scratch) = test_judge(outcomes);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "...", &cases(&["0", "1", "2", "3", "4"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::Accepted);
        assert_eq!(verdict.max_time_ms, 2_000);
        assert_eq!(verdict.time_ms, 10_000);
        assert_eq!(verdict.efficiency.as_ref().unwrap().tier, Tier::Acceptable);
        assert_eq!(verdict.warnings.len(), 1);
    }

    #[tokio::test]
    async fn backend_fault_yields_error_verdict_with_message() {
        let (judge, _scratch) = test_judge(vec![Err(SandboxError::BackendUnavailable(
            "Cannot connect to the Docker daemon".to_owned(),
        ))]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "...", &cases(&["1"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::Error);
        let message = verdict.message.unwrap();
        assert!(message.contains("container runtime unavailable"));
        // Distinguishable from a user-code runtime error
        assert_ne!(verdict.verdict, Verdict::RuntimeError);
    }

    #[tokio::test]
    async fn cancellation_yields_error_verdict() {
        let (judge, _scratch) = test_judge(vec![Err(SandboxError::Cancelled)]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "...", &cases(&["1"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::Error);
        assert!(verdict.message.unwrap().contains("cancelled"));
    }

    #[tokio::test]
    async fn unknown_language_fails_fast() {
        let (judge, scratch) = test_judge(vec![]);
        let cancel = CancellationToken::new();

        let result = judge.judge("cobol", "...", &cases(&["1"]), &cancel).await;

        assert!(matches!(
            result,
            Err(JudgeError::Config(ConfigError::LanguageNotFound(_)))
        ));
        // Rejected before any workspace was created
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
        assert_eq!(judge.sandbox.calls(), 0);
    }

    #[tokio::test]
    async fn oversized_code_fails_fast() {
        let scratch = tempfile::tempdir().unwrap();
        let mut config = Config {
            scratch_root: scratch.path().to_path_buf(),
            ..Config::default()
        };
        config.default_limits.max_code_size_bytes = Some(16);
        let judge = Judge::with_sandbox(config, FakeSandbox::new(vec![]));
        let cancel = CancellationToken::new();

        let result = judge
            .judge("python", "x = 'a very long program'", &cases(&["1"]), &cancel)
            .await;

        assert!(matches!(result, Err(JudgeError::CodeTooLarge { .. })));
        assert_eq!(judge.sandbox.calls(), 0);
    }

    #[tokio::test]
    async fn workspace_removed_after_judging() {
        let (judge, scratch) = test_judge(vec![ok("1")]);
        let cancel = CancellationToken::new();

        judge
            .judge("python", "...", &cases(&["1"]), &cancel)
            .await
            .unwrap();

        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn workspace_removed_after_fault() {
        let (judge, scratch) = test_judge(vec![Err(SandboxError::BackendUnavailable(
            "daemon down".to_owned(),
        ))]);
        let cancel = CancellationToken::new();

        judge
            .judge("python", "...", &cases(&["1"]), &cancel)
            .await
            .unwrap();

        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn comparison_is_whitespace_insensitive() {
        let (judge, _scratch) = test_judge(vec![ok("1  2\n3\n")]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "...", &[TestCase::new("", "1 2 3")], &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::Accepted);
    }

    #[tokio::test]
    async fn stdin_redirects_through_input_file() {
        let (judge, _scratch) = test_judge(vec![ok("4")]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "...", &[TestCase::new("2 2", "4")], &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::Accepted);
        let commands = judge.sandbox.commands.lock().unwrap();
        assert_eq!(
            commands[0],
            vec!["sh", "-c", "python3 solution.py < input.txt"]
        );
    }

    #[tokio::test]
    async fn execute_success() {
        let (judge, scratch) = test_judge(vec![ok("Hello\n")]);
        let cancel = CancellationToken::new();

        let request = ExecutionRequest::new("python", "print(\"Hello\")");
        let result = judge.execute(&request, &cancel).await.unwrap();

        assert_eq!(result.status, ExecutionStatus::Success);
        assert_eq!(result.stdout, "Hello\n");
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn execute_compile_error_for_java() {
        let (judge, _scratch) = test_judge(vec![crashed("error: ';' expected")]);
        let cancel = CancellationToken::new();

        let request = ExecutionRequest::new("java", "public class Main { broken }");
        let result = judge.execute(&request, &cancel).await.unwrap();

        assert_eq!(result.status, ExecutionStatus::CompilationError);
        assert!(result.stderr.contains("expected"));
        // The run step is never attempted
        assert_eq!(judge.sandbox.calls(), 1);
    }

    #[tokio::test]
    async fn execute_backend_fault_is_error_result() {
        let (judge, _scratch) = test_judge(vec![Err(SandboxError::SpawnFailed(
            std::io::Error::other("spawn failed"),
        ))]);
        let cancel = CancellationToken::new();

        let request = ExecutionRequest::new("python", "print(1)");
        let result = judge.execute(&request, &cancel).await.unwrap();

        assert_eq!(result.status, ExecutionStatus::Error);
        assert!(result.stderr.contains("spawn failed"));
    }

    #[tokio::test]
    async fn execute_unknown_language_fails_fast() {
        let (judge, _scratch) = test_judge(vec![]);
        let cancel = CancellationToken::new();

        let request = ExecutionRequest::new("fortran", "...");
        assert!(judge.execute(&request, &cancel).await.is_err());
    }

    #[tokio::test]
    async fn accepted_implies_all_passed_and_efficiency_present() {
        let (judge, _scratch) = test_judge(vec![ok("1"), ok("2")]);
        let cancel = CancellationToken::new();

        let verdict = judge
            .judge("python", "...", &cases(&["1", "2"]), &cancel)
            .await
            .unwrap();

        assert_eq!(verdict.verdict, Verdict::Accepted);
        assert_eq!(verdict.passed, verdict.total);
        assert!(verdict.efficiency.is_some());
    }
}

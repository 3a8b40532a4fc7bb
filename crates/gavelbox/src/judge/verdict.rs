use serde::{Deserialize, Serialize};

use crate::judge::efficiency::EfficiencyResult;

/// One `{input, expected output}` pair used to validate a submission.
///
/// Supplied by the problem repository; read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Data fed to the program on stdin
    #[serde(default)]
    pub input: String,

    /// Expected output, compared after whitespace normalization
    pub output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Final correctness classification of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "ACCEPTED")]
    Accepted,

    #[serde(rename = "WRONG_ANSWER")]
    WrongAnswer,

    #[serde(rename = "TIME_LIMIT_EXCEEDED")]
    TimeLimitExceeded,

    #[serde(rename = "RUNTIME_ERROR")]
    RuntimeError,

    #[serde(rename = "COMPILE_ERROR")]
    CompileError,

    /// Engine-level fault (backend unreachable, workspace failure); not a
    /// judgement of the submission itself
    #[serde(rename = "ERROR")]
    Error,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Verdict::Accepted => "ACCEPTED",
            Verdict::WrongAnswer => "WRONG_ANSWER",
            Verdict::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
            Verdict::RuntimeError => "RUNTIME_ERROR",
            Verdict::CompileError => "COMPILE_ERROR",
            Verdict::Error => "ERROR",
        };
        write!(f, "{name}")
    }
}

/// Outcome of judging one submission across all its test cases
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionVerdict {
    pub verdict: Verdict,

    /// Number of test cases that passed before the first failure
    pub passed: usize,

    /// Total number of test cases for the problem
    pub total: usize,

    /// Sum of wall-clock durations over passing test cases, in milliseconds
    pub time_ms: u64,

    /// Slowest passing test-case duration in milliseconds
    pub max_time_ms: u64,

    /// 1-based index of the first failing test case, if any
    pub failed_testcase: Option<usize>,

    /// Efficiency classification; present if and only if the verdict is ACCEPTED
    pub efficiency: Option<EfficiencyResult>,

    /// Advisory warnings (slow-but-accepted solutions)
    pub warnings: Vec<String>,

    /// Human-readable fault description for ERROR verdicts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmissionVerdict {
    /// A terminal non-accepted verdict at the given 1-based test case
    pub(crate) fn rejected(
        verdict: Verdict,
        failed_testcase: usize,
        total: usize,
        time_ms: u64,
        max_time_ms: u64,
    ) -> Self {
        Self {
            verdict,
            passed: failed_testcase - 1,
            total,
            time_ms,
            max_time_ms,
            failed_testcase: Some(failed_testcase),
            efficiency: None,
            warnings: Vec::new(),
            message: None,
        }
    }

    /// A compile failure; no test case counts as attempted
    pub(crate) fn compile_error(total: usize, diagnostics: String) -> Self {
        Self {
            verdict: Verdict::CompileError,
            passed: 0,
            total,
            time_ms: 0,
            max_time_ms: 0,
            failed_testcase: None,
            efficiency: None,
            warnings: Vec::new(),
            message: Some(diagnostics),
        }
    }

    /// An engine-level fault with a human-readable message
    pub(crate) fn fault(total: usize, message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Error,
            passed: 0,
            total,
            time_ms: 0,
            max_time_ms: 0,
            failed_testcase: None,
            efficiency: None,
            warnings: Vec::new(),
            message: Some(message.into()),
        }
    }
}

use gavelbox::{Judge, TestCase, Verdict};
use tokio_util::sync::CancellationToken;

use super::test_config;

fn doubling_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("1", "2"),
        TestCase::new("5", "10"),
        TestCase::new("21", "42"),
    ]
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn accepted_submission() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let verdict = judge
        .judge("python", "print(int(input()) * 2)", &doubling_cases(), &cancel)
        .await
        .expect("judge failed");

    assert_eq!(verdict.verdict, Verdict::Accepted);
    assert_eq!(verdict.passed, 3);
    assert!(verdict.efficiency.is_some());
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn wrong_answer_reports_first_failure() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let verdict = judge
        .judge("python", "print(int(input()) + 1)", &doubling_cases(), &cancel)
        .await
        .expect("judge failed");

    assert_eq!(verdict.verdict, Verdict::WrongAnswer);
    // 1 + 1 == 2 passes; 5 + 1 != 10 fails
    assert_eq!(verdict.passed, 1);
    assert_eq!(verdict.failed_testcase, Some(2));
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn java_compile_error_verdict() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let verdict = judge
        .judge("java", "class Main { broken", &doubling_cases(), &cancel)
        .await
        .expect("judge failed");

    assert_eq!(verdict.verdict, Verdict::CompileError);
    assert_eq!(verdict.passed, 0);
    assert!(verdict.message.is_some());
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn runtime_error_verdict() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let verdict = judge
        .judge("python", "raise RuntimeError('boom')", &doubling_cases(), &cancel)
        .await
        .expect("judge failed");

    assert_eq!(verdict.verdict, Verdict::RuntimeError);
    assert_eq!(verdict.failed_testcase, Some(1));
}

use gavelbox::{ExecutionRequest, ExecutionStatus, Judge, ResourceLimits};
use tokio_util::sync::CancellationToken;

use super::test_config;

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn run_hello_world_python() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let request = ExecutionRequest::new("python", "print('Hello, World!')");
    let result = judge.execute(&request, &cancel).await.expect("execute failed");

    assert!(result.is_success());
    assert!(result.stdout.contains("Hello, World!"));
    assert!(result.duration_ms > 0);
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn run_with_stdin() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let request = ExecutionRequest::new("python", "print(input())").with_stdin("test input");
    let result = judge.execute(&request, &cancel).await.expect("execute failed");

    assert!(result.is_success());
    assert!(result.stdout.contains("test input"));
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn run_time_limit_enforced() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let request = ExecutionRequest::new("python", "while True:\n    pass")
        .with_limits(ResourceLimits::new().with_time_limit_ms(1_000));
    let result = judge.execute(&request, &cancel).await.expect("execute failed");

    assert!(result.timed_out);
    assert!(!result.is_success());
    // Killed shortly after the ceiling, not left running
    assert!(result.duration_ms < 5_000);
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn run_runtime_error() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let request = ExecutionRequest::new("python", "import sys\nsys.exit(3)");
    let result = judge.execute(&request, &cancel).await.expect("execute failed");

    assert_eq!(result.status, ExecutionStatus::RuntimeError);
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn run_compiled_java() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let source = r#"
public class Main {
    public static void main(String[] args) {
        System.out.println("Hello from Java");
    }
}
"#;
    let request = ExecutionRequest::new("java", source);
    let result = judge.execute(&request, &cancel).await.expect("execute failed");

    assert!(result.is_success());
    assert!(result.stdout.contains("Hello from Java"));
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn java_compile_error_is_structured() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    let request = ExecutionRequest::new("java", "public class Main { this does not compile }");
    let result = judge.execute(&request, &cancel).await.expect("execute failed");

    assert_eq!(result.status, ExecutionStatus::CompilationError);
    assert!(!result.stderr.is_empty());
}

#[tokio::test]
#[ignore = "requires docker and language images"]
async fn python_stderr_error_text_is_not_a_compile_error() {
    let judge = Judge::new(test_config());
    let cancel = CancellationToken::new();

    // Prints "error:" on stderr but exits cleanly; classification must come
    // from the exit code, not from scanning stderr.
    let request = ExecutionRequest::new("python", "import sys\nprint('error: nope', file=sys.stderr)");
    let result = judge.execute(&request, &cancel).await.expect("execute failed");

    assert_eq!(result.status, ExecutionStatus::Success);
}

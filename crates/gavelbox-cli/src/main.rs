//! Gavelbox CLI
//!
//! A command-line tool for sandboxed code execution and judging.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gavelbox::{
    Config, EXAMPLE_CONFIG, ExecutionRequest, ExecutionStatus, Judge, ProblemStore,
    ResourceLimits, Verdict,
};
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gavelbox")]
#[command(about = "A tool for sandboxed code execution and judging")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init {
        /// Output path (default: gavelbox.toml)
        #[arg(short, long, default_value = "gavelbox.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a source file in the sandbox (compile if needed, then execute)
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Language ID (e.g., python, java)
        #[arg(short, long)]
        language: String,

        /// File whose contents are fed to the program on stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Time limit in milliseconds
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Memory limit in MB
        #[arg(short, long)]
        memory_limit: Option<u64>,
    },

    /// Judge a source file against a problem's test cases
    Judge {
        /// Problem ID (loaded from the problems directory)
        #[arg(value_name = "PROBLEM")]
        problem: String,

        /// Source file to judge
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Language ID (e.g., python, java)
        #[arg(short, long)]
        language: String,

        /// Directory containing problem manifests
        #[arg(short, long, default_value = "problems")]
        problems_dir: PathBuf,
    },

    /// List available languages
    Languages,

    /// Show the effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        info!(?path, "loading configuration");
        Config::from_file(path).context("failed to load configuration")?
    } else {
        debug!("using default configuration");
        Config::default()
    };

    // Ctrl-C cancels in-flight executions, which kills their containers
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling");
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Run {
            source,
            language,
            input,
            time_limit,
            memory_limit,
        } => {
            run_execute(
                config,
                &source,
                &language,
                input.as_deref(),
                time_limit,
                memory_limit,
                &cancel,
            )
            .await
        }
        Commands::Judge {
            problem,
            source,
            language,
            problems_dir,
        } => run_judge(config, &problem, &source, &language, &problems_dir, &cancel).await,
        Commands::Languages => {
            list_languages(&config);
            Ok(())
        }
        Commands::ShowConfig => {
            show_config(&config);
            Ok(())
        }
    }
}

async fn run_execute(
    config: Config,
    source: &PathBuf,
    language_id: &str,
    input: Option<&std::path::Path>,
    time_limit: Option<u64>,
    memory_limit: Option<u64>,
    cancel: &CancellationToken,
) -> Result<()> {
    let source_content = tokio::fs::read_to_string(source)
        .await
        .context("failed to read source file")?;

    let mut request = ExecutionRequest::new(language_id, source_content);

    if let Some(input_path) = input {
        let input_data = tokio::fs::read_to_string(input_path)
            .await
            .context("failed to read input file")?;
        request = request.with_stdin(input_data);
    }

    // Only explicitly-specified values go in, so they don't clobber
    // per-language defaults
    if time_limit.is_some() || memory_limit.is_some() {
        let mut limits = ResourceLimits::new();
        limits.time_limit_ms = time_limit;
        limits.memory_limit_mb = memory_limit;
        request = request.with_limits(limits);
    }

    info!(language = language_id, "running program");

    let judge = Judge::new(config);
    let result = judge
        .execute(&request, cancel)
        .await
        .context("execution failed")?;

    if !result.stdout.is_empty() {
        println!("{}", result.stdout);
    }
    if !result.stderr.is_empty() {
        eprintln!("{}", result.stderr);
    }

    // Log execution info via tracing (stderr), keeping stdout clean for piping
    info!(
        status = ?result.status,
        duration = format_args!("{} ms", result.duration_ms),
        timed_out = result.timed_out,
        "execution result"
    );

    match result.status {
        ExecutionStatus::Success if !result.timed_out => Ok(()),
        _ => std::process::exit(1),
    }
}

async fn run_judge(
    config: Config,
    problem_id: &str,
    source: &PathBuf,
    language_id: &str,
    problems_dir: &std::path::Path,
    cancel: &CancellationToken,
) -> Result<()> {
    let source_content = tokio::fs::read_to_string(source)
        .await
        .context("failed to read source file")?;

    let store = ProblemStore::new(problems_dir);
    let problem = store
        .load(problem_id)
        .await
        .context("failed to load problem")?;

    info!(
        problem = problem_id,
        title = %problem.title,
        testcases = problem.testcases.len(),
        "judging submission"
    );

    let judge = Judge::new(config);
    let verdict = judge
        .judge(language_id, &source_content, &problem.testcases, cancel)
        .await
        .context("judging failed")?;

    let json = serde_json::to_string_pretty(&verdict).context("failed to serialize verdict")?;
    println!("{json}");

    if verdict.verdict == Verdict::Accepted {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn list_languages(config: &Config) {
    println!("Available languages:\n");

    let mut languages: Vec<_> = config.languages.iter().collect();
    languages.sort_by_key(|(id, _)| *id);

    for (id, lang) in languages {
        let lang_type = if lang.is_compiled() {
            "compiled"
        } else {
            "interpreted"
        };
        println!("  {:<15} {} ({})", id, lang.name, lang_type);
    }
}

fn show_config(config: &Config) {
    println!("Default resource limits:");
    println!("  Time limit: {:?} ms", config.default_limits.time_limit_ms);
    println!(
        "  Memory limit: {:?} MB",
        config.default_limits.memory_limit_mb
    );
    println!("  CPU limit: {:?}", config.default_limits.cpu_limit);
    println!("  Pid limit: {:?}", config.default_limits.pid_limit);
    println!(
        "  Max code size: {:?} bytes",
        config.default_limits.max_code_size_bytes
    );
    println!();
    println!("Efficiency thresholds:");
    println!("  Optimal: <= {} ms", config.efficiency.optimal_ms);
    println!("  Acceptable: <= {} ms", config.efficiency.acceptable_ms);
    println!("  Brute force: <= {} ms", config.efficiency.brute_force_ms);
    println!();
    println!("Docker binary: {}", config.docker_binary().display());
    println!("Scratch root: {}", config.scratch_root.display());
    println!("Container workdir: {}", config.container_workdir);
    println!();
    println!("Languages configured: {}", config.languages.len());
}

async fn init_config(output: &PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}

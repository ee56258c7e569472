mod config;
mod prompt;

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::CliOverrides;
use prompt::StdinPrompt;
use srcdoctor_core::{
    Doctor, DoctorSettings, InteractiveOutcome, JavacDriver, ledger_report,
};
use srcdoctor_render::render_diagnostics;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "srcdoctor",
    version,
    about = "Compiler-validated repair tool for broken source trees."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Diagnose and repair a Java source tree with javac.
    Java(JavaArgs),
}

#[derive(Debug, Parser)]
struct JavaArgs {
    #[command(subcommand)]
    mode: JavaMode,
}

#[derive(Debug, Subcommand)]
enum JavaMode {
    /// Compile once and list diagnostics without touching any file.
    Diagnose(RunArgs),
    /// Review each candidate fix and confirm before it is applied.
    Interactive(RunArgs),
    /// Apply high-confidence fixes unattended until the tree is clean.
    Fix(RunArgs),
    /// Watch the source tree and repair files as they are saved.
    Watch(RunArgs),
    /// Show recent fix history from the ledger.
    Report(RunArgs),
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Repository root (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Java source tree (default: <repo_root>/src/main/java).
    #[arg(long)]
    src_dir: Option<Utf8PathBuf>,

    /// Minimum confidence for unattended fixes (0.0-1.0).
    #[arg(long)]
    threshold: Option<f64>,

    /// Maximum compile-fix-recompile rounds per run.
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Also try to repair compiler warnings.
    #[arg(long, default_value_t = false)]
    include_warnings: bool,

    /// Compiler timeout per invocation, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Quiet period before watch mode reacts, in milliseconds.
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// How many ledger entries the report shows.
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let Command::Java(args) = cli.cmd;

    let run_args = match &args.mode {
        JavaMode::Diagnose(a)
        | JavaMode::Interactive(a)
        | JavaMode::Fix(a)
        | JavaMode::Watch(a)
        | JavaMode::Report(a) => a,
    };
    let settings = settings_from(run_args)?;

    match args.mode {
        JavaMode::Diagnose(_) => cmd_diagnose(settings),
        JavaMode::Interactive(_) => cmd_interactive(settings),
        JavaMode::Fix(_) => cmd_fix(settings),
        JavaMode::Watch(_) => cmd_watch(settings),
        JavaMode::Report(_) => cmd_report(settings),
    }
}

fn settings_from(args: &RunArgs) -> anyhow::Result<DoctorSettings> {
    // Anchor everything at an absolute root so diagnostic paths come out
    // absolute no matter where the tool was invoked from.
    let repo_root = args
        .repo_root
        .canonicalize_utf8()
        .with_context(|| format!("resolve repository root {}", args.repo_root))?;
    let file_config = config::load_or_default(&repo_root).context("load srcdoctor.toml config")?;
    let overrides = CliOverrides {
        src_dir: args.src_dir.clone(),
        confidence_threshold: args.threshold,
        max_iterations: args.max_iterations,
        include_warnings: args.include_warnings,
        timeout_secs: args.timeout_secs,
        debounce_ms: args.debounce_ms,
        report_limit: args.limit,
    };
    Ok(config::build_settings(repo_root, file_config, overrides))
}

fn doctor_for(settings: DoctorSettings) -> anyhow::Result<Doctor> {
    let driver = JavacDriver::new(
        &settings.repo_root,
        settings.src_dir.clone(),
        Duration::from_secs(settings.compile_timeout_secs),
    )?;
    Doctor::new(settings, Box::new(driver))
}

fn cmd_diagnose(settings: DoctorSettings) -> anyhow::Result<ExitCode> {
    let repo_root = settings.repo_root.clone();
    let doctor = doctor_for(settings)?;
    let diagnostics = doctor.diagnose()?;
    if diagnostics.is_empty() {
        println!("No compiler diagnostics. The tree is clean.");
        return Ok(ExitCode::SUCCESS);
    }
    println!("{}", render_diagnostics(&diagnostics, &repo_root));
    println!("{} diagnostic(s).", diagnostics.len());
    Ok(ExitCode::from(1))
}

fn cmd_interactive(settings: DoctorSettings) -> anyhow::Result<ExitCode> {
    let doctor = doctor_for(settings)?;
    let outcome = doctor.interactive(&mut StdinPrompt)?;
    let code = match outcome {
        InteractiveOutcome::Clean => ExitCode::SUCCESS,
        InteractiveOutcome::Quit | InteractiveOutcome::IterationLimit => ExitCode::from(1),
    };
    Ok(code)
}

fn cmd_fix(settings: DoctorSettings) -> anyhow::Result<ExitCode> {
    let repo_root = settings.repo_root.clone();
    let doctor = doctor_for(settings)?;
    let report = doctor.auto_fix()?;

    info!(
        iterations = report.iterations,
        applied = report.applied,
        "fix run finished"
    );
    if report.converged {
        println!(
            "Clean after {} round(s); {} fix(es) applied.",
            report.iterations, report.applied
        );
        return Ok(ExitCode::SUCCESS);
    }
    println!(
        "{} diagnostic(s) remain after {} round(s); {} fix(es) applied.",
        report.remaining.len(),
        report.iterations,
        report.applied
    );
    println!("{}", render_diagnostics(&report.remaining, &repo_root));
    Ok(ExitCode::from(1))
}

fn cmd_watch(settings: DoctorSettings) -> anyhow::Result<ExitCode> {
    let doctor = doctor_for(settings)?;
    doctor.watch(Arc::new(AtomicBool::new(false)))?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_report(settings: DoctorSettings) -> anyhow::Result<ExitCode> {
    // Reads only the ledger; works without a JDK on PATH.
    println!("{}", ledger_report(&settings)?);
    Ok(ExitCode::SUCCESS)
}

// src/lib.rs

pub mod cancel;
pub mod cli;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod invocation;
pub mod logging;
pub mod plan;
pub mod resolve;
pub mod types;

use tracing::{debug, info, warn};

use crate::cancel::CancellationController;
use crate::cli::CliArgs;
use crate::errors::Result;
use crate::exec::{CommandRunner, Engine};
use crate::fs::RealFileSystem;
use crate::invocation::{diagnostic_env, Invocation};
use crate::plan::{load_and_validate, ExecutionPlan};
use crate::resolve::{needs_lookup, Resolver, RunfilesConfig, ShellStrategy};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - signal handling
/// - plan loading
/// - command resolution
/// - the execution engine
///
/// Returns the aggregate success of the plan. `Err` is reserved for setup
/// failures, in which case no command has been started.
pub async fn run(args: CliArgs, invocation: Invocation) -> Result<bool> {
    // Installed first so an early Ctrl-C is observed rather than fatal.
    let controller = CancellationController::new();
    let _signals = controller.listen_for_signals()?;

    let mut plan = load_and_validate(&invocation.plan_path)?;
    let verbose = invocation.verbose || plan.verbose;
    plan.verbose = verbose;
    plan.append_args(&args.extra_args);

    let plan = resolve_plan(plan, &invocation, verbose)?;
    if verbose {
        print_diagnostics(&invocation, &plan);
    }

    let engine = Engine::new();
    Ok(run_until_done(&engine, plan, &controller).await)
}

/// Resolve every command, discovering runfiles only when some command
/// actually needs a lookup.
fn resolve_plan(plan: ExecutionPlan, invocation: &Invocation, verbose: bool) -> Result<ExecutionPlan> {
    let mut resolver = Resolver::new(RealFileSystem, ShellStrategy::current());

    if plan.commands.iter().any(|c| needs_lookup(&c.path)) {
        let config = RunfilesConfig::discover(
            invocation.runfiles_manifest.clone(),
            invocation.runfiles_dir.clone(),
            &invocation.exe,
            &RealFileSystem,
        )?;
        if verbose {
            if let Some((key, value)) = config.exported_env() {
                println!("set {key}={value}");
            }
        }
        debug!(?config, "using runfiles");
        resolver = resolver.with_runfiles(&config)?;
    }

    resolver.resolve_all(plan)
}

/// Run the engine to completion.
///
/// A cancellation signal is reported but does not cut the run short: the
/// engine has no way to stop children, so we keep waiting for them.
pub async fn run_until_done<R: CommandRunner>(
    engine: &Engine<R>,
    plan: ExecutionPlan,
    controller: &CancellationController,
) -> bool {
    let mut cancelled = controller.handle();
    let run = engine.run(plan);
    tokio::pin!(run);

    tokio::select! {
        success = &mut run => success,
        _ = cancelled.cancelled() => {
            info!("cancellation requested; waiting for running commands to exit");
            let success = run.await;
            warn!(success, "finished after interrupt");
            success
        }
    }
}

/// Verbose dump: how we were invoked, the runfiles environment and the
/// resolved plan.
fn print_diagnostics(invocation: &Invocation, plan: &ExecutionPlan) {
    println!("args[0]: {}", invocation.argv0);
    println!("invoking exe: {}", invocation.exe.display());
    for (key, value) in diagnostic_env() {
        println!("{key}={value}");
    }
    println!("Read instructions {}", invocation.plan_path.display());
    match serde_json::to_string_pretty(plan) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("error: {e}"),
    }
}

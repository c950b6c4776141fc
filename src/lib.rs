// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod gate;
pub mod job;
pub mod logging;
pub mod report;
pub mod status;
pub mod types;

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{Manifest, load_and_validate};
use crate::dag::{DependencyGraph, ReverseReachability, resolve_tiers};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, bar_if_not_executable};
use crate::exec::ManifestRunner;
use crate::gate::{GateOptions, evaluate_gate};
use crate::job::JobSet;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - manifest loading
/// - gate options (CLI overrides manifest)
/// - core / runtime / manifest runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let manifest_path = PathBuf::from(&args.manifest);
    let manifest = load_and_validate(&manifest_path)?;

    let caveats = args
        .ignore_caveats
        .as_deref()
        .unwrap_or(&manifest.options.ignored_caveats);
    let options = GateOptions::from_ignored_caveats(caveats);
    let slots = args.jobs.unwrap_or(manifest.options.jobs);

    let jobs = JobSet::from_manifest(&manifest);

    if args.dry_run {
        print_dry_run(&manifest, &jobs, &options);
        return Ok(());
    }

    // Runners report completions inline, so leave room for one per job.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(jobs.len().max(64));
    let runner = ManifestRunner::new(rt_tx.clone());

    // Ctrl-C -> stop dispatching, drain running jobs.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    info!(
        manifest = %manifest_path.display(),
        jobs = jobs.len(),
        slots,
        ?options,
        "starting run"
    );

    let core = CoreRuntime::new(jobs, options, slots, manifest.options.max_polls);
    let runtime = Runtime::new(core, rt_rx, runner);
    let summary = runtime.run().await?;

    for result in summary.results() {
        debug!(job = %result.name, bucket = %result.bucket, color = ?result.color(), "job result");
        println!("{}", result.line());
    }
    println!(
        "{} passed, {} failed, {} skipped",
        summary.passed(),
        summary.failed(),
        summary.skipped()
    );

    if !summary.is_success() {
        let undecided = summary.undecided();
        if undecided.is_empty() {
            anyhow::bail!("{} job(s) failed", summary.failed());
        }
        anyhow::bail!("jobs left undecided: {}", undecided.join(", "));
    }
    Ok(())
}

/// Print tiers, transitive dependents and the current gate verdict per job.
///
/// Gate evaluation may still write `Blocked` statuses, but only into the
/// in-memory job set; nothing is dispatched.
fn print_dry_run(manifest: &Manifest, jobs: &JobSet, options: &GateOptions) {
    println!("testdag dry-run");
    println!("  options.ignored_caveats = {:?}", manifest.options.ignored_caveats);
    println!("  options.jobs = {}", manifest.options.jobs);
    println!("  options.max_polls = {}", manifest.options.max_polls);
    println!();

    let graph = DependencyGraph::from_jobs(jobs.iter().map(|j| j.as_ref()));
    match resolve_tiers(&graph) {
        Ok(tiers) => {
            println!("tiers ({}):", tiers.len());
            for (i, tier) in tiers.iter().enumerate() {
                let names: Vec<&str> = tier.iter().map(|s| s.as_str()).collect();
                println!("  {i}: {}", names.join(" "));
            }
        }
        Err(err) => println!("tiers: {err}"),
    }
    println!();

    let dependents = ReverseReachability::from_graph(&graph);
    let siblings = jobs.to_vec();
    println!("jobs ({}):", jobs.len());
    for job in jobs.iter() {
        println!("  - {}", job.name());
        if !job.prereqs().is_empty() {
            println!("      prereq: {:?}", job.prereqs());
        }
        if !job.outputs().is_empty() {
            println!("      outputs: {:?}", job.outputs());
        }
        let affected = dependents.reverse_reachable_set(job.name());
        if !affected.is_empty() {
            println!("      dependents: {affected:?}");
        }
        let verdict = bar_if_not_executable(job)
            .unwrap_or_else(|| evaluate_gate(job, &siblings, options));
        println!("      verdict: {verdict}");
    }

    debug!("dry-run complete (no execution)");
}

//! Run command implementation for Plotline CLI.
//!
//! Each script gets its own execution context and session. Scripts run in
//! parallel and share a single live registry, the way several notebook
//! clients share one registry in a server.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use plotline_core::{
    ExecutionContext, ExecutionResult, InMemoryLiveRegistry, LiveRegistry, Session, ShowConfig,
};
use rayon::prelude::*;

use crate::colors;
use crate::output::{print_registry, print_report};

/// Options shared by every script of one run.
pub struct RunOptions {
    pub context: Option<String>,
    pub config: ShowConfig,
    pub json: bool,
}

/// A script loaded and ready to run.
struct ScriptJob {
    path: String,
    context_id: String,
    source: String,
}

/// Result of one evaluated statement.
pub struct StatementOutcome {
    /// 1-based source line.
    pub line: usize,
    pub statement: String,
    pub result: ExecutionResult,
}

/// Everything a script run produced.
pub struct ScriptReport {
    pub path: String,
    pub context_id: String,
    pub outcomes: Vec<StatementOutcome>,
    /// Framework error that stopped the script, with its line.
    pub failure: Option<(usize, plotline_core::Error)>,
    pub elapsed: Duration,
}

/// Execute the run command.
pub fn execute(scripts: &[String], options: &RunOptions) -> anyhow::Result<()> {
    let start = Instant::now();
    let jobs = load_jobs(scripts, options.context.as_deref())?;

    let registry = Arc::new(InMemoryLiveRegistry::new());
    let reports: Vec<ScriptReport> = jobs
        .par_iter()
        .map(|job| run_job(job, registry.clone(), options.config))
        .collect();

    for report in &reports {
        print_report(report, options.json)?;
    }

    if options.config.angular && !options.json {
        print_registry(registry.as_ref(), &reports)?;
    }

    let failed = reports.iter().filter(|r| r.failure.is_some()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} script(s) failed", failed, reports.len());
    }

    if !options.json {
        let statements: usize = reports.iter().map(|r| r.outcomes.len()).sum();
        println!(
            "\n{}Completed{} {} statement(s) in {} script(s) in {:.2}s",
            colors::GREEN,
            colors::RESET,
            statements,
            reports.len(),
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn load_jobs(scripts: &[String], context: Option<&str>) -> anyhow::Result<Vec<ScriptJob>> {
    if context.is_some() && scripts.len() > 1 {
        anyhow::bail!("--context can only be used with a single script");
    }

    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(scripts.len());
    for script in scripts {
        let path = Path::new(script);
        if !path.exists() {
            anyhow::bail!("Script not found: {}", script);
        }
        let source =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", script))?;

        let context_id = match context {
            Some(id) => id.to_string(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| script.clone()),
        };
        if !seen.insert(context_id.clone()) {
            anyhow::bail!(
                "Two scripts map to context '{}'; rename one of them",
                context_id
            );
        }

        jobs.push(ScriptJob {
            path: script.clone(),
            context_id,
            source,
        });
    }
    Ok(jobs)
}

fn run_job(job: &ScriptJob, registry: Arc<dyn LiveRegistry>, config: ShowConfig) -> ScriptReport {
    let start = Instant::now();
    let context = ExecutionContext::new(job.context_id.as_str())
        .with_config(config)
        .with_registry(registry);
    let mut session = Session::script(context);

    let mut outcomes = Vec::new();
    let mut failure = None;
    for (index, statement) in job.source.lines().enumerate() {
        if statement.trim().is_empty() {
            continue;
        }
        match session.interpret(statement) {
            Ok(result) => outcomes.push(StatementOutcome {
                line: index + 1,
                statement: statement.trim().to_string(),
                result,
            }),
            Err(err) => {
                failure = Some((index + 1, err));
                break;
            }
        }
    }

    tracing::debug!(
        "Ran {} ({} statements) in {:?}",
        job.path,
        session.statements_executed(),
        start.elapsed()
    );

    ScriptReport {
        path: job.path.clone(),
        context_id: job.context_id.clone(),
        outcomes,
        failure,
        elapsed: start.elapsed(),
    }
}

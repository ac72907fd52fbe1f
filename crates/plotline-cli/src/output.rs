//! Output formatting for terminal display.

use plotline_core::{ContentKind, InMemoryLiveRegistry, LiveRegistry, RegistryFilter, Status};

use crate::colors;
use crate::run::ScriptReport;

/// Print every statement of a script that produced output, then its failure.
pub fn print_report(report: &ScriptReport, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }

    println!(
        "\n{}{}{} {}(context {}){}",
        colors::BOLD,
        report.path,
        colors::RESET,
        colors::DIM,
        report.context_id,
        colors::RESET
    );
    println!("{}", "─".repeat(50));

    for outcome in &report.outcomes {
        let result = &outcome.result;
        if result.status == Status::Success && result.message.is_empty() {
            continue;
        }

        println!(
            "{}[{}]{} {}",
            colors::CYAN,
            outcome.line,
            colors::RESET,
            outcome.statement
        );
        let tag = match (result.status, result.kind) {
            (Status::Error, _) => format!("{}ERROR{}", colors::RED, colors::RESET),
            (_, ContentKind::Text) => format!("{}TEXT{}", colors::DIM, colors::RESET),
            (_, kind) => format!("{}{}{}", colors::YELLOW, kind, colors::RESET),
        };
        println!("  {} {}", tag, result.message.trim_end());
    }

    if let Some((line, err)) = &report.failure {
        eprintln!(
            "{}error{} in {} line {}: {}",
            colors::RED,
            colors::RESET,
            report.path,
            line,
            err.with_hint()
        );
    } else {
        println!(
            "{}{} statement(s) in {:.2}s{}",
            colors::DIM,
            report.outcomes.len(),
            report.elapsed.as_secs_f64(),
            colors::RESET
        );
    }
    Ok(())
}

/// One JSON object per statement on stdout; failures on stderr.
fn print_json(report: &ScriptReport) -> anyhow::Result<()> {
    for outcome in &report.outcomes {
        let record = serde_json::json!({
            "context": report.context_id,
            "line": outcome.line,
            "statement": outcome.statement,
            "result": outcome.result,
        });
        println!("{}", serde_json::to_string(&record)?);
    }
    if let Some((line, err)) = &report.failure {
        let record = serde_json::json!({
            "context": report.context_id,
            "line": line,
            "error": err.to_string(),
        });
        eprintln!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

/// Print the figure entries each context published.
pub fn print_registry(
    registry: &InMemoryLiveRegistry,
    reports: &[ScriptReport],
) -> anyhow::Result<()> {
    println!("\n{}Live registry:{}", colors::BOLD, colors::RESET);
    for report in reports {
        let entries = registry.get_all(&report.context_id, RegistryFilter::Named("figure_"))?;
        if entries.is_empty() {
            println!("  {}{}: (empty){}", colors::DIM, report.context_id, colors::RESET);
            continue;
        }
        for entry in entries {
            println!(
                "  {}/{} {}({} bytes){}",
                report.context_id,
                entry.name,
                colors::DIM,
                entry.value.len(),
                colors::RESET
            );
        }
    }
    Ok(())
}

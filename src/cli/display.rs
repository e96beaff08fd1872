//! Console output for evaluation and mining runs

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use completion_eval::evaluation::{EvaluationRecord, RunReport, Summary};
use completion_eval::export::format_score;
use completion_eval::mine::MineStats;

/// Two-column table header
pub fn print_header() {
    println!("{:<30}{:<30}", "Method name", "Similarity measure");
    println!("{:<30}{:<30}", "------------", "--------------------");
}

/// One line per matched record: its top-ranked candidate
pub fn print_top_candidates(records: &[EvaluationRecord]) {
    for top in records
        .iter()
        .filter_map(|r| r.ranked_results().and_then(|results| results.first()))
    {
        println!("{:<30}{:<30}", top.method, format_score(top.similarity()));
    }
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Human-readable run summary
pub fn print_summary(summary: &Summary, report: &RunReport, output: &Path) {
    println!();
    println!("{}", "=== Evaluation ===".bold());
    println!(
        "Archives:  {} ({} skipped)",
        report.archives,
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!("  {} {}: {}", "!".yellow(), skipped.path.display(), skipped.error);
    }
    println!("Evaluated: {}", summary.evaluated);
    println!(
        "Matched:   {} ({} with no candidates)",
        summary.matched.to_string().green(),
        summary.empty_results
    );
    println!("Unmatched: {}", summary.unmatched.to_string().red());
    if summary.matched > 0 {
        println!(
            "Hit@1 {}  Hit@5 {}  Hit@10 {}  MRR {:.3}",
            percent(summary.hit_at_1).bold(),
            percent(summary.hit_at_5),
            percent(summary.hit_at_10),
            summary.mrr
        );
    }
    println!("Report:    {}", output.display().to_string().cyan());
}

/// Run summary as a JSON object on stdout
pub fn print_summary_json(summary: &Summary, report: &RunReport, output: &Path) -> Result<()> {
    let skipped: Vec<_> = report
        .skipped
        .iter()
        .map(|s| {
            serde_json::json!({
                "path": s.path.display().to_string(),
                "error": s.error.to_string(),
            })
        })
        .collect();
    let json = serde_json::json!({
        "archives": report.archives,
        "skipped": skipped,
        "summary": summary,
        "output": output.display().to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Mining run summary
pub fn print_mine_summary(stats: &MineStats, files: usize, model_dir: &Path) {
    println!(
        "Mined {} observations from {} contexts in {} archives ({} unresolved invocations skipped)",
        stats.entries.to_string().green(),
        stats.contexts,
        stats.archives,
        stats.unresolved
    );
    println!(
        "Wrote {} model files to {}",
        files,
        model_dir.display().to_string().cyan()
    );
}

//! Terminal output formatting.

use colored::Colorize;

use neograph_core::ingest::RowErrorKind;
use neograph_core::IngestReport;

/// Print the end-of-run summary.
pub fn print_report(report: &IngestReport) {
    let title = if report.is_complete() {
        "Load complete".green().bold()
    } else {
        "Load aborted".red().bold()
    };
    println!("{}", title);
    println!("{}", "─".repeat(40));
    println!("  Rows processed:  {}", report.rows_processed.to_string().cyan());
    println!("  Rows skipped:    {}", count(report.rows_skipped));
    println!("  Rows failed:     {}", count(report.rows_failed));
    println!("  Diagnosis codes: {}", report.diagnosis_codes);
    println!("  Dx links:        {}", report.dx_links);
    println!("  Store retries:   {}", report.store_retries);
    println!("  Cache hits:      {}", report.cache_hits);

    if !report.errors.is_empty() {
        println!();
        println!("{}", "Errors".bold());
        for error in &report.errors {
            let kind = match error.kind {
                RowErrorKind::Parse => "parse".yellow(),
                RowErrorKind::Store => "store".red(),
                RowErrorKind::Read => "read".red(),
            };
            println!("  {} [{}] {}", format!("line {}", error.line).dimmed(), kind, error.message);
        }
        let hidden = report.error_count - report.errors.len();
        if hidden > 0 {
            println!("  {}", format!("... and {} more", hidden).dimmed());
        }
    }

    if !report.transient_errors.is_empty() {
        println!();
        println!("{}", "Recovered store errors".bold());
        for message in &report.transient_errors {
            println!("  {}", message.dimmed());
        }
    }

    if let Some(abort) = &report.abort {
        println!();
        println!("{} line {}: {}", "Stopped at".red().bold(), abort.line, abort.error);
        if !abort.failed_lines.is_empty() {
            let failed: Vec<String> = abort.failed_lines.iter().map(|l| l.to_string()).collect();
            println!("  Unwritten lines: {}", failed.join(", "));
        }
        if let Some(resume) = abort.resume_line {
            println!("  Not read from line {} onward", resume);
        }
    }
}

/// Print a code and its derived prefix chain.
pub fn print_chain(raw: &str, chain: &[String]) {
    if chain.is_empty() {
        println!("{} {}", raw.yellow(), "(empty code)".dimmed());
        return;
    }
    let arrow = format!(" {} ", "→".dimmed());
    let path: Vec<String> = chain.iter().rev().cloned().collect();
    println!("{} {}", raw.cyan().bold(), path.join(arrow.as_str()));
}

fn count(n: usize) -> colored::ColoredString {
    if n == 0 {
        n.to_string().normal()
    } else {
        n.to_string().yellow()
    }
}

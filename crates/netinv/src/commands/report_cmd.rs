//! Report and export command handlers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use netinv_core::{DeviceRecord, Report, report::Breakdown};

use crate::cli::ExportArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

const DEFAULT_EXPORT_FILE: &str = "netinv-report.txt";

// ── Report ──────────────────────────────────────────────────────────

pub fn handle_report(ctx: &Context<'_>) {
    let report = Report::build(ctx.inventory.records());
    let out = output::render_single(ctx.format, &report, report_detail, |r| {
        format!("{} devices", r.total)
    });
    output::print_output(&out, ctx.global.quiet);
}

fn report_detail(report: &Report) -> String {
    let mut lines = vec![
        format!(
            "Inventory report ({})",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ),
        format!("Total devices: {}", report.total),
    ];
    if report.total == 0 {
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push("By type:".into());
    push_breakdowns(&mut lines, &report.by_type);
    lines.push(String::new());
    lines.push("By layer:".into());
    push_breakdowns(&mut lines, &report.by_layer);
    lines.join("\n")
}

fn push_breakdowns(lines: &mut Vec<String>, breakdowns: &[Breakdown]) {
    for b in breakdowns {
        lines.push(format!("  {:<14} {}", b.label, b.count));
        for sample in &b.samples {
            lines.push(format!("      {sample}"));
        }
    }
}

// ── Export ──────────────────────────────────────────────────────────

pub fn handle_export(ctx: &Context<'_>, args: &ExportArgs) -> Result<(), CliError> {
    let path: PathBuf = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));

    write_text_report(&path, ctx.inventory.records(), ctx.global.quiet)?;
    output::success(
        ctx.global.quiet,
        &format!(
            "Exported {} device{} to {}",
            ctx.inventory.len(),
            if ctx.inventory.len() == 1 { "" } else { "s" },
            path.display()
        ),
    );
    Ok(())
}

fn write_text_report(path: &Path, records: &[DeviceRecord], quiet: bool) -> Result<(), CliError> {
    let report = Report::build(records);
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "NETWORK DEVICE INVENTORY")?;
    writeln!(
        w,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(w, "Devices:   {}", report.total)?;
    writeln!(w, "{}", "=".repeat(60))?;

    let bar = progress_bar(records.len() as u64, quiet);
    for (i, rec) in records.iter().enumerate() {
        writeln!(w)?;
        writeln!(w, "Device #{}", i + 1)?;
        for line in crate::commands::devices::detail(rec).lines() {
            writeln!(w, "  {line}")?;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    writeln!(w)?;
    writeln!(w, "{}", "-".repeat(60))?;
    writeln!(w, "Summary by type:")?;
    for b in &report.by_type {
        writeln!(w, "  {:<14} {}", b.label, b.count)?;
    }
    writeln!(w, "Summary by layer:")?;
    for b in &report.by_layer {
        writeln!(w, "  {:<14} {}", b.label, b.count)?;
    }

    w.flush()?;
    Ok(())
}

fn progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{spinner} exporting [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

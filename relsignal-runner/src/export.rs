//! Reporting and export: JSON and CSV artifacts for scan results.
//!
//! All persisted reports include a `schema_version` field. Newer versions
//! are rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::scan::{ScanReport, SymbolOutcome, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `ScanReport` to pretty JSON.
pub fn export_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScanReport to JSON")
}

/// Deserialize a `ScanReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScanReport> {
    let report: ScanReport =
        serde_json::from_str(json).context("failed to deserialize ScanReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export every divergence signal in the report as CSV.
///
/// Columns: symbol, kind, index, date, close
pub fn export_signals_csv(report: &ScanReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["symbol", "kind", "index", "date", "close"])?;

    for entry in &report.symbols {
        for s in entry.signals() {
            let index = s.index.to_string();
            let date = s.date.to_string();
            let close = format!("{:.4}", s.close);
            wtr.write_record([
                entry.symbol.as_str(),
                s.kind.as_str(),
                index.as_str(),
                date.as_str(),
                close.as_str(),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export weekly threshold signals as CSV.
///
/// Columns: symbol, kind, week_end, close, change_pct
pub fn export_weekly_csv(report: &ScanReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["symbol", "kind", "week_end", "close", "change_pct"])?;

    for entry in &report.symbols {
        if let SymbolOutcome::Evaluated { weekly, .. } = &entry.outcome {
            for w in weekly {
                let week_end = w.week_end.to_string();
                let close = format!("{:.4}", w.close);
                let change = format!("{:.2}", w.change_pct);
                wtr.write_record([
                    entry.symbol.as_str(),
                    w.kind.as_str(),
                    week_end.as_str(),
                    close.as_str(),
                    change.as_str(),
                ])?;
            }
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write the report as JSON to `path`, creating parent directories.
pub fn save_report(report: &ScanReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, export_json(report)?)
        .with_context(|| format!("failed to write report {}", path.display()))
}

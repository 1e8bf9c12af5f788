use anyhow::{Context, Result};
use std::{env, fs};

use kuvera::{extract_rows, parse_rows, RowKind};

fn main() -> Result<()> {
    let report_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "capital_gains_report.xls".to_string());

    let html = fs::read_to_string(&report_path)
        .with_context(|| format!("Cannot open {}", report_path))?;

    let rows = extract_rows(&html).with_context(|| format!("Cannot read rows of {}", report_path))?;
    println!("Body rows ({}):", rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let kind = row.kind();
        let preview: String = row
            .first()
            .split('\n')
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(60)
            .collect();
        let marker = if kind == RowKind::Ignored { "  " } else { "->" };
        println!(
            "  row {:>4}: {:>2} cols {} {:<12} {}",
            idx + 1,
            row.len(),
            marker,
            format!("{:?}", kind),
            preview
        );
    }

    match parse_rows(&rows) {
        Ok(report) => {
            println!("\n== Parsed report ==");
            println!("{}", serde_json::to_string_pretty(&report)?);
            println!("\n== Reconciliation ==");
            println!("{}", serde_json::to_string_pretty(&report.reconciliation())?);
        }
        Err(e) => {
            println!("\n(parse failed: {e})");
        }
    }

    Ok(())
}

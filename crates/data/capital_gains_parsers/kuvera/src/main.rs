use anyhow::{Context, Result};
use log::warn;
use std::env;

use kuvera::{Config, KuveraCapitalGainsParser, Reconciliation};

// Differences below this are rounding in the report's own totals
const RECONCILIATION_TOLERANCE: f64 = 0.01;

fn main() -> Result<()> {
    // Usage:
    //   kuvera_parser <capital_gains_report.xls> <cleartax_template.xlsx> <output.xlsx>
    //
    // The Kuvera "xls" export is really an HTML document.

    logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cfg = Config::from_args(&args)?;

    println!("📖 Parsing capital gains report: {}", cfg.report_path.display());
    let parser = KuveraCapitalGainsParser::new();
    let report = parser.parse_file(&cfg.report_path)?;

    if report.transactions.is_empty() {
        println!("⚠️  No transactions found, the output will only contain the template.");
    }

    print_reconciliation(&report.reconciliation());

    println!("📖 Reading template from: {}", cfg.template_path.display());
    let summary =
        utils::write_capital_gains_report(&report.transactions, &cfg.template_path, &cfg.output_path)
            .with_context(|| format!("Failed writing {}", cfg.output_path.display()))?;

    println!("\n📊 Summary:");
    println!(
        "✓ Transactions written: {} (sheet '{}')",
        summary.rows_written, summary.sheet_name
    );
    println!("✅ Report written to: {}", summary.destination.display());

    Ok(())
}

fn print_reconciliation(recon: &Reconciliation) {
    println!("Sum of all STCG across all transactions: {:.2}", recon.short_term_sum);
    println!("Total STCG from report: {}", reported(recon.short_term_reported));
    println!("Sum of all LTCG across all transactions: {:.2}", recon.long_term_sum);
    println!("Total LTCG from report: {}", reported(recon.long_term_reported));

    if !recon.is_balanced(RECONCILIATION_TOLERANCE) {
        warn!(
            "parsed gains do not match the report totals (STCG diff {:?}, LTCG diff {:?})",
            recon.short_term_difference(),
            recon.long_term_difference()
        );
    }
}

fn reported(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "not reported".to_string())
}

//! Text rendering for command results

use crate::application::CommonPairs;
use crate::domain::{PriceReport, ProfitEntry};

const PROFIT_HEADERS: [&str; 6] = [
    "Currency Pair",
    "Exchange (min)",
    "Min Price",
    "Exchange (max)",
    "Max Price",
    "% Profit",
];

/// Single-pair analysis
pub fn render_report(report: &PriceReport) -> String {
    format!(
        "Price analysis for pair: {}\n\
         Minimum price: {} on exchange {}\n\
         Maximum price: {} on exchange {}\n",
        report.pair(),
        report.min().price(),
        report.min().exchange(),
        report.max().price(),
        report.max().exchange()
    )
}

/// Profit list as a bordered table
pub fn render_profit_table(entries: &[ProfitEntry]) -> String {
    if entries.is_empty() {
        return "No profitable pairs found.\n".to_string();
    }

    let rows: Vec<[String; 6]> = entries
        .iter()
        .map(|e| {
            [
                e.pair().to_string(),
                e.min_exchange().to_string(),
                e.min_price().to_string(),
                e.max_exchange().to_string(),
                e.max_price().to_string(),
                format!("{:.2}%", e.profit_percentage().round_dp(2)),
            ]
        })
        .collect();

    let mut widths = PROFIT_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let border: String = widths
        .iter()
        .map(|width| format!("{}+", "-".repeat(width + 2)))
        .fold(String::from("+"), |line, cell| line + &cell);

    let mut lines = vec![
        border.clone(),
        table_row(&PROFIT_HEADERS.map(String::from), &widths),
        border.clone(),
    ];
    lines.extend(rows.iter().map(|row| table_row(row, &widths)));
    lines.push(border);

    lines.join("\n") + "\n"
}

fn table_row(cells: &[String; 6], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!(" {:<width$} |", cell, width = width))
        .fold(String::from("|"), |line, cell| line + &cell)
}

/// Common pairs, one per line
pub fn render_pairs(common: &CommonPairs) -> String {
    let mut out = format!("{} common pairs ({} intersection)\n", common.len(), common.policy);
    for pair in &common.pairs {
        out.push_str(&format!("  {}\n", pair));
    }
    out
}

/// Per-exchange listing outcome
pub fn render_listings(common: &CommonPairs) -> String {
    common
        .listings
        .iter()
        .map(|listing| match &listing.result {
            Ok(count) => format!("  {:<10} {} pairs\n", listing.exchange, count),
            Err(e) => format!("  {:<10} FAILED: {}\n", listing.exchange, e),
        })
        .collect()
}

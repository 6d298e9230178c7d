//! Terminal rendering of the dashboard and the spending summary.
//!
//! Shows four KPI lines followed by bar lists for categories, recipients and
//! months. Bars are `fraction * BAR_WIDTH` cells wide.

use std::fmt::Write;

use crate::{
    dashboard::{DashboardSummary, SpendingSummary},
    format::{fit_label, format_currency, paint, pluralize},
};

const LABEL_WIDTH: usize = 16;
const AMOUNT_WIDTH: usize = 14;
const BAR_WIDTH: usize = 30;
const RECIPIENT_BAR_COLOR: &str = "#333";
const MONTH_BAR_COLOR: &str = "#6366f1";

/// Renders the dashboard as plain text.
///
/// When `use_color` is set, bars are painted in their category color with
/// ANSI escape codes.
pub fn render_dashboard(summary: &DashboardSummary, use_color: bool) -> String {
    let mut output = String::new();

    let kpis = [
        (
            summary.period.month.label(),
            summary.period.total,
            pluralize(summary.period.count, "expense"),
        ),
        (
            "All Time".to_owned(),
            summary.all_time.total,
            format!("{} total", summary.all_time.count),
        ),
        (
            "Average".to_owned(),
            summary.average,
            "per expense".to_owned(),
        ),
        (
            "Largest".to_owned(),
            summary.largest,
            "single expense".to_owned(),
        ),
    ];

    for (label, amount, caption) in kpis {
        let _ = writeln!(
            output,
            "{}{:>AMOUNT_WIDTH$}   {caption}",
            fit_label(&label, LABEL_WIDTH),
            format_currency(amount),
        );
    }

    if summary.all_time.count == 0 {
        return output;
    }

    if !summary.by_category.is_empty() {
        output.push_str("\nBy Category\n");

        for row in &summary.by_category.rows {
            let color = use_color.then_some(row.color.as_str());
            push_bar_row(&mut output, &row.name, row.fraction, row.total, color);
        }
    }

    if !summary.by_recipient.is_empty() {
        output.push_str("\nBy Recipient\n");

        for row in &summary.by_recipient.rows {
            let color = use_color.then_some(RECIPIENT_BAR_COLOR);
            push_bar_row(&mut output, &row.name, row.fraction, row.total, color);
        }
    }

    if !summary.by_month.is_empty() {
        output.push_str("\nBy Month\n");

        for row in &summary.by_month {
            let color = use_color.then_some(MONTH_BAR_COLOR);
            push_bar_row(
                &mut output,
                &row.month.short_label(),
                row.fraction,
                row.total,
                color,
            );
        }
    }

    output
}

/// Renders the "Total Spent" panel with its per-category rows.
pub fn render_spending_summary(summary: &SpendingSummary) -> String {
    let mut output = format!(
        "{}{:>AMOUNT_WIDTH$}\n",
        fit_label("Total Spent", LABEL_WIDTH),
        format_currency(summary.total)
    );

    for row in &summary.by_category {
        let _ = writeln!(
            output,
            "  {}{:>AMOUNT_WIDTH$}",
            fit_label(&row.name, LABEL_WIDTH - 2),
            format_currency(row.total)
        );
    }

    output
}

fn push_bar_row(output: &mut String, label: &str, fraction: f64, total: f64, color: Option<&str>) {
    let bar = bar(fraction);
    let bar = match color {
        Some(color) => paint(&bar, color),
        None => bar,
    };

    let _ = writeln!(
        output,
        "{} {bar} {:>AMOUNT_WIDTH$}",
        fit_label(label, LABEL_WIDTH),
        format_currency(total)
    );
}

/// A bar of `fraction * BAR_WIDTH` filled cells padded to `BAR_WIDTH`.
fn bar(fraction: f64) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;

    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

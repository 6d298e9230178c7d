//! Dashboard module
//!
//! Computes the spending overview shown on the dashboard: totals for the
//! current month and all time, the average and largest expense, and ranked
//! breakdowns by category, recipient and month.
//!
//! Everything here is a pure function of its inputs. The current month is
//! passed in rather than read from the clock so that results are reproducible.

mod aggregation;
mod render;

use serde::Serialize;

use crate::{category::Category, expense::Expense, month::YearMonth};

pub use render::{render_dashboard, render_spending_summary};

use aggregation::{
    DEFAULT_CATEGORY_COLOR, RECIPIENT_LIMIT, aggregate_by_month, average, bar_fraction,
    category_colors, category_label, group_totals, largest, normalization_denominator,
    rank_descending, recipient_label, total, total_in_month, totals_for_categories,
};

/// Spending in the selected month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotal {
    /// The month the total covers.
    pub month: YearMonth,
    /// The sum of amounts dated in `month`.
    pub total: f64,
    /// How many expenses are dated in `month`.
    pub count: usize,
}

/// Spending over the whole expense list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllTimeTotal {
    /// The sum of all amounts.
    pub total: f64,
    /// How many expenses there are.
    pub count: usize,
}

/// One category's share of spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    pub name: String,
    /// The sum of amounts in the category.
    pub total: f64,
    /// The category's display color.
    pub color: String,
    /// `total` relative to the largest category, for bar widths, in `[0, 1]`.
    pub fraction: f64,
}

/// One recipient's share of spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipientTotal {
    /// The recipient's name, or "Unknown".
    pub name: String,
    /// The sum of amounts spent on the recipient.
    pub total: f64,
    /// `total` relative to the largest recipient, for bar widths, in `[0, 1]`.
    pub fraction: f64,
}

/// Spending in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    /// The month.
    pub month: YearMonth,
    /// The sum of amounts dated in the month.
    pub total: f64,
    /// How many expenses are dated in the month.
    pub count: usize,
    /// `total` relative to the largest month, for bar widths, in `[0, 1]`.
    pub fraction: f64,
}

/// Groups ranked by total, largest first, with the denominator used for
/// their fractions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown<T> {
    /// The ranked groups.
    pub rows: Vec<T>,
    /// The largest group total, or 1 if there are no groups or the largest
    /// total is not positive.
    pub max_total: f64,
}

impl<T> Breakdown<T> {
    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything the dashboard displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Spending in the current month.
    pub period: PeriodTotal,
    /// Spending over all expenses.
    pub all_time: AllTimeTotal,
    /// The mean expense amount, zero without expenses.
    pub average: f64,
    /// The largest single expense amount, zero without expenses.
    pub largest: f64,
    /// All categories that have expenses, largest first.
    pub by_category: Breakdown<CategoryTotal>,
    /// The top recipients, largest first.
    pub by_recipient: Breakdown<RecipientTotal>,
    /// Spending per month, oldest first.
    pub by_month: Vec<MonthTotal>,
}

/// Compute the dashboard for `expenses`.
///
/// `categories` supply the bar colors; categories without expenses do not
/// appear in the breakdown and expenses whose category is not in
/// `categories` get a neutral gray. `current_month` selects the period total.
///
/// Groups with equal totals keep the order in which they first appear in
/// `expenses`. Amounts are summed as given, including negative amounts.
pub fn summarize(
    expenses: &[Expense],
    categories: &[Category],
    current_month: YearMonth,
) -> DashboardSummary {
    let (period_total, period_count) = total_in_month(expenses, current_month);

    DashboardSummary {
        period: PeriodTotal {
            month: current_month,
            total: period_total,
            count: period_count,
        },
        all_time: AllTimeTotal {
            total: total(expenses),
            count: expenses.len(),
        },
        average: average(expenses),
        largest: largest(expenses),
        by_category: category_breakdown(expenses, categories),
        by_recipient: recipient_breakdown(expenses),
        by_month: monthly_totals(expenses),
    }
}

fn category_breakdown(expenses: &[Expense], categories: &[Category]) -> Breakdown<CategoryTotal> {
    let colors = category_colors(categories);

    let mut totals = group_totals(expenses, category_label);
    rank_descending(&mut totals);
    let max_total = normalization_denominator(&totals);

    let rows = totals
        .into_iter()
        .map(|(name, total)| CategoryTotal {
            name: name.to_owned(),
            total,
            color: colors
                .get(name)
                .copied()
                .unwrap_or(DEFAULT_CATEGORY_COLOR)
                .to_owned(),
            fraction: bar_fraction(total, max_total),
        })
        .collect();

    Breakdown { rows, max_total }
}

fn recipient_breakdown(expenses: &[Expense]) -> Breakdown<RecipientTotal> {
    let mut totals = group_totals(expenses, recipient_label);
    rank_descending(&mut totals);
    totals.truncate(RECIPIENT_LIMIT);
    let max_total = normalization_denominator(&totals);

    let rows = totals
        .into_iter()
        .map(|(name, total)| RecipientTotal {
            name: name.to_owned(),
            total,
            fraction: bar_fraction(total, max_total),
        })
        .collect();

    Breakdown { rows, max_total }
}

fn monthly_totals(expenses: &[Expense]) -> Vec<MonthTotal> {
    let months = aggregate_by_month(expenses);

    let max_total = months
        .iter()
        .map(|&(_, total, _)| total)
        .reduce(f64::max)
        .filter(|&max| max > 0.0)
        .unwrap_or(1.0);

    months
        .into_iter()
        .map(|(month, total, count)| MonthTotal {
            month,
            total,
            count,
            fraction: bar_fraction(total, max_total),
        })
        .collect()
}

/// A category's total in the spending summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    /// The category name.
    pub name: String,
    /// The sum of amounts in the category.
    pub total: f64,
}

/// The compact summary shown next to the expense list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    /// The sum of all amounts.
    pub total: f64,
    /// Totals for the listed categories that have spending, in list order.
    pub by_category: Vec<CategorySpend>,
}

/// Compute the spending summary for `expenses`.
///
/// Categories are reported in the order of `category_names`; names with no
/// positive total are left out, as are expenses in unlisted categories
/// (although they still count towards `total`).
pub fn spending_summary(expenses: &[Expense], category_names: &[&str]) -> SpendingSummary {
    SpendingSummary {
        total: total(expenses),
        by_category: totals_for_categories(expenses, category_names)
            .into_iter()
            .map(|(name, total)| CategorySpend {
                name: name.to_owned(),
                total,
            })
            .collect(),
    }
}

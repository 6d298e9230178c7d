//! Expense aggregation for the dashboard.
//!
//! Provides functions to total expenses, group them by category, recipient and
//! month, rank the groups and normalize them for bar display.

use std::collections::{BTreeMap, HashMap};

use crate::{category::Category, expense::Expense, month::YearMonth};

/// The group for expenses whose category is blank.
pub(super) const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The group for expenses without a named recipient.
pub(super) const UNKNOWN_RECIPIENT_LABEL: &str = "Unknown";

/// The bar color for categories that are not in the user's category list.
pub(super) const DEFAULT_CATEGORY_COLOR: &str = "#888";

/// The most recipients shown in the recipient breakdown.
pub(super) const RECIPIENT_LIMIT: usize = 6;

/// Sums `amount` and counts the expenses in `month`.
pub(super) fn total_in_month(expenses: &[Expense], month: YearMonth) -> (f64, usize) {
    expenses
        .iter()
        .filter(|expense| month.contains(expense.date))
        .fold((0.0, 0), |(total, count), expense| {
            (total + expense.amount, count + 1)
        })
}

/// Sums `amount` over all expenses.
pub(super) fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// The mean amount, or zero when there are no expenses.
pub(super) fn average(expenses: &[Expense]) -> f64 {
    if expenses.is_empty() {
        0.0
    } else {
        total(expenses) / expenses.len() as f64
    }
}

/// The largest single amount, or zero when there are no expenses.
pub(super) fn largest(expenses: &[Expense]) -> f64 {
    expenses
        .iter()
        .map(|expense| expense.amount)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// The category name an expense is grouped under.
pub(super) fn category_label(expense: &Expense) -> &str {
    if expense.category.trim().is_empty() {
        UNCATEGORIZED_LABEL
    } else {
        &expense.category
    }
}

/// The recipient name an expense is grouped under.
pub(super) fn recipient_label(expense: &Expense) -> &str {
    expense
        .recipient
        .as_ref()
        .map(|recipient| recipient.name.as_str())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(UNKNOWN_RECIPIENT_LABEL)
}

/// Sums amounts per group.
///
/// # Returns
/// Vector of (group name, total) in the order each group was first seen.
pub(super) fn group_totals<'a, F>(expenses: &'a [Expense], group_of: F) -> Vec<(&'a str, f64)>
where
    F: Fn(&'a Expense) -> &'a str,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, f64)> = Vec::new();

    for expense in expenses {
        let group = group_of(expense);

        match positions.get(group) {
            Some(&position) => totals[position].1 += expense.amount,
            None => {
                positions.insert(group, totals.len());
                totals.push((group, expense.amount));
            }
        }
    }

    totals
}

/// Sorts groups by total, largest first.
///
/// The sort is stable, so groups with equal totals keep their first-seen order.
pub(super) fn rank_descending(totals: &mut [(&str, f64)]) {
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// The denominator for bar widths: the top total of a ranked breakdown.
///
/// Falls back to 1 for an empty breakdown or a top total that is not
/// positive.
pub(super) fn normalization_denominator(ranked: &[(&str, f64)]) -> f64 {
    match ranked.first() {
        Some(&(_, top)) if top > 0.0 => top,
        _ => 1.0,
    }
}

/// The bar width of `total` relative to `max_total`, clamped to `[0, 1]`.
///
/// Negative totals get an empty bar.
pub(super) fn bar_fraction(total: f64, max_total: f64) -> f64 {
    (total / max_total).clamp(0.0, 1.0)
}

/// Looks up the display color for each category name.
pub(super) fn category_colors(categories: &[Category]) -> HashMap<&str, &str> {
    categories
        .iter()
        .map(|category| (category.name.as_str(), category.color.as_str()))
        .collect()
}

/// Sums and counts expenses by month.
///
/// # Returns
/// Vector of (month, total, count) in chronological order.
pub(super) fn aggregate_by_month(expenses: &[Expense]) -> Vec<(YearMonth, f64, usize)> {
    let mut totals: BTreeMap<YearMonth, (f64, usize)> = BTreeMap::new();

    for expense in expenses {
        let entry = totals.entry(YearMonth::of(expense.date)).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(month, (total, count))| (month, total, count))
        .collect()
}

/// Totals for the given category names in the given order, leaving out
/// categories with nothing spent.
pub(super) fn totals_for_categories<'a>(
    expenses: &[Expense],
    category_names: &[&'a str],
) -> Vec<(&'a str, f64)> {
    category_names
        .iter()
        .map(|&name| {
            let total = expenses
                .iter()
                .filter(|expense| expense.category == name)
                .map(|expense| expense.amount)
                .sum();
            (name, total)
        })
        .filter(|&(_, total)| total > 0.0)
        .collect()
}

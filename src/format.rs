//! Text formatting shared by the terminal views.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use unicode_segmentation::UnicodeSegmentation;

/// Format `number` as dollars with thousands separators and exactly two
/// decimal places, e.g. "$1,234.50" or "-$3.00".
///
/// Amounts are only rounded here, never during aggregation.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let number = (number * 100.0).round() / 100.0;

    let formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    };

    pad_cents(formatted_string)
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3" and
/// "12.00" as "12", so the cents are padded back to two digits.
fn pad_cents(formatted_string: String) -> String {
    match formatted_string.split_once('.') {
        Some((whole, cents)) if cents.len() >= 2 => format!("{whole}.{}", &cents[..2]),
        Some((whole, cents)) => format!("{whole}.{cents:0<2}"),
        None => format!("{formatted_string}.00"),
    }
}

/// "1 expense", "2 expenses".
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Fit `label` into exactly `width` columns, truncating with "..." when it
/// has more graphemes than fit and padding with spaces otherwise.
pub fn fit_label(label: &str, width: usize) -> String {
    let length = label.graphemes(true).count();

    if length <= width {
        return format!("{label}{}", " ".repeat(width - length));
    }

    if width <= 3 {
        return label.graphemes(true).take(width).collect();
    }

    let truncated: String = label.graphemes(true).take(width - 3).collect();
    truncated + "..."
}

/// The first ten characters of an API timestamp, i.e. the date.
pub fn date_part(timestamp: &str) -> &str {
    match timestamp.char_indices().nth(10) {
        Some((end, _)) => &timestamp[..end],
        None => timestamp,
    }
}

/// Wrap `text` in a 24-bit ANSI foreground color given as `#rgb` or `#rrggbb`.
///
/// Returns `text` unchanged if `hex_color` cannot be parsed.
pub fn paint(text: &str, hex_color: &str) -> String {
    match parse_hex_color(hex_color) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        None => text.to_owned(),
    }
}

fn parse_hex_color(hex_color: &str) -> Option<(u8, u8, u8)> {
    let hex = hex_color.strip_prefix('#')?;

    if !hex.is_ascii() {
        return None;
    }

    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();

    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

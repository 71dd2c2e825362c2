//! Number formatting and axis label layout

use serde::{Deserialize, Serialize};

/// Round to `dp` decimal places (half away from zero)
pub fn round_to(x: f64, dp: usize) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (x * factor).round() / factor
}

/// Whether `x` survives rounding to `dp` places
fn holds_at(x: f64, dp: usize) -> bool {
    (round_to(x, dp) - x).abs() <= 1e-9 * x.abs().max(1.0)
}

/// Format with exactly `dp` decimal places, never printing "-0"
pub fn format_number(x: f64, dp: usize) -> String {
    let rounded = round_to(x, dp);
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.*}", dp, rounded)
}

/// Format a count with thousands separators
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fewest decimal places keeping every distinct value distinct when shown
///
/// Non-finite values are ignored. Fewer than two distinct values need no
/// places at all. Returns `max_dp` if even that many places collapse two
/// values.
pub fn best_decimal_places(values: &[f64], max_dp: usize) -> usize {
    let mut distinct: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    if distinct.len() < 2 {
        return 0;
    }
    (0..=max_dp)
        .find(|&dp| {
            let shown: Vec<String> = distinct.iter().map(|&v| format_number(v, dp)).collect();
            shown.windows(2).all(|pair| pair[0] != pair[1])
        })
        .unwrap_or(max_dp)
}

/// Decimal places for histogram bin labels
///
/// Grows until both the start and the width survive rounding, capped at
/// `max_dp`.
pub fn histogram_decimal_places(start: f64, width: f64, max_dp: usize) -> usize {
    (0..=max_dp)
        .find(|&dp| holds_at(start, dp) && holds_at(width, dp))
        .unwrap_or(max_dp)
}

/// An axis label broken into lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelLines {
    pub lines: Vec<String>,
    /// Width the label occupies when rendered
    pub width: usize,
}

impl LabelLines {
    pub fn n_lines(&self) -> usize {
        self.lines.len()
    }
}

/// Word-wrap a label at `max_width` characters
///
/// A single word longer than `max_width` keeps its own line. Multi-line
/// labels are centred in `max_width`, so that is their width; a rotated
/// label cannot break and is as wide as all its lines joined.
pub fn split_label_lines(text: &str, max_width: usize, rotate: bool) -> LabelLines {
    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        current.push(word);
        if current.len() > 1 && current.join(" ").chars().count() > max_width {
            current.pop();
            lines.push(current.join(" "));
            current = vec![word];
        }
    }
    lines.push(current.join(" "));

    let width = if lines.len() == 1 {
        lines[0].chars().count()
    } else if rotate {
        lines.iter().map(|l| l.chars().count() + 1).sum::<usize>() - 1
    } else {
        max_width
    };
    LabelLines { lines, width }
}

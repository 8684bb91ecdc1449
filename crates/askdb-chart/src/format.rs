//! Number and label formatting shared by chart adaptation and rendering.
//!
//! All rounding here is half away from zero, matching how the numbers were
//! rounded in the service's reference front-end. The standard formatter's
//! half-to-even rounding would turn 2500 into "2K" instead of "3K".

/// Fixed series palette, cycled by position.
pub const PALETTE: [&str; 8] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884D8", "#82CA9D", "#FFC658", "#FF7C7C",
];

/// Color for the series at `index`, wrapping around the palette.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Formats with exactly one decimal place, rounding half away from zero.
pub fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

/// Abbreviates a y-axis tick: millions to one decimal with `M`, thousands
/// to a whole number with `K`, anything else verbatim.
pub fn abbreviate_tick(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{}M", one_decimal(value / 1_000_000.0))
    } else if value >= 1_000.0 {
        format!("{}K", (value / 1_000.0).round())
    } else {
        value.to_string()
    }
}

/// Full tooltip rendering of a number with thousands separators.
pub fn group_thousands(value: f64) -> String {
    let raw = value.to_string();
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Renders a `0..=1` fraction as a one-decimal percentage.
pub fn percent_label(fraction: f64) -> String {
    format!("{}%", one_decimal(fraction * 100.0))
}

/// Truncates timestamp-like labels to their date part. A label counts as
/// timestamp-like when it contains `T`, `Z`, or `+`; everything else passes
/// through untouched.
pub fn truncate_date_label(label: &str) -> String {
    if !(label.contains('T') || label.contains('Z') || label.contains('+')) {
        return label.to_string();
    }
    let date = label.split('T').next().unwrap_or(label);
    let date = date.split('Z').next().unwrap_or(date);
    let date = date.split('+').next().unwrap_or(date);
    date.to_string()
}

// =============================================================================
// Tests
// =============================================================================

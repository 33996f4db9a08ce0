/// Width of the separator rules printed between report sections.
pub const RULE_WIDTH: usize = 100;

/// A horizontal rule of `fill` characters, [`RULE_WIDTH`] wide.
pub fn rule(fill: char) -> String {
    std::iter::repeat(fill).take(RULE_WIDTH).collect()
}

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let factor = 10_f64.powi(decimals as i32);
    let rounded = (value.abs() * factor).round() / factor;

    let grouped = group_thousands(&(rounded.trunc() as u64).to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        // "0.50" -> ".50"
        let frac_str = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Render a number of seconds as days, hours, minutes and seconds.
///
/// The input is rounded to whole seconds before it is split, so a fraction
/// that rounds up carries into the larger units (`59.6` is one minute).
/// Only non-zero units are emitted, largest first, each in plural form;
/// seconds are always emitted when nothing else is.
///
/// Returns `None` for negative or non-finite input.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_duration;
///
/// assert_eq!(format_duration(0.0).as_deref(), Some("0 seconds"));
/// assert_eq!(format_duration(90.0).as_deref(), Some("1 minutes 30 seconds"));
/// assert_eq!(
///     format_duration(90061.0).as_deref(),
///     Some("1 days 1 hours 1 minutes 1 seconds")
/// );
/// assert_eq!(format_duration(f64::NAN), None);
/// ```
pub fn format_duration(total_seconds: f64) -> Option<String> {
    if !total_seconds.is_finite() || total_seconds < 0.0 {
        return None;
    }
    let total = total_seconds.round() as u64;
    let days = total / 86_400;
    let hours = total % 86_400 / 3_600;
    let minutes = total % 3_600 / 60;
    let seconds = total % 60;

    let mut parts: Vec<String> = Vec::with_capacity(4);
    for (amount, unit) in [(days, "days"), (hours, "hours"), (minutes, "minutes")] {
        if amount > 0 {
            parts.push(format!("{} {}", amount, unit));
        }
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{} seconds", seconds));
    }

    Some(parts.join(" "))
}

/// Upper-case the first letter of every whitespace-separated word and
/// lower-case the rest.
///
/// ```
/// use bikeshare_core::formatting::title_case;
///
/// assert_eq!(title_case("march"), "March");
/// assert_eq!(title_case("new YORK city"), "New York City");
/// ```
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = s.len() % 3;
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

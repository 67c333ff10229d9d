//! Human-readable byte sizes

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count using binary units, e.g. `1536 -> "1.5 KB"`.
///
/// The value is divided while it is strictly greater than 1024, so exactly
/// 1024 bytes stays `"1024 B"`. Trailing zero decimals are dropped.
pub fn format_bytes(bytes: u64, precision: usize) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value > 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_decimals(format!("{:.*}", precision, value)), UNITS[unit])
}

/// Same as [`format_bytes`] but keeps the sign of memory deltas.
pub fn format_signed_bytes(bytes: i64, precision: usize) -> String {
    let formatted = format_bytes(bytes.unsigned_abs(), precision);
    if bytes < 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

fn trim_decimals(rendered: String) -> String {
    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}

const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];
// Anything from here on prints as 1024.0 at one decimal.
const NEXT_UNIT_AT: f64 = 1023.95;

/// Renders a byte count with binary multiples, e.g. `1536` as `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= NEXT_UNIT_AT && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

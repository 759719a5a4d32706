// src/core/duration.rs

const MICROS_PER_SEC: u64 = 1_000_000;
const SECS_PER_DAY: u64 = 86_400;

/// Clock-style rendering of a run time given in seconds.
///
/// `125` → `0:02:05`, `125.5` → `0:02:05.500000`, `90061` → `1 day, 1:01:01`.
/// Hours are not padded; sub-second precision is shown only when present.
pub fn format_duration(seconds: f64) -> String {
    let micros = if seconds.is_finite() && seconds > 0.0 {
        (seconds * MICROS_PER_SEC as f64).round() as u64
    } else {
        0
    };

    let whole = micros / MICROS_PER_SEC;
    let frac = micros % MICROS_PER_SEC;

    let days = whole / SECS_PER_DAY;
    let rem = whole % SECS_PER_DAY;
    let (h, m, s) = (rem / 3600, (rem % 3600) / 60, rem % 60);

    let mut out = match days {
        0 => s!(),
        1 => s!("1 day, "),
        d => format!("{d} days, "),
    };
    out.push_str(&format!("{h}:{m:02}:{s:02}"));
    if frac > 0 {
        out.push_str(&format!(".{frac:06}"));
    }
    out
}

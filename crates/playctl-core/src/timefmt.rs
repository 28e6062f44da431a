#![forbid(unsafe_code)]

//! Compact media time formatting for on-screen feedback.

/// Format milliseconds as `M:SS`, or `H:MM:SS` once an hour is reached.
///
/// Negative values get a leading `-`. Sub-second remainders are truncated.
///
/// ```
/// use playctl_core::timefmt::millis_to_string;
///
/// assert_eq!(millis_to_string(75_000), "1:15");
/// assert_eq!(millis_to_string(3_723_000), "1:02:03");
/// assert_eq!(millis_to_string(-5_000), "-0:05");
/// ```
#[must_use]
pub fn millis_to_string(millis: i64) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let total_secs = millis.unsigned_abs() / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    if hours > 0 {
        format!("{sign}{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{sign}{mins}:{secs:02}")
    }
}

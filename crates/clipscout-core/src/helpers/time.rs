// crates/clipscout-core/src/helpers/time.rs
//
// Shared time-formatting utilities for timestamp labels and duration
// readouts. Canonical source — keep presentation layers from growing their
// own diverging copies.

/// Format a timestamp offset as `M:SS` for frame-list labels.
///
/// ```
/// use clipscout_core::helpers::time::format_timestamp;
/// assert_eq!(format_timestamp(0.0),   "0:00");
/// assert_eq!(format_timestamp(4.0),   "0:04");
/// assert_eq!(format_timestamp(61.5),  "1:01");
/// assert_eq!(format_timestamp(754.0), "12:34");
/// ```
pub fn format_timestamp(s: f64) -> String {
    format!("{}:{:02}", s as u64 / 60, s as u64 % 60)
}

/// Render a file's duration for list display: fractional seconds under a
/// minute, `M:SS` under an hour, `H:MM:SS` beyond that.
///
/// ```
/// use clipscout_core::helpers::time::format_duration;
/// assert_eq!(format_duration(7.5),    "7.5s");
/// assert_eq!(format_duration(225.0),  "3:45");
/// assert_eq!(format_duration(5025.0), "1:23:45");
/// ```
pub fn format_duration(secs: f64) -> String {
    let whole = secs as u64;
    let (h, m, s) = (whole / 3600, (whole / 60) % 60, whole % 60);
    match (h, m) {
        (0, 0) => format!("{secs:.1}s"),
        (0, _) => format!("{m}:{s:02}"),
        _ => format!("{h}:{m:02}:{s:02}"),
    }
}

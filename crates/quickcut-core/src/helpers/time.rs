// crates/quickcut-core/src/helpers/time.rs
//
// `m:ss` formatting and parsing for the start/end input fields and the
// playback readout. Canonical source — the timeline and the export staging
// both go through these.

/// Format a time in seconds as `m:ss`. NaN and negative values render as
/// `0:00` so a not-yet-loaded media duration never shows garbage.
///
/// ```
/// use quickcut_core::helpers::time::format_time;
/// assert_eq!(format_time(0.0),   "0:00");
/// assert_eq!(format_time(125.7), "2:05");
/// assert_eq!(format_time(-3.0),  "0:00");
/// ```
pub fn format_time(sec: f64) -> String {
    if sec.is_nan() || sec < 0.0 {
        return "0:00".to_string();
    }
    let m = (sec / 60.0).floor() as u64;
    let s = (sec % 60.0).floor() as u64;
    format!("{m}:{s:02}")
}

/// Parse `m:ss` into whole seconds. Returns `None` for anything malformed:
/// wrong field count, non-numeric fields, negative fields, or a seconds
/// field of 60 or more.
///
/// ```
/// use quickcut_core::helpers::time::parse_time;
/// assert_eq!(parse_time("2:05"), Some(125.0));
/// assert_eq!(parse_time("2:75"), None);
/// ```
pub fn parse_time(s: &str) -> Option<f64> {
    let (m, sec) = s.split_once(':')?;
    if s.matches(':').count() != 1 {
        return None;
    }
    let m: i64 = m.trim().parse().ok()?;
    let sec: i64 = sec.trim().parse().ok()?;
    if m < 0 || sec < 0 || sec >= 60 {
        return None;
    }
    Some((m * 60 + sec) as f64)
}

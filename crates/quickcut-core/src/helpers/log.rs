// crates/quickcut-core/src/helpers/log.rs
//
// Unified diagnostic logging for all quickcut crates.
//
// Recoverable conditions (degenerate track width, export oddities) are
// appended to a temp file so they're visible regardless of how the host
// application was launched.
//
// File: <temp>/quickcut.log — append-only, created on first write.
//
// Usage:
//   use quickcut_core::quickcut_log;
//   quickcut_log!("[geometry] degenerate track width {w}, using 1");

use std::io::Write;

/// Write `msg` to the QuickCut log file in the OS temp directory.
/// Never panics — failures are silently ignored (we're already in a
/// fallback path).
pub fn qlog(msg: &str) {
    if let Ok(mut f) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::env::temp_dir().join("quickcut.log"))
    {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(f, "[{ts}] {msg}");
    }
}

/// Convenience macro — formats like `eprintln!` but routes through `qlog`.
#[macro_export]
macro_rules! quickcut_log {
    ($($arg:tt)*) => {
        $crate::helpers::log::qlog(&format!($($arg)*))
    };
}

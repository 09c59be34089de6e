//! Small pure helper functions used by the player.
//! - no state mutation

/// Format a position for transport labels.
/// Ex: 75.4 -> '1:15', 3675.0 -> '1:01:15'
pub fn format_timestamp(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Clamp a position into the playable range.
/// - negative or NaN -> 0
/// - past the end -> duration (when known)
pub(crate) fn clamp_position(secs: f64, duration_secs: Option<f64>) -> f64 {
    let mut t = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    if let Some(d) = duration_secs {
        t = t.min(d);
    }
    t
}

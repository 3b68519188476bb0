/// Formats a playback position as `m:ss` for the control bar.
/// Unknown or negative times render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}

/// Formats the duration badge shown on a poster, e.g. `4m 5s`.
pub fn format_duration_badge(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return None;
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    Some(format!("{}m {}s", minutes, secs))
}

/// Fill level of the progress bar in percent.
pub fn progress_percentage(current_time: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(d) if d > 0.0 && d.is_finite() => (current_time / d * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}

//! Human-readable durations

/// Format seconds as `H:MM:SS`, or `M:SS` when under an hour
///
/// Negative and non-finite input renders as `0:00`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Parse `MM:SS` or `HH:MM:SS` into seconds
///
/// Best effort: any other shape yields 0.
pub fn parse_duration(text: &str) -> u64 {
    let parts: Option<Vec<u64>> = text
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<u64>().ok())
        .collect();

    let total = match parts.as_deref() {
        Some(&[minutes, secs]) => minutes.checked_mul(60).and_then(|m| m.checked_add(secs)),
        Some(&[hours, minutes, secs]) => hours
            .checked_mul(3600)
            .zip(minutes.checked_mul(60))
            .and_then(|(h, m)| h.checked_add(m))
            .and_then(|hm| hm.checked_add(secs)),
        _ => None,
    };
    total.unwrap_or(0)
}

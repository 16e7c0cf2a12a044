//! Human-readable rendering of raw durations and distances.

/// Renders whole seconds as `"2 hours 5 mins"`, `"1 hour"` or `"25 mins"`.
///
/// The minutes clause is omitted when it would read `"0 mins"` next to an
/// hour clause. Sub-minute durations render as `"0 mins"`.
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{} {} min{}",
                hours,
                plural(hours),
                minutes,
                plural(minutes)
            )
        } else {
            format!("{} hour{}", hours, plural(hours))
        }
    } else {
        format!("{} min{}", minutes, plural(minutes))
    }
}

/// Renders meters as `"500 m"` below one kilometer and `"1.5 km"` above.
///
/// Negative or non-finite input clamps to zero.
pub fn format_distance(meters: f64) -> String {
    let meters = if meters.is_finite() && meters > 0.0 {
        meters
    } else {
        0.0
    };

    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round() as i64)
    }
}

fn plural(value: u32) -> &'static str {
    match value {
        1 => "",
        _ => "s",
    }
}

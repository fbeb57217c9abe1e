use chrono::{DateTime, FixedOffset};

/// `MM:SS`, or `H:MM:SS` once an hour or more remains.
pub fn format_time(seconds: i64) -> String {
    if seconds <= 0 {
        return String::from("00:00");
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

pub fn format_duration(seconds: i64) -> String {
    let hours = seconds.max(0) / 3600;
    let minutes = (seconds.max(0) % 3600) / 60;

    if hours > 0 {
        format!("{hours} soat {minutes} daqiqa")
    } else {
        format!("{minutes} daqiqa")
    }
}

/// Groups digits in threes with spaces: `1250000` -> `1 250 000`.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        grouped.push('-');
    }

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    grouped
}

fn local_time(millis: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&offset))
}

pub fn format_clock_time(millis: i64, offset: FixedOffset) -> String {
    local_time(millis, offset)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

pub fn format_date_time(millis: i64, offset: FixedOffset) -> String {
    local_time(millis, offset)
        .map(|dt| dt.format("%d.%m.%Y, %H:%M").to_string())
        .unwrap_or_default()
}

use time::{Duration, OffsetDateTime};

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Human "time ago" for `then` as seen from `now`. Future instants read as
/// "just now".
pub fn relative_time(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed = now - then;
    if elapsed < Duration::minutes(1) {
        return "just now".to_string();
    }
    if elapsed < Duration::hours(1) {
        return plural(elapsed.whole_minutes(), "minute");
    }
    if elapsed < Duration::days(1) {
        return plural(elapsed.whole_hours(), "hour");
    }
    let days = elapsed.whole_days();
    match days {
        d if d < 7 => plural(d, "day"),
        d if d < 30 => plural(d / 7, "week"),
        d if d < 365 => plural(d / 30, "month"),
        d => plural(d / 365, "year"),
    }
}

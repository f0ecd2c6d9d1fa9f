use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
/// `HH:MM:SS.ffffff`
const EXACT_FRACTIONAL: &str = "%H:%M:%S%.f";
/// `HH:MM:SS`
const EXACT_SECONDS: &str = "%H:%M:%S";
/// Layouts tried by the permissive fallback.
const DATETIME_LAYOUTS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S%.f",
];
const TIME_LAYOUTS: [&str; 2] = ["%H:%M", "%H.%M.%S"];
/// Output layout of the cleaned CSV.
pub const CSV_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
/// Date that time-only values are attached to.
pub fn anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default()
}
/// Strict stage: `HH:MM:SS.ffffff` only.
pub fn parse_exact(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if !raw.contains('.') {
        return None;
    }
    NaiveTime::parse_from_str(raw, EXACT_FRACTIONAL)
        .ok()
        .map(|t| anchor_date().and_time(t))
}
/// Staged parse: exact fractional, then whole seconds, then the permissive
/// fallback. `None` marks the value as missing.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    parse_exact(raw)
        .or_else(|| {
            NaiveTime::parse_from_str(raw, EXACT_SECONDS)
                .ok()
                .map(|t| anchor_date().and_time(t))
        })
        .or_else(|| infer(raw))
}
/// Permissive fallback: full date-times, then looser time layouts.
pub fn infer(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .or_else(|| {
            TIME_LAYOUTS
                .iter()
                .find_map(|layout| NaiveTime::parse_from_str(raw, layout).ok())
                .map(|t| anchor_date().and_time(t))
        })
}
/// Seconds elapsed since midnight of `origin`'s day, used as the plot x axis.
pub fn seconds_since_midnight(origin: NaiveDate, t: NaiveDateTime) -> f64 {
    let midnight = origin.and_time(NaiveTime::MIN);
    (t - midnight).num_milliseconds() as f64 / 1000.0
}
/// Inverse of [`seconds_since_midnight`] rendered as `HH:MM:SS`.
pub fn format_axis_time(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as i64;
    let (h, m, s) = ((total / 3600) % 24, (total / 60) % 60, total % 60);
    format!("{h:02}:{m:02}:{s:02}")
}
#[cfg(test)]
mod tests {
    use super::*;
    fn hms(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        anchor_date().and_time(NaiveTime::from_hms_micro_opt(h, m, s, micro).unwrap())
    }
    #[test]
    fn fractional_seconds_parse_first() {
        assert_eq!(parse_timestamp("12:30:01.250000"), Some(hms(12, 30, 1, 250_000)));
        assert_eq!(parse_exact("12:30:01.5"), Some(hms(12, 30, 1, 500_000)));
    }
    #[test]
    fn whole_seconds_fall_through_exact_stage() {
        assert_eq!(parse_exact("08:00:09"), None);
        assert_eq!(parse_timestamp("08:00:09"), Some(hms(8, 0, 9, 0)));
    }
    #[test]
    fn fallback_accepts_full_datetimes() {
        assert_eq!(
            parse_timestamp("1900-01-01 12:30:01.250000"),
            Some(hms(12, 30, 1, 250_000))
        );
        assert_eq!(parse_timestamp("23:59"), Some(hms(23, 59, 0, 0)));
    }
    #[test]
    fn garbage_is_missing() {
        assert_eq!(parse_timestamp("收←◆"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("25:61:00"), None);
    }
    #[test]
    fn csv_format_round_trips_through_fallback() {
        let t = hms(9, 5, 7, 123_456);
        let written = t.format(CSV_TIME_FORMAT).to_string();
        assert_eq!(written, "1900-01-01 09:05:07.123456");
        assert_eq!(parse_timestamp(&written), Some(t));
    }
    #[test]
    fn axis_labels_are_wall_clock() {
        let t = hms(1, 2, 3, 0);
        let secs = seconds_since_midnight(anchor_date(), t);
        assert_eq!(secs, 3723.0);
        assert_eq!(format_axis_time(secs), "01:02:03");
    }
}

//! Due date construction and formatting.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Combine date-picker and time-picker output into an instant.
///
/// Returns `None` for an out-of-range time or a local time that does not
/// exist in `tz`. Ambiguous local times resolve to the earlier instant.
pub fn due_date_from_parts<Tz: TimeZone>(
    date: NaiveDate,
    hour: u32,
    minute: u32,
    tz: &Tz,
) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `MM/dd HH:mm`, as shown on list rows.
pub fn format_due_short<Tz: TimeZone>(due: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    due.with_timezone(tz).format("%m/%d %H:%M").to_string()
}

/// `yyyy/MM/dd HH:mm`, as shown in the add and edit dialogs.
pub fn format_due_long<Tz: TimeZone>(due: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    due.with_timezone(tz).format("%Y/%m/%d %H:%M").to_string()
}

/// `MM月dd日 HH:mm` header clock.
pub fn format_clock<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.with_timezone(tz).format("%m月%d日 %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::FixedOffset;

    fn china() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_from_parts_in_timezone() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 9).unwrap();
        let due = due_date_from_parts(date, 18, 30, &china()).unwrap();
        assert_eq!(due.to_rfc3339(), "2025-12-09T10:30:00+00:00");
    }

    #[test]
    fn test_from_parts_rejects_bad_time() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 9).unwrap();
        assert!(due_date_from_parts(date, 24, 0, &Utc).is_none());
        assert!(due_date_from_parts(date, 12, 60, &Utc).is_none());
    }

    #[test]
    fn test_formats() {
        let due = Utc.with_ymd_and_hms(2025, 12, 31, 20, 5, 0).unwrap();
        assert_eq!(format_due_short(due, &china()), "01/01 04:05");
        assert_eq!(format_due_long(due, &china()), "2026/01/01 04:05");
        assert_eq!(format_clock(due, &Utc), "12月31日 20:05");
    }
}

//! Default reporting window: the last full calendar week.

use chrono::{DateTime, Datelike, Days, Utc};
use chrono_tz::Tz;

use shiftscope_shared::{ReportWindow, Result};

/// The most recent complete Monday-through-Sunday week before `now`,
/// evaluated in the reference timezone.
///
/// Run on any day of the current week, this yields the previous week; the
/// window never includes today.
pub fn last_full_week(tz: Tz, now: DateTime<Utc>) -> Result<ReportWindow> {
    let today = now.with_timezone(&tz).date_naive();
    let days_from_monday = today.weekday().num_days_from_monday() as u64;
    let this_monday = today - Days::new(days_from_monday);
    let last_monday = this_monday - Days::new(7);
    let last_sunday = this_monday - Days::new(1);
    ReportWindow::from_days(tz, last_monday, last_sunday)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    fn tz() -> Tz {
        "America/New_York".parse().expect("tz")
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn midweek_yields_previous_monday_through_sunday() {
        // Wednesday 2025-03-12 (UTC noon is also Wednesday in New York).
        let window = last_full_week(tz(), at(2025, 3, 12, 12)).expect("window");
        assert_eq!(window.start_day, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(window.end_day, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    }

    #[test]
    fn monday_yields_the_week_just_ended() {
        let window = last_full_week(tz(), at(2025, 3, 10, 12)).expect("window");
        assert_eq!(window.start_day, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(window.end_day, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    }

    #[test]
    fn sunday_still_excludes_the_running_week() {
        // Sunday 2025-03-09: the week is not complete yet.
        let window = last_full_week(tz(), at(2025, 3, 9, 12)).expect("window");
        assert_eq!(window.start_day, NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
        assert_eq!(window.end_day, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn timezone_shifts_the_day_boundary() {
        // 2025-03-10 03:00 UTC is still Sunday 2025-03-09 23:00 in New York.
        let window = last_full_week(tz(), at(2025, 3, 10, 3)).expect("window");
        assert_eq!(window.start_day, NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
        assert_eq!(window.end_day, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }
}

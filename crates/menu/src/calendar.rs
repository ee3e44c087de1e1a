//! Target date resolution for daily and weekly reports.

use time::{Date, Duration, OffsetDateTime, Weekday};
use time_tz::{ToTimezone, timezones};

use crate::{DateWindow, ReportMode, ServingDay};

/// Today's calendar date in the given IANA timezone, UTC when the name is unknown.
pub fn today_in(tz: &str) -> Date {
    date_in(OffsetDateTime::now_utc(), tz)
}

fn date_in(instant: OffsetDateTime, tz: &str) -> Date {
    match timezones::get_by_name(tz) {
        Some(tz) => instant.to_timezone(tz).date(),
        None => {
            tracing::warn!(timezone = tz, "unknown timezone, using UTC");
            instant.to_offset(time::UtcOffset::UTC).date()
        }
    }
}

pub fn resolve(mode: ReportMode, today: Date, test_run: bool) -> DateWindow {
    match mode {
        ReportMode::Daily => daily_window(today, test_run),
        ReportMode::Weekly => weekly_window(today, test_run),
    }
}

/// Today in test mode, tomorrow otherwise. Weekend targets are kept.
pub fn daily_window(today: Date, test_run: bool) -> DateWindow {
    let target = if test_run {
        today
    } else {
        today + Duration::days(1)
    };
    let day = ServingDay::new(target);

    if day.is_weekend() {
        tracing::info!(date = %day, "target date is a weekend, expecting no menu");
    }

    DateWindow::new([day])
}

/// Weekdays of the upcoming school week, or of the rest of the current one in
/// test mode.
///
/// Test mode on Friday or Saturday targets next Monday alone.
pub fn weekly_window(today: Date, test_run: bool) -> DateWindow {
    let days_since_monday = i64::from(today.weekday().number_days_from_monday());

    let (start, end) = match (test_run, today.weekday()) {
        (true, Weekday::Monday | Weekday::Tuesday | Weekday::Wednesday | Weekday::Thursday) => (
            today + Duration::days(1),
            today + Duration::days(4 - days_since_monday),
        ),
        (true, Weekday::Friday | Weekday::Saturday) => {
            let monday = next_monday(today);
            (monday, monday)
        }
        _ => {
            let monday = next_monday(today);
            (monday, monday + Duration::days(4))
        }
    };

    let window = weekdays_between(start, end);

    tracing::info!(
        test_run,
        days = window.len(),
        first = ?window.first().map(ServingDay::serving_date),
        "resolved weekly window"
    );

    window
}

/// The first Monday strictly after `date`.
pub fn next_monday(date: Date) -> Date {
    let days_since_monday = i64::from(date.weekday().number_days_from_monday());
    date + Duration::days(7 - days_since_monday)
}

pub fn is_weekend(date: Date) -> bool {
    ServingDay::new(date).is_weekend()
}

fn weekdays_between(start: Date, end: Date) -> DateWindow {
    let mut days = Vec::new();
    let mut current = start;

    while current <= end {
        if !is_weekend(current) {
            days.push(ServingDay::new(current));
        }
        current += Duration::days(1);
    }

    DateWindow::new(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_date_in_converts_to_timezone() {
        let instant = datetime!(2025-08-19 03:30 UTC);

        assert_eq!(date_in(instant, "America/Chicago"), date!(2025 - 08 - 18));
        assert_eq!(date_in(instant, "Asia/Tokyo"), date!(2025 - 08 - 19));
        assert_eq!(date_in(instant, "UTC"), date!(2025 - 08 - 19));
    }

    #[test]
    fn test_date_in_unknown_timezone_uses_utc() {
        let instant = datetime!(2025-08-18 23:30 -05:00);

        assert_eq!(date_in(instant, "Mars/Olympus_Mons"), date!(2025 - 08 - 19));
    }

    #[test]
    fn test_daily_normal_targets_tomorrow() {
        let window = daily_window(date!(2025 - 08 - 18), false);
        assert_eq!(window.dates(), vec![date!(2025 - 08 - 19)]);
    }

    #[test]
    fn test_daily_test_run_targets_today() {
        let window = daily_window(date!(2025 - 08 - 18), true);
        assert_eq!(window.dates(), vec![date!(2025 - 08 - 18)]);
    }

    #[test]
    fn test_daily_keeps_weekend_target() {
        // Friday run, Saturday target
        let window = daily_window(date!(2025 - 08 - 22), false);

        assert_eq!(window.len(), 1);
        assert!(window.days()[0].is_weekend());
    }

    #[test]
    fn test_next_monday_is_strictly_after() {
        assert_eq!(next_monday(date!(2025 - 08 - 17)), date!(2025 - 08 - 18));
        assert_eq!(next_monday(date!(2025 - 08 - 18)), date!(2025 - 08 - 25));
        assert_eq!(next_monday(date!(2025 - 08 - 22)), date!(2025 - 08 - 25));
        assert_eq!(next_monday(date!(2025 - 08 - 23)), date!(2025 - 08 - 25));
    }

    #[test]
    fn test_weekly_normal_from_midweek_targets_next_week() {
        let window = weekly_window(date!(2025 - 08 - 20), false);
        assert_eq!(
            window.dates(),
            vec![
                date!(2025 - 08 - 25),
                date!(2025 - 08 - 26),
                date!(2025 - 08 - 27),
                date!(2025 - 08 - 28),
                date!(2025 - 08 - 29),
            ]
        );
    }

    #[test]
    fn test_weekly_test_run_on_saturday_targets_next_monday() {
        let window = weekly_window(date!(2025 - 08 - 23), true);
        assert_eq!(window.dates(), vec![date!(2025 - 08 - 25)]);
    }

    #[test]
    fn test_resolve_dispatches_on_mode() {
        let today = date!(2025 - 08 - 17);

        assert_eq!(resolve(ReportMode::Daily, today, false).len(), 1);
        assert_eq!(resolve(ReportMode::Weekly, today, false).len(), 5);
    }
}

//! Domain Services
//!
//! Pure domain logic for check-ins and the rewards storage hands out.

use chrono::{DateTime, TimeZone, Utc};

/// Points storage awards for a daily check-in
pub const CHECKIN_POINTS: i32 = 10;

/// Points storage awards the code owner per completed referral
pub const REFERRAL_POINTS: i32 = 50;

/// Length of a generated referral code
pub const REFERRAL_CODE_LEN: usize = 8;

/// Whether two instants fall on the same calendar date in `tz`.
///
/// Compares year, month and day of the local date, not a 24-hour window:
/// 23:59 and 00:01 the next minute are different days.
pub fn same_calendar_day<Tz: TimeZone>(a: DateTime<Utc>, b: DateTime<Utc>, tz: &Tz) -> bool {
    a.with_timezone(tz).date_naive() == b.with_timezone(tz).date_naive()
}

/// Whether a user whose last check-in was `last_checkin` may check in at `now`
pub fn can_check_in<Tz: TimeZone>(
    last_checkin: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> bool {
    match last_checkin {
        Some(last) => !same_calendar_day(last, now, tz),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(tz: &FixedOffset, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        tz.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_late_then_early_next_day_allowed() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let last = at(&tz, 2024, 3, 10, 23, 59);
        let now = at(&tz, 2024, 3, 11, 0, 1);
        assert!(can_check_in(Some(last), now, &tz));
    }

    #[test]
    fn test_early_then_late_same_day_blocked() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let last = at(&tz, 2024, 3, 10, 0, 1);
        let now = at(&tz, 2024, 3, 10, 23, 58);
        assert!(!can_check_in(Some(last), now, &tz));
    }

    #[test]
    fn test_never_checked_in() {
        let tz = FixedOffset::east_opt(0).unwrap();
        assert!(can_check_in(None, Utc::now(), &tz));
    }

    #[test]
    fn test_day_is_local_not_utc() {
        // 20:00 and 23:00 on the 10th in UTC-05:00 straddle UTC midnight
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let last = at(&tz, 2024, 3, 10, 20, 0);
        let now = at(&tz, 2024, 3, 10, 23, 0);
        assert_ne!(last.date_naive(), now.date_naive());
        assert!(same_calendar_day(last, now, &tz));
        assert!(!can_check_in(Some(last), now, &tz));
    }

    #[test]
    fn test_same_day_different_month_or_year() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let last = at(&tz, 2024, 2, 10, 12, 0);
        let now = at(&tz, 2024, 3, 10, 12, 0);
        assert!(can_check_in(Some(last), now, &tz));

        let last = at(&tz, 2023, 3, 10, 12, 0);
        let now = at(&tz, 2024, 3, 10, 12, 0);
        assert!(can_check_in(Some(last), now, &tz));
    }
}

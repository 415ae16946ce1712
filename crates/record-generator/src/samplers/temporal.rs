//! Date and time samplers.
//!
//! The calendar is deliberately simplified: February has 29 days in every
//! year divisible by 4, with no century exception. In years such as 1900
//! that can produce 29 February, which does not exist; the sampler reports
//! it through [`DateParts`] instead of inventing a different day.

use crate::rng::RandomSource;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const MIN_YEAR: i64 = 1000;
pub const MAX_YEAR: i64 = 2100;

/// The raw year/month/day triple a date draw produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if year % 4 == 0 => 29,
        2 => 28,
        _ => 31,
    }
}

/// Draw a calendar date: year in `[1000, 2100]`, month in `[1, 12]`, day
/// bounded by the month's length.
pub fn sample_date(rng: &mut RandomSource) -> Result<NaiveDate, DateParts> {
    let year = rng.int_inclusive(MIN_YEAR, MAX_YEAR) as i32;
    let month = rng.int_inclusive(1, 12) as u32;
    let day = rng.int_inclusive(1, days_in_month(year, month) as i64) as u32;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateParts { year, month, day })
}

/// Draw a whole-second time of day.
pub fn sample_time(rng: &mut RandomSource) -> NaiveTime {
    let hour = rng.int_inclusive(0, 23) as u32;
    let minute = rng.int_inclusive(0, 59) as u32;
    let second = rng.int_inclusive(0, 59) as u32;
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or_default()
}

/// One date draw followed by one time draw.
pub fn sample_datetime(rng: &mut RandomSource) -> Result<NaiveDateTime, DateParts> {
    let date = sample_date(rng)?;
    let time = sample_time(rng);
    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 1), 31);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        // Simplified leap rule: no century exception.
        assert_eq!(days_in_month(1900, 2), 29);
    }

    #[test]
    fn test_date_in_range() {
        let mut rng = RandomSource::seeded(42);
        for _ in 0..500 {
            match sample_date(&mut rng) {
                Ok(date) => {
                    assert!((1000..=2100).contains(&date.year()));
                    assert!(date.day() <= days_in_month(date.year(), date.month()));
                }
                Err(parts) => {
                    assert_eq!((parts.month, parts.day), (2, 29));
                    assert_eq!(parts.year % 100, 0);
                }
            }
        }
    }

    #[test]
    fn test_time_in_range() {
        let mut rng = RandomSource::seeded(42);
        for _ in 0..200 {
            let time = sample_time(&mut rng);
            assert!(time.hour() <= 23);
            assert!(time.minute() <= 59);
            assert!(time.second() <= 59);
            assert_eq!(time.nanosecond(), 0);
        }
    }

    #[test]
    fn test_datetime_is_date_then_time() {
        let mut a = RandomSource::seeded(3);
        let mut b = RandomSource::seeded(3);

        if let Ok(datetime) = sample_datetime(&mut a) {
            let date = sample_date(&mut b).unwrap();
            let time = sample_time(&mut b);
            assert_eq!(datetime, date.and_time(time));
        }
    }
}

//! Uniform timestamp sampling within a calendar month.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;

use crate::error::GenError;

/// First and last second of `month` in `year`, both inclusive.
///
/// # Errors
/// Errors when `month` is outside 1-12 or `year` is out of chrono's range
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime), GenError> {
    if !(1..=12).contains(&month) {
        return Err(GenError::InvalidMonth(month));
    }
    let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or(GenError::InvalidYear(year))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last_day = next_month
        .and_then(|d| d.pred_opt())
        .ok_or(GenError::InvalidYear(year))?;

    let start = first_day
        .and_hms_opt(0, 0, 0)
        .ok_or(GenError::InvalidYear(year))?;
    let end = last_day
        .and_hms_opt(23, 59, 59)
        .ok_or(GenError::InvalidYear(year))?;
    Ok((start, end))
}

/// Number of days in the month, leap years included.
///
/// # Errors
/// Same as [`month_bounds`]
pub fn days_in_month(year: i32, month: u32) -> Result<u32, GenError> {
    let (start, end) = month_bounds(year, month)?;
    Ok(u32::try_from((end.date() - start.date()).num_days() + 1).unwrap_or(0))
}

/// Draws `n` timestamps, with replacement, uniformly from every second of the month.
/// The result is unordered.
///
/// # Errors
/// Same as [`month_bounds`]
pub fn sample_month<R: Rng + ?Sized>(
    rng: &mut R,
    year: i32,
    month: u32,
    n: usize,
) -> Result<Vec<NaiveDateTime>, GenError> {
    let (start, end) = month_bounds(year, month)?;
    let span = (end - start).num_seconds();
    Ok((0..n)
        .map(|_| start + Duration::seconds(rng.gen_range(0..=span)))
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(2025, 1).unwrap();
        assert_eq!(start, at(2025, 1, 1, 0, 0, 0));
        assert_eq!(end, at(2025, 1, 31, 23, 59, 59));

        let (_, end) = month_bounds(2025, 4).unwrap();
        assert_eq!(end, at(2025, 4, 30, 23, 59, 59));

        let (_, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(end, at(2025, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_february_leap_years() {
        assert_eq!(days_in_month(2025, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        let (_, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(end, at(2024, 2, 29, 23, 59, 59));
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(month_bounds(2025, 0), Err(GenError::InvalidMonth(0))));
        assert!(matches!(month_bounds(2025, 13), Err(GenError::InvalidMonth(13))));
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        assert!(sample_month(&mut rng, 2025, 13, 5).is_err());
    }

    #[test]
    fn test_samples_stay_in_month() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        for (year, month) in [(2024, 2), (2025, 2)]
            .into_iter()
            .chain((1..=12).map(|m| (2025, m)))
        {
            let (start, end) = month_bounds(year, month).unwrap();
            let samples = sample_month(&mut rng, year, month, 500).unwrap();
            assert_eq!(samples.len(), 500);
            assert!(samples.iter().all(|ts| *ts >= start && *ts <= end));
        }
    }

    #[test]
    fn test_zero_samples() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        assert!(sample_month(&mut rng, 2025, 6, 0).unwrap().is_empty());
    }
}

//! crates/wander_persona_core/src/biorhythm.rs
//!
//! The biorhythm calculator: four independent sinusoidal channels derived
//! purely from the number of days lived. Pure, deterministic, total — there
//! are no error conditions.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const PHYSICAL_PERIOD: f64 = 23.0;
pub const EMOTIONAL_PERIOD: f64 = 28.0;
pub const INTELLECTUAL_PERIOD: f64 = 33.0;
pub const PERCEPTUAL_PERIOD: f64 = 38.0;

/// The number of days shown by the rolling chart: today ± 14.
pub const CHART_WINDOW_DAYS: i64 = 14;

/// Four oscillating scores, each in [-1, 1]. Recomputed on demand, never
/// stored as the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiorhythmReading {
    pub physical: f64,
    pub emotional: f64,
    pub intellectual: f64,
    pub perceptual: f64,
}

/// The rounded integer-percentage snapshot fed to the daily-condition
/// interpretation call. Only the first three channels participate there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiorhythmPercent {
    pub physical: i32,
    pub emotional: i32,
    pub intellectual: i32,
}

impl BiorhythmReading {
    pub fn percent(&self) -> BiorhythmPercent {
        BiorhythmPercent {
            physical: (self.physical * 100.0).round() as i32,
            emotional: (self.emotional * 100.0).round() as i32,
            intellectual: (self.intellectual * 100.0).round() as i32,
        }
    }
}

/// One dated point of the rolling chart.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub reading: BiorhythmReading,
}

fn cycle(days_since_birth: f64, period: f64) -> f64 {
    ((2.0 * PI * days_since_birth) / period).sin()
}

/// Calculates the biorhythm reading for a birth date at a target date.
///
/// `d` is the signed day difference (target − birth); each channel is
/// `sin(2π·d / period)` with periods 23/28/33/38 days.
pub fn compute(birth_date: NaiveDate, target_date: NaiveDate) -> BiorhythmReading {
    let days_since_birth = (target_date - birth_date).num_days() as f64;

    BiorhythmReading {
        physical: cycle(days_since_birth, PHYSICAL_PERIOD),
        emotional: cycle(days_since_birth, EMOTIONAL_PERIOD),
        intellectual: cycle(days_since_birth, INTELLECTUAL_PERIOD),
        perceptual: cycle(days_since_birth, PERCEPTUAL_PERIOD),
    }
}

/// The 29-day chart window centered on `center`: one reading per day for
/// center − 14 ..= center + 14.
pub fn chart_window(birth_date: NaiveDate, center: NaiveDate) -> Vec<ChartPoint> {
    (-CHART_WINDOW_DAYS..=CHART_WINDOW_DAYS)
        .map(|offset| {
            let date = center + Duration::days(offset);
            ChartPoint {
                date,
                reading: compute(birth_date, date),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn scores_stay_within_unit_range() {
        let birth = date(1990, 3, 14);
        for offset in 0..500 {
            let reading = compute(birth, birth + Duration::days(offset));
            for score in [
                reading.physical,
                reading.emotional,
                reading.intellectual,
                reading.perceptual,
            ] {
                assert!((-1.0..=1.0).contains(&score), "out of range: {score}");
            }
        }
    }

    #[test]
    fn all_channels_are_zero_on_the_birth_date() {
        let birth = date(1985, 11, 2);
        let reading = compute(birth, birth);
        assert_eq!(reading.physical, 0.0);
        assert_eq!(reading.emotional, 0.0);
        assert_eq!(reading.intellectual, 0.0);
        assert_eq!(reading.perceptual, 0.0);
    }

    #[test]
    fn each_channel_repeats_at_its_own_period() {
        let birth = date(1992, 7, 21);
        let target = date(2026, 8, 6);
        let base = compute(birth, target);

        let physical = compute(birth, target + Duration::days(23));
        let emotional = compute(birth, target + Duration::days(28));
        let intellectual = compute(birth, target + Duration::days(33));
        let perceptual = compute(birth, target + Duration::days(38));

        assert!((base.physical - physical.physical).abs() < 1e-9);
        assert!((base.emotional - emotional.emotional).abs() < 1e-9);
        assert!((base.intellectual - intellectual.intellectual).abs() < 1e-9);
        assert!((base.perceptual - perceptual.perceptual).abs() < 1e-9);
    }

    #[test]
    fn negative_day_differences_are_allowed() {
        // A target before the birth date is legal input; the sine is odd.
        let birth = date(2000, 1, 1);
        let before = compute(birth, date(1999, 12, 20));
        let after = compute(birth, date(2000, 1, 13));
        assert!((before.physical + after.physical).abs() < 1e-9);
    }

    #[test]
    fn chart_window_spans_29_days_around_the_center() {
        let birth = date(1990, 3, 14);
        let center = date(2026, 8, 6);
        let window = chart_window(birth, center);

        assert_eq!(window.len(), 29);
        assert_eq!(window[0].date, center - Duration::days(14));
        assert_eq!(window[14].date, center);
        assert_eq!(window[28].date, center + Duration::days(14));
    }

    #[test]
    fn percent_snapshot_rounds_to_integers() {
        let reading = BiorhythmReading {
            physical: 0.516,
            emotional: -0.244,
            intellectual: 0.995,
            perceptual: 0.0,
        };
        let percent = reading.percent();
        assert_eq!(percent.physical, 52);
        assert_eq!(percent.emotional, -24);
        assert_eq!(percent.intellectual, 100);
    }
}

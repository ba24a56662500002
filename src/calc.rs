//! Time arithmetic and weekly hour totals.
//!
//! Pure functions over time-block records; no store access, no side effects.
//! All hour values are decimal hours rounded to 2 places.

use crate::model::{SubjectType, TimeBlock};
use serde::Serialize;

/// Round to 2 decimal places, applied independently to every published bucket.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Parse "HH:MM" into minutes since midnight.
///
/// Accepts a one- or two-digit hour 0-23 and a two-digit minute 0-59
/// ("8:30" and "08:30" are both valid; "24:00" and "08:5" are not).
pub fn parse_minutes(time: &str) -> Option<u32> {
    let (h, m) = time.split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    if !h.bytes().all(|b| b.is_ascii_digit()) || !m.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

/// Duration between two clock times in decimal hours.
///
/// An end before the start wraps past midnight, so a 23:30-00:15 block is
/// 45 minutes, not negative. None when either time is malformed.
pub fn duration(start_time: &str, end_time: &str) -> Option<f64> {
    let start = parse_minutes(start_time)?;
    let end = parse_minutes(end_time)?;
    let minutes = if end >= start {
        end - start
    } else {
        (24 * 60 - start) + end
    };
    Some(round2(f64::from(minutes) / 60.0))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayTotals {
    pub hebrew: f64,
    pub english: f64,
    #[serde(rename = "break")]
    pub breaks: f64,
    pub other: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBreakdown {
    pub sunday: DayTotals,
    pub weekday: DayTotals,
    pub friday: DayTotals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeeklyTotals {
    pub hebrew: f64,
    pub english: f64,
    #[serde(rename = "break")]
    pub breaks: f64,
    pub other: f64,
    pub total: f64,
    pub breakdown: WeeklyBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub hebrew_diff: f64,
    pub english_diff: f64,
    pub break_diff: f64,
    pub total_diff: f64,
    pub percent_diff: f64,
}

/// Sum one day's blocks into per-subject buckets.
///
/// Only the four core subject tags have named buckets; operational tags
/// (bus-start, class-start, end-day) count toward the day total only.
/// Blocks with malformed times contribute nothing.
pub fn day_totals<'a, I>(blocks: I) -> DayTotals
where
    I: IntoIterator<Item = &'a TimeBlock>,
{
    let mut totals = DayTotals::default();

    for block in blocks {
        let Some(hours) = duration(&block.start_time, &block.end_time) else {
            continue;
        };
        match block.subject_type {
            SubjectType::Hebrew => totals.hebrew += hours,
            SubjectType::English => totals.english += hours,
            SubjectType::Break => totals.breaks += hours,
            SubjectType::Other => totals.other += hours,
            SubjectType::BusStart | SubjectType::ClassStart | SubjectType::EndDay => {}
        }
        totals.total += hours;
    }

    totals.hebrew = round2(totals.hebrew);
    totals.english = round2(totals.english);
    totals.breaks = round2(totals.breaks);
    totals.other = round2(totals.other);
    totals.total = round2(totals.total);
    totals
}

/// Weekly totals: sunday + weekday*4 + friday.
///
/// The weekday schedule is one representative day standing in for
/// Monday through Thursday, hence the multiplier.
pub fn weekly_totals(
    sunday_blocks: &[TimeBlock],
    weekday_blocks: &[TimeBlock],
    friday_blocks: &[TimeBlock],
) -> WeeklyTotals {
    let sunday = day_totals(sunday_blocks);
    let weekday = day_totals(weekday_blocks);
    let friday = day_totals(friday_blocks);

    WeeklyTotals {
        hebrew: round2(sunday.hebrew + weekday.hebrew * 4.0 + friday.hebrew),
        english: round2(sunday.english + weekday.english * 4.0 + friday.english),
        breaks: round2(sunday.breaks + weekday.breaks * 4.0 + friday.breaks),
        other: round2(sunday.other + weekday.other * 4.0 + friday.other),
        total: round2(sunday.total + weekday.total * 4.0 + friday.total),
        breakdown: WeeklyBreakdown {
            sunday,
            weekday,
            friday,
        },
    }
}

/// Diff a class's weekly totals against the baseline school's.
pub fn compare_with_baseline(
    class_weekly: &WeeklyTotals,
    baseline_weekly: &WeeklyTotals,
) -> ComparisonResult {
    let total_diff = class_weekly.total - baseline_weekly.total;
    let percent_diff = if baseline_weekly.total > 0.0 {
        total_diff / baseline_weekly.total * 100.0
    } else {
        0.0
    };

    ComparisonResult {
        hebrew_diff: round2(class_weekly.hebrew - baseline_weekly.hebrew),
        english_diff: round2(class_weekly.english - baseline_weekly.english),
        break_diff: round2(class_weekly.breaks - baseline_weekly.breaks),
        total_diff: round2(total_diff),
        percent_diff: round2(percent_diff),
    }
}

/// Display formatting: "2h 30m" / "2h" when short, "2.50 hours" otherwise.
pub fn format_hours(hours: f64, short: bool) -> String {
    if short {
        let h = hours.floor() as i64;
        let m = ((hours - hours.floor()) * 60.0).round() as i64;
        if m == 0 {
            format!("{}h", h)
        } else {
            format!("{}h {}m", h, m)
        }
    } else {
        format!("{:.2} hours", hours)
    }
}

/// Presentation-side gate for a single block.
///
/// Stricter than `duration` (no midnight wraparound) and narrower than the
/// full tag vocabulary: only the four bucketed subject types pass. The
/// store applies its own gate on create/update; the two are intentionally
/// independent.
pub fn validate_time_block(start_time: &str, end_time: &str, subject_type: SubjectType) -> bool {
    let (Some(start), Some(end)) = (parse_minutes(start_time), parse_minutes(end_time)) else {
        return false;
    };
    if !matches!(
        subject_type,
        SubjectType::Hebrew | SubjectType::English | SubjectType::Break | SubjectType::Other
    ) {
        return false;
    }
    end > start
}

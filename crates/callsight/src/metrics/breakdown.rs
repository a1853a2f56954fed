//! Call-detail-record breakdowns: per-direction metric blocks, daily and
//! hourly distributions, duration buckets, top numbers and caller insights.
//!
//! Every function here is a pure pass over the record slice. Averages and
//! rates are rounded to one decimal. Records without a call time still count
//! toward totals but are left out of the time-keyed distributions.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::summary::{determine_call_direction, CallDirection, Disposition};
use super::{mean, percent, round1};
use crate::record::CallRecord;

pub const TOP_NUMBERS_LIMIT: usize = 10;
pub const TOP_CALLERS_LIMIT: usize = 20;
pub const TIME_OF_DAY_LIMIT: usize = 50;
pub const NO_ANSWER_CALLERS_LIMIT: usize = 20;

/// Callers with fewer calls are left out of the ranked caller lists.
pub const DEFAULT_MIN_CALLS: u64 = 1;

/// A caller is flagged when more than this share of their calls went unanswered.
const NO_ANSWER_THRESHOLD: f64 = 0.5;

fn direction_of(record: &CallRecord) -> CallDirection {
    determine_call_direction(record.src.as_deref(), record.dst.as_deref())
}

fn disposition_of(record: &CallRecord) -> Option<Disposition> {
    record.disposition.as_deref().and_then(Disposition::parse)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionMetrics {
    pub total: u64,
    pub answered: u64,
    pub no_answer: u64,
    pub busy: u64,
    pub failed: u64,
    pub avg_duration: f64,
    pub avg_billsec: f64,
    pub answer_rate: f64,
    pub recording_count: u64,
    pub recording_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsByDirection {
    pub inbound: DirectionMetrics,
    pub outbound: DirectionMetrics,
    pub internal: DirectionMetrics,
}

#[derive(Default)]
struct DirectionTally {
    total: usize,
    answered: usize,
    no_answer: usize,
    busy: usize,
    failed: usize,
    recordings: usize,
    duration: f64,
    billsec: f64,
}

impl DirectionTally {
    fn add(&mut self, record: &CallRecord) {
        self.total += 1;
        match disposition_of(record) {
            Some(Disposition::Answered) => self.answered += 1,
            Some(Disposition::NoAnswer) => self.no_answer += 1,
            Some(Disposition::Busy) => self.busy += 1,
            Some(Disposition::Failed) => self.failed += 1,
            None => {}
        }
        if record.recorded() {
            self.recordings += 1;
        }
        self.duration += record.duration.unwrap_or(0.0);
        self.billsec += record.billsec.unwrap_or(0.0);
    }

    fn finish(&self) -> DirectionMetrics {
        DirectionMetrics {
            total: self.total as u64,
            answered: self.answered as u64,
            no_answer: self.no_answer as u64,
            busy: self.busy as u64,
            failed: self.failed as u64,
            avg_duration: round1(mean(self.duration, self.total)),
            avg_billsec: round1(mean(self.billsec, self.total)),
            answer_rate: round1(percent(self.answered, self.total)),
            recording_count: self.recordings as u64,
            recording_rate: round1(percent(self.recordings, self.total)),
        }
    }
}

/// Disposition, duration and recording metrics for each known direction.
/// Calls of unknown direction are not attributed to any block.
pub fn metrics_by_direction(records: &[CallRecord]) -> MetricsByDirection {
    let mut inbound = DirectionTally::default();
    let mut outbound = DirectionTally::default();
    let mut internal = DirectionTally::default();

    for record in records {
        match direction_of(record) {
            CallDirection::Inbound => inbound.add(record),
            CallDirection::Outbound => outbound.add(record),
            CallDirection::Internal => internal.add(record),
            CallDirection::Unknown => {}
        }
    }

    MetricsByDirection {
        inbound: inbound.finish(),
        outbound: outbound.finish(),
        internal: internal.finish(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionCounts {
    pub inbound: u64,
    pub outbound: u64,
    pub internal: u64,
    pub unknown: u64,
}

impl DirectionCounts {
    fn add(&mut self, direction: CallDirection) {
        match direction {
            CallDirection::Inbound => self.inbound += 1,
            CallDirection::Outbound => self.outbound += 1,
            CallDirection::Internal => self.internal += 1,
            CallDirection::Unknown => self.unknown += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCalls {
    pub date: NaiveDate,
    pub total: u64,
    pub answered: u64,
    #[serde(flatten)]
    pub directions: DirectionCounts,
    pub duration: f64,
    pub billsec: f64,
    pub avg_duration: f64,
    pub avg_billsec: f64,
}

impl DailyCalls {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total: 0,
            answered: 0,
            directions: DirectionCounts::default(),
            duration: 0.0,
            billsec: 0.0,
            avg_duration: 0.0,
            avg_billsec: 0.0,
        }
    }
}

/// One entry per calendar day (UTC) that has calls, in date order.
pub fn daily_distribution(records: &[CallRecord]) -> Vec<DailyCalls> {
    let mut days: BTreeMap<NaiveDate, DailyCalls> = BTreeMap::new();

    for record in records {
        let Some(time) = record.call_time() else {
            continue;
        };
        let date = time.date_naive();
        let day = days.entry(date).or_insert_with(|| DailyCalls::new(date));
        day.total += 1;
        if disposition_of(record) == Some(Disposition::Answered) {
            day.answered += 1;
        }
        day.directions.add(direction_of(record));
        day.duration += record.duration.unwrap_or(0.0);
        day.billsec += record.billsec.unwrap_or(0.0);
    }

    days.into_values()
        .map(|mut day| {
            day.avg_duration = round1(mean(day.duration, day.total as usize));
            day.avg_billsec = round1(mean(day.billsec, day.total as usize));
            day
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyCalls {
    pub hour: u32,
    pub total: u64,
    pub answered: u64,
    #[serde(flatten)]
    pub directions: DirectionCounts,
}

/// One entry per hour of day (UTC, 0-23) that has calls, in hour order.
pub fn hourly_distribution(records: &[CallRecord]) -> Vec<HourlyCalls> {
    let mut hours: BTreeMap<u32, HourlyCalls> = BTreeMap::new();

    for record in records {
        let Some(time) = record.call_time() else {
            continue;
        };
        let hour = time.hour();
        let slot = hours.entry(hour).or_insert_with(|| HourlyCalls {
            hour,
            total: 0,
            answered: 0,
            directions: DirectionCounts::default(),
        });
        slot.total += 1;
        if disposition_of(record) == Some(Disposition::Answered) {
            slot.answered += 1;
        }
        slot.directions.add(direction_of(record));
    }

    hours.into_values().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationRange {
    #[serde(rename = "0-15s")]
    UpTo15s,
    #[serde(rename = "16-30s")]
    UpTo30s,
    #[serde(rename = "31-60s")]
    UpTo1m,
    #[serde(rename = "1-3m")]
    UpTo3m,
    #[serde(rename = "3-5m")]
    UpTo5m,
    #[serde(rename = ">5m")]
    Over5m,
}

impl DurationRange {
    pub const ALL: [DurationRange; 6] = [
        DurationRange::UpTo15s,
        DurationRange::UpTo30s,
        DurationRange::UpTo1m,
        DurationRange::UpTo3m,
        DurationRange::UpTo5m,
        DurationRange::Over5m,
    ];

    /// Upper bounds are inclusive: 15s falls in `0-15s`, 16s in `16-30s`.
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds <= 15.0 {
            DurationRange::UpTo15s
        } else if seconds <= 30.0 {
            DurationRange::UpTo30s
        } else if seconds <= 60.0 {
            DurationRange::UpTo1m
        } else if seconds <= 180.0 {
            DurationRange::UpTo3m
        } else if seconds <= 300.0 {
            DurationRange::UpTo5m
        } else {
            DurationRange::Over5m
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationRange::UpTo15s => "0-15s",
            DurationRange::UpTo30s => "16-30s",
            DurationRange::UpTo1m => "31-60s",
            DurationRange::UpTo3m => "1-3m",
            DurationRange::UpTo5m => "3-5m",
            DurationRange::Over5m => ">5m",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationBucket {
    pub duration_range: DurationRange,
    pub count: u64,
}

fn duration_buckets<'a, I>(records: I) -> Vec<DurationBucket>
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    let mut counts = [0u64; 6];
    for record in records {
        counts[DurationRange::from_seconds(record.duration.unwrap_or(0.0)) as usize] += 1;
    }
    DurationRange::ALL
        .iter()
        .map(|&range| DurationBucket {
            duration_range: range,
            count: counts[range as usize],
        })
        .collect()
}

/// Call counts per duration range; all six ranges are always present.
pub fn duration_distribution(records: &[CallRecord]) -> Vec<DurationBucket> {
    duration_buckets(records)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationByDirection {
    pub inbound: Vec<DurationBucket>,
    pub outbound: Vec<DurationBucket>,
    pub internal: Vec<DurationBucket>,
}

pub fn duration_by_direction(records: &[CallRecord]) -> DurationByDirection {
    let of = |direction: CallDirection| {
        duration_buckets(records.iter().filter(|r| direction_of(r) == direction))
    };
    DurationByDirection {
        inbound: of(CallDirection::Inbound),
        outbound: of(CallDirection::Outbound),
        internal: of(CallDirection::Internal),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStats {
    pub src: String,
    pub calls: u64,
    #[serde(flatten)]
    pub directions: DirectionCounts,
    pub duration: f64,
    pub avg_duration: f64,
}

/// Busiest source numbers, most calls first. Ties keep input order.
pub fn top_sources(records: &[CallRecord], limit: usize) -> Vec<SourceStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut sources: Vec<SourceStats> = Vec::new();

    for record in records {
        let Some(src) = non_empty(&record.src) else {
            continue;
        };
        let slot = *index.entry(src).or_insert_with(|| {
            sources.push(SourceStats {
                src: src.to_string(),
                calls: 0,
                directions: DirectionCounts::default(),
                duration: 0.0,
                avg_duration: 0.0,
            });
            sources.len() - 1
        });
        let stats = &mut sources[slot];
        stats.calls += 1;
        stats.directions.add(direction_of(record));
        stats.duration += record.duration.unwrap_or(0.0);
    }

    for stats in &mut sources {
        stats.avg_duration = round1(mean(stats.duration, stats.calls as usize));
    }
    sources.sort_by(|a, b| b.calls.cmp(&a.calls));
    sources.truncate(limit);
    sources
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberCount {
    pub number: String,
    pub calls: u64,
}

fn rank_numbers<'a, I>(numbers: I, limit: usize) -> Vec<NumberCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<NumberCount> = Vec::new();

    for number in numbers {
        match index.get(number) {
            Some(&slot) => counts[slot].calls += 1,
            None => {
                index.insert(number, counts.len());
                counts.push(NumberCount {
                    number: number.to_string(),
                    calls: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.calls.cmp(&a.calls));
    counts.truncate(limit);
    counts
}

/// External numbers that call in most often.
pub fn top_inbound_sources(records: &[CallRecord], limit: usize) -> Vec<NumberCount> {
    rank_numbers(
        records
            .iter()
            .filter(|r| direction_of(r) == CallDirection::Inbound)
            .filter_map(|r| non_empty(&r.src)),
        limit,
    )
}

/// External numbers dialled most often.
pub fn top_outbound_destinations(records: &[CallRecord], limit: usize) -> Vec<NumberCount> {
    rank_numbers(
        records
            .iter()
            .filter(|r| direction_of(r) == CallDirection::Outbound)
            .filter_map(|r| non_empty(&r.dst)),
        limit,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    /// 05-11 morning, 12-17 afternoon, 18-04 evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayPart::Morning,
            12..=17 => DayPart::Afternoon,
            _ => DayPart::Evening,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerFrequency {
    pub one_time: u64,
    pub two_to_five: u64,
    pub six_to_ten: u64,
    pub more_than_ten: u64,
}

impl CallerFrequency {
    fn add(&mut self, calls: u64) {
        match calls {
            0 => {}
            1 => self.one_time += 1,
            2..=5 => self.two_to_five += 1,
            6..=10 => self.six_to_ten += 1,
            _ => self.more_than_ten += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerStats {
    pub src: String,
    pub call_count: u64,
    pub total_duration: f64,
    pub avg_duration: f64,
    pub answered_calls: u64,
    pub answer_rate: f64,
    pub first_call: Option<DateTime<Utc>>,
    pub last_call: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDayCalls {
    pub src: String,
    pub morning_calls: u64,
    pub afternoon_calls: u64,
    pub evening_calls: u64,
    pub total_calls: u64,
}

impl TimeOfDayCalls {
    /// The part of day holding more than half of the caller's calls, if any.
    pub fn primary(&self) -> Option<DayPart> {
        let half = self.total_calls as f64 / 2.0;
        [
            (DayPart::Morning, self.morning_calls),
            (DayPart::Afternoon, self.afternoon_calls),
            (DayPart::Evening, self.evening_calls),
        ]
        .into_iter()
        .find(|(_, calls)| *calls as f64 > half)
        .map(|(part, _)| part)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerPatterns {
    pub morning_callers: Vec<String>,
    pub afternoon_callers: Vec<String>,
    pub evening_callers: Vec<String>,
    /// Callers whose calls mostly went unanswered, worst first.
    pub no_answer_callers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerInsights {
    pub unique_callers: u64,
    /// Unique callers with more than one call.
    pub repeat_callers: u64,
    pub caller_frequency: CallerFrequency,
    pub top_callers: Vec<CallerStats>,
    pub time_of_day: Vec<TimeOfDayCalls>,
    pub caller_patterns: CallerPatterns,
}

struct CallerTally<'a> {
    src: &'a str,
    calls: u64,
    duration: f64,
    answered: u64,
    no_answer: u64,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
    day_parts: [u64; 3],
}

impl<'a> CallerTally<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            calls: 0,
            duration: 0.0,
            answered: 0,
            no_answer: 0,
            first: None,
            last: None,
            day_parts: [0; 3],
        }
    }

    fn add(&mut self, record: &CallRecord) {
        self.calls += 1;
        self.duration += record.duration.unwrap_or(0.0);
        match disposition_of(record) {
            Some(Disposition::Answered) => self.answered += 1,
            Some(Disposition::NoAnswer) => self.no_answer += 1,
            _ => {}
        }
        if let Some(time) = record.call_time() {
            self.first = Some(self.first.map_or(time, |t| t.min(time)));
            self.last = Some(self.last.map_or(time, |t| t.max(time)));
            self.day_parts[DayPart::from_hour(time.hour()) as usize] += 1;
        }
    }

    fn no_answer_ratio(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        self.no_answer as f64 / self.calls as f64
    }

    fn stats(&self) -> CallerStats {
        CallerStats {
            src: self.src.to_string(),
            call_count: self.calls,
            total_duration: self.duration,
            avg_duration: round1(mean(self.duration, self.calls as usize)),
            answered_calls: self.answered,
            answer_rate: round1(percent(self.answered as usize, self.calls as usize)),
            first_call: self.first,
            last_call: self.last,
        }
    }

    fn time_of_day(&self) -> TimeOfDayCalls {
        TimeOfDayCalls {
            src: self.src.to_string(),
            morning_calls: self.day_parts[DayPart::Morning as usize],
            afternoon_calls: self.day_parts[DayPart::Afternoon as usize],
            evening_calls: self.day_parts[DayPart::Evening as usize],
            total_calls: self.calls,
        }
    }
}

fn tally_callers(records: &[CallRecord]) -> Vec<CallerTally<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut callers: Vec<CallerTally<'_>> = Vec::new();

    for record in records {
        let Some(src) = non_empty(&record.src) else {
            continue;
        };
        let slot = *index.entry(src).or_insert_with(|| {
            callers.push(CallerTally::new(src));
            callers.len() - 1
        });
        callers[slot].add(record);
    }

    callers
}

/// Per-caller frequency, ranking and calling-pattern analysis keyed on the
/// source number. Ranked lists only include callers with at least
/// `min_calls` calls.
pub fn caller_insights(records: &[CallRecord], min_calls: u64) -> CallerInsights {
    let callers = tally_callers(records);

    let mut frequency = CallerFrequency::default();
    for caller in &callers {
        frequency.add(caller.calls);
    }
    let unique_callers = callers.len() as u64;

    let mut frequent: Vec<&CallerTally<'_>> =
        callers.iter().filter(|c| c.calls >= min_calls).collect();
    frequent.sort_by(|a, b| b.calls.cmp(&a.calls));

    let top_callers = frequent
        .iter()
        .take(TOP_CALLERS_LIMIT)
        .map(|c| c.stats())
        .collect();
    let time_of_day: Vec<TimeOfDayCalls> = frequent
        .iter()
        .take(TIME_OF_DAY_LIMIT)
        .map(|c| c.time_of_day())
        .collect();

    let mut patterns = CallerPatterns::default();
    for calls in &time_of_day {
        let bucket = match calls.primary() {
            Some(DayPart::Morning) => &mut patterns.morning_callers,
            Some(DayPart::Afternoon) => &mut patterns.afternoon_callers,
            Some(DayPart::Evening) => &mut patterns.evening_callers,
            None => continue,
        };
        bucket.push(calls.src.clone());
    }

    let mut unanswered: Vec<&CallerTally<'_>> = frequent
        .iter()
        .copied()
        .filter(|c| c.no_answer_ratio() > NO_ANSWER_THRESHOLD)
        .collect();
    unanswered.sort_by(|a, b| b.no_answer_ratio().total_cmp(&a.no_answer_ratio()));
    patterns.no_answer_callers = unanswered
        .iter()
        .take(NO_ANSWER_CALLERS_LIMIT)
        .map(|c| c.src.to_string())
        .collect();

    CallerInsights {
        unique_callers,
        repeat_callers: unique_callers - frequency.one_time,
        caller_frequency: frequency,
        top_callers,
        time_of_day,
        caller_patterns: patterns,
    }
}

/// Every breakdown in one block, as the dashboard renders it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallBreakdown {
    pub by_direction: MetricsByDirection,
    pub daily: Vec<DailyCalls>,
    pub hourly: Vec<HourlyCalls>,
    pub duration_distribution: Vec<DurationBucket>,
    pub duration_by_direction: DurationByDirection,
    pub top_sources: Vec<SourceStats>,
    pub top_inbound_sources: Vec<NumberCount>,
    pub top_outbound_destinations: Vec<NumberCount>,
    pub caller_insights: CallerInsights,
}

pub fn breakdown(records: &[CallRecord]) -> CallBreakdown {
    CallBreakdown {
        by_direction: metrics_by_direction(records),
        daily: daily_distribution(records),
        hourly: hourly_distribution(records),
        duration_distribution: duration_distribution(records),
        duration_by_direction: duration_by_direction(records),
        top_sources: top_sources(records, TOP_NUMBERS_LIMIT),
        top_inbound_sources: top_inbound_sources(records, TOP_NUMBERS_LIMIT),
        top_outbound_destinations: top_outbound_destinations(records, TOP_NUMBERS_LIMIT),
        caller_insights: caller_insights(records, DEFAULT_MIN_CALLS),
    }
}

//! Album classification
//!
//! Turns a set of enriched photos into the three words that make up an album
//! title: the dominant weather mood, the time span the photos cover and the
//! place most of them were taken in.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::EnrichedRecord;

/// Weather-derived mood of an album
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Rain, drizzle or showers
    Rainy,
    Snowy,
    /// Storms, thunder or tornadoes
    Stormy,
    /// Ice
    Chilly,
    /// Mist, fog or overcast skies
    Foggy,
    /// Anything else
    Sunny,
}

/// Keyword sets checked top-down; the first bucket with a match wins.
const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (Mood::Rainy, &["rain", "drizzle", "shower"]),
    (Mood::Snowy, &["snow"]),
    (Mood::Stormy, &["storm", "thunder", "tornado"]),
    (Mood::Chilly, &["ice", "icy"]),
    (Mood::Foggy, &["mist", "overcast", "fog"]),
];

impl Mood {
    /// Bucket a provider condition text, e.g. `"Rain, Overcast"` is rainy
    #[must_use]
    pub fn from_conditions(condition_text: &str) -> Self {
        let conditions = condition_text.to_lowercase();
        MOOD_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| conditions.contains(k)))
            .map_or(Mood::Sunny, |(mood, _)| *mood)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Rainy => "rainy",
            Mood::Snowy => "snowy",
            Mood::Stormy => "stormy",
            Mood::Chilly => "chilly",
            Mood::Foggy => "foggy",
            Mood::Sunny => "sunny",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long an album lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    /// At most one day
    Day,
    /// Between one and three days, none of them touching a weekend
    FewDays,
    /// Between one and three days starting or ending on Friday to Sunday
    Weekend,
    /// More than three days
    Week,
}

impl Span {
    /// Bucket the time between the earliest and latest photo
    #[must_use]
    pub fn between(first: DateTime<Utc>, last: DateTime<Utc>) -> Self {
        let days = (last - first).num_seconds() as f64 / 3600.0 / 24.0;

        if days > 3.0 {
            Span::Week
        } else if days > 1.0 {
            if is_weekend(first.weekday()) || is_weekend(last.weekday()) {
                Span::Weekend
            } else {
                Span::FewDays
            }
        } else {
            Span::Day
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Span::Day => "day",
            Span::FewDays => "few days",
            Span::Weekend => "weekend",
            Span::Week => "week",
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Fri | Weekday::Sat | Weekday::Sun)
}

/// Most frequent item, scanning in order.
///
/// The leader only changes when another item's running count strictly
/// exceeds the leader's, so ties go to the item that reached the count first.
fn majority<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut leader: Option<(T, usize)> = None;

    for item in items {
        let count = counts.entry(item.clone()).or_insert(0);
        *count += 1;
        let count = *count;

        if leader.as_ref().is_none_or(|(_, best)| count > *best) {
            leader = Some((item, count));
        }
    }

    leader.map(|(item, _)| item)
}

/// Dominant weather mood, `None` for an empty album
#[must_use]
pub fn classify_mood(records: &[EnrichedRecord]) -> Option<Mood> {
    majority(
        records
            .iter()
            .map(|record| Mood::from_conditions(&record.weather.condition_text)),
    )
}

/// Time span between the earliest and latest photo, `None` for an empty album
#[must_use]
pub fn classify_span(records: &[EnrichedRecord]) -> Option<Span> {
    let mut timestamps = records.iter().map(|record| record.timestamp);
    let first = timestamps.next()?;

    let (min, max) = timestamps.fold((first, first), |(min, max), timestamp| {
        (min.min(timestamp), max.max(timestamp))
    });

    Some(Span::between(min, max))
}

/// Most common place name, `None` for an empty album
#[must_use]
pub fn classify_place(records: &[EnrichedRecord]) -> Option<String> {
    majority(
        records
            .iter()
            .map(|record| record.place.primary_name.as_str()),
    )
    .map(str::to_string)
}

/// Build the album title, e.g. `"A foggy weekend in New York"`
#[must_use]
pub fn compose_title(mood: impl fmt::Display, span: impl fmt::Display, place: &str) -> String {
    format!("A {mood} {span} in {place}")
}

/// Classify an album and compose its title, `None` for an empty album
#[must_use]
pub fn album_title(records: &[EnrichedRecord]) -> Option<String> {
    let mood = classify_mood(records)?;
    let span = classify_span(records)?;
    let place = classify_place(records)?;
    Some(compose_title(mood, span, &place))
}

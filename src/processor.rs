//! Album processing
//!
//! Enriches every photo row with its place and weather, then classifies the
//! successful ones into a title. A failing row never stops the batch: its
//! error is recorded with the row position and processing moves on.

use tracing::{debug, info, instrument, warn};

use crate::classifier::album_title;
use crate::error::{ResolverKind, RowError};
use crate::models::{EnrichedRecord, ParsedRecord, ProcessingOutcome, RawRecord};
use crate::resolver::{PlaceResolver, WeatherResolver};
use crate::NomenclatorError;

/// Runs the enrichment pipeline with the given lookup services
pub struct Processor<L, W> {
    locator: L,
    weatherman: W,
}

impl<L, W> Processor<L, W>
where
    L: PlaceResolver,
    W: WeatherResolver,
{
    #[must_use]
    pub fn new(locator: L, weatherman: W) -> Self {
        Self {
            locator,
            weatherman,
        }
    }

    /// Process all rows in order and build the album title.
    ///
    /// The title is empty when no row could be enriched; errors are returned
    /// alongside a non-empty title too.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub async fn process(&self, rows: &[RawRecord]) -> ProcessingOutcome {
        let mut errors = Vec::new();
        let mut album = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let position = index + 1;
            match self.enrich(row).await {
                Ok(record) => {
                    debug!(
                        row = position,
                        place = %record.place.primary_name,
                        weather = %record.weather.condition_text,
                        "Photo enriched"
                    );
                    album.push(record);
                }
                Err(e) => {
                    warn!(row = position, "Skipping photo: {}", e);
                    errors.push(RowError::new(position, e));
                }
            }
        }

        let title = album_title(&album).unwrap_or_default();

        info!(
            enriched = album.len(),
            failed = errors.len(),
            "Album processed"
        );

        ProcessingOutcome { title, errors }
    }

    /// Parse one row and look up its place and weather.
    ///
    /// The weather is not looked up when the place lookup fails.
    pub async fn enrich(&self, raw: &RawRecord) -> Result<EnrichedRecord, NomenclatorError> {
        let parsed = ParsedRecord::parse(raw)?;

        let place = self
            .locator
            .locate(parsed.latitude, parsed.longitude)
            .await
            .map_err(|e| NomenclatorError::resolver(ResolverKind::Place, e))?;

        let weather = self
            .weatherman
            .check_weather(parsed.latitude, parsed.longitude, parsed.timestamp)
            .await
            .map_err(|e| NomenclatorError::resolver(ResolverKind::Weather, e))?;

        Ok(EnrichedRecord::new(place, weather, parsed.timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlaceDescriptor, WeatherSummary};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a fixed table keyed by coordinates, recording every call
    #[derive(Default)]
    struct StubLocator {
        places: HashMap<String, PlaceDescriptor>,
        calls: Mutex<Vec<(f64, f64)>>,
    }

    impl StubLocator {
        fn with(mut self, latitude: f64, longitude: f64, city: &str) -> Self {
            self.places.insert(
                format!("{latitude},{longitude}"),
                PlaceDescriptor::new(city, "USA"),
            );
            self
        }
    }

    #[async_trait]
    impl PlaceResolver for StubLocator {
        async fn locate(&self, latitude: f64, longitude: f64) -> Result<PlaceDescriptor> {
            self.calls.lock().unwrap().push((latitude, longitude));
            self.places
                .get(&format!("{latitude},{longitude}"))
                .cloned()
                .ok_or_else(|| anyhow!("non 2xx response from location API"))
        }
    }

    #[derive(Default)]
    struct StubWeatherman {
        conditions: HashMap<String, String>,
        calls: Mutex<Vec<DateTime<Utc>>>,
    }

    impl StubWeatherman {
        fn with(mut self, latitude: f64, longitude: f64, conditions: &str) -> Self {
            self.conditions
                .insert(format!("{latitude},{longitude}"), conditions.to_string());
            self
        }
    }

    #[async_trait]
    impl WeatherResolver for StubWeatherman {
        async fn check_weather(
            &self,
            latitude: f64,
            longitude: f64,
            date: DateTime<Utc>,
        ) -> Result<WeatherSummary> {
            self.calls.lock().unwrap().push(date);
            self.conditions
                .get(&format!("{latitude},{longitude}"))
                .map(|c| WeatherSummary::new(c.as_str()))
                .ok_or_else(|| anyhow!("request to weather API failed"))
        }
    }

    fn new_york_processor(
        conditions: [&str; 3],
    ) -> Processor<StubLocator, StubWeatherman> {
        let coordinates = [
            (40.728808, -73.996106),
            (40.728656, -73.998790),
            (40.727160, -73.996044),
        ];

        let mut locator = StubLocator::default();
        let mut weatherman = StubWeatherman::default();
        for ((latitude, longitude), condition) in coordinates.into_iter().zip(conditions) {
            locator = locator.with(latitude, longitude, "New York");
            weatherman = weatherman.with(latitude, longitude, condition);
        }
        Processor::new(locator, weatherman)
    }

    fn rows(timestamps: [&str; 3]) -> Vec<RawRecord> {
        let coordinates = [
            ("40.728808", "-73.996106"),
            ("40.728656", "-73.998790"),
            ("40.727160", "-73.996044"),
        ];
        timestamps
            .into_iter()
            .zip(coordinates)
            .map(|(timestamp, (latitude, longitude))| {
                RawRecord::from([timestamp, latitude, longitude])
            })
            .collect()
    }

    #[tokio::test]
    async fn test_foggy_weekend() {
        let processor = new_york_processor(["Rain", "Overcast", "Fog"]);
        let outcome = processor
            .process(&rows([
                "2020-03-30T14:12:19Z",
                "2020-03-29T14:20:10Z",
                "2020-03-28T14:32:02Z",
            ]))
            .await;

        assert_eq!(outcome.title(), "A foggy weekend in New York");
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_snowy_few_days() {
        let processor = new_york_processor(["Snow", "Snow, Overcast", "Clear"]);
        let outcome = processor
            .process(&rows([
                "2020-02-11T14:12:19Z",
                "2020-02-12T14:20:10Z",
                "2020-02-13T14:32:02Z",
            ]))
            .await;

        assert_eq!(outcome.title(), "A snowy few days in New York");
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_rainy_week() {
        let processor = new_york_processor(["Rain", "Drizzle", "Clear"]);
        let outcome = processor
            .process(&rows([
                "2020-02-03T08:00:00Z",
                "2020-02-05T14:20:10Z",
                "2020-02-09T19:32:02Z",
            ]))
            .await;

        assert_eq!(outcome.title(), "A rainy week in New York");
    }

    #[tokio::test]
    async fn test_sunny_day() {
        let processor = new_york_processor(["Clear", "Partially cloudy", "Fog"]);
        let outcome = processor
            .process(&rows([
                "2020-02-03T08:00:00Z",
                "2020-02-03T12:00:00Z",
                "2020-02-03T19:00:00Z",
            ]))
            .await;

        assert_eq!(outcome.title(), "A sunny day in New York");
    }

    #[tokio::test]
    async fn test_malformed_timestamp_is_reported_and_skipped() {
        let processor = new_york_processor(["Rain", "Overcast", "Fog"]);
        let mut input = rows([
            "2020-03-30 14:12:19",
            "2020-03-29T14:20:10Z",
            "2020-03-28T14:32:02Z",
        ]);
        input.truncate(2);

        let outcome = processor.process(&input).await;

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, 1);
        assert!(matches!(
            outcome.errors[0].source,
            NomenclatorError::Parse { .. }
        ));
        assert_eq!(outcome.title(), "A foggy day in New York");
        // invalid rows never reach the resolvers
        assert_eq!(processor.locator.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_place_failure_skips_weather_lookup() {
        let processor = Processor::new(
            StubLocator::default(),
            StubWeatherman::default().with(40.728808, -73.996106, "Rain"),
        );
        let input = vec![RawRecord::from([
            "2020-03-30T14:12:19Z",
            "40.728808",
            "-73.996106",
        ])];

        let outcome = processor.process(&input).await;

        assert_eq!(outcome.title(), "");
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            outcome.errors[0].source,
            NomenclatorError::Resolver {
                resolver: ResolverKind::Place,
                ..
            }
        ));
        assert!(processor.weatherman.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_reach_the_locator() {
        let processor = Processor::new(StubLocator::default(), StubWeatherman::default());
        let input = vec![RawRecord::from(["2020-03-30T14:12:19Z", "91.0", "10.0"])];

        let outcome = processor.process(&input).await;

        assert!(matches!(
            outcome.errors[0].source,
            NomenclatorError::Resolver {
                resolver: ResolverKind::Place,
                ..
            }
        ));
        assert_eq!(*processor.locator.calls.lock().unwrap(), vec![(91.0, 10.0)]);
    }

    #[tokio::test]
    async fn test_weather_failure_is_reported() {
        let processor = Processor::new(
            StubLocator::default().with(40.728808, -73.996106, "New York"),
            StubWeatherman::default(),
        );
        let input = vec![RawRecord::from([
            "2020-03-30T14:12:19Z",
            "40.728808",
            "-73.996106",
        ])];

        let err = processor.enrich(&input[0]).await.unwrap_err();
        assert!(matches!(
            err,
            NomenclatorError::Resolver {
                resolver: ResolverKind::Weather,
                ..
            }
        ));
        assert!(err.to_string().contains("request to weather API failed"));
    }

    #[tokio::test]
    async fn test_enrich_keeps_input_timestamp() {
        let processor = new_york_processor(["Rain, Overcast", "Fog", "Fog"]);
        let raw = RawRecord::from(["2020-03-30T14:12:19Z", "40.728808", "-73.996106"]);

        let record = processor.enrich(&raw).await.unwrap();

        let expected = crate::models::record::parse_timestamp("2020-03-30T14:12:19Z").unwrap();
        assert_eq!(record.timestamp, expected);
        assert_eq!(record.weather.condition_text, "Rain, Overcast");
        assert_eq!(processor.weatherman.calls.lock().unwrap()[0], expected);
    }

    #[tokio::test]
    async fn test_all_rows_failing_gives_empty_title() {
        let processor = new_york_processor(["Rain", "Overcast", "Fog"]);
        let input = vec![
            RawRecord::default(),
            RawRecord::from(["2020-03-30T14:12:19Z", "north", "-73.996106"]),
            RawRecord::from(["2020-03-30T14:12:19Z", "1.0", "1.0"]),
        ];

        let outcome = processor.process(&input).await;

        assert_eq!(outcome.title(), "");
        assert!(matches!(
            outcome.require_title(),
            Err(NomenclatorError::EmptyResult)
        ));
        let rows: Vec<usize> = outcome.errors.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let processor = new_york_processor(["Rain", "Overcast", "Fog"]);
        let outcome = processor.process(&[]).await;
        assert_eq!(outcome.title(), "");
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_process_is_repeatable() {
        let processor = new_york_processor(["Rain", "Overcast", "Fog"]);
        let mut input = rows([
            "2020-03-30T14:12:19Z",
            "2020-03-29T14:20:10Z",
            "2020-03-28T14:32:02Z",
        ]);
        input.push(RawRecord::from(["yesterday", "1", "1"]));

        let first = processor.process(&input).await;
        let second = processor.process(&input).await;

        assert_eq!(first.title(), second.title());
        assert_eq!(first.error_messages(), second.error_messages());
    }
}

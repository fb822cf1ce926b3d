//! Bounded secondary enrichment via the per-game detail endpoint
//!
//! Records that came out of normalization without a home team, away
//! team or start time get one detail lookup each, strictly
//! sequentially and behind a politeness throttle. The ceiling exists
//! because the detail endpoint is slow and rate-limited; most records
//! need no enrichment at all.

use crate::extract::extract_detail_fields;
use rinkside_common::{GameRecord, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of per-game detail payloads. The production implementation
/// goes through Transport and the decoder; tests stub it.
#[allow(async_fn_in_trait)]
pub trait DetailSource {
    async fn detail(&self, game_id: &str) -> Result<Value>;
}

/// Enrich incomplete records in place.
///
/// Candidates are taken in original order and capped at `max_count`.
/// A failed detail fetch degrades that one record, never the run.
pub async fn enrich<S: DetailSource>(
    records: &mut [GameRecord],
    source: &S,
    max_count: usize,
    throttle: Duration,
) {
    let mut selected = 0;
    for record in records.iter_mut() {
        if selected >= max_count {
            break;
        }
        if !record.needs_detail() {
            continue;
        }
        selected += 1;

        let Some(game_id) = record.id.clone() else {
            // Nothing to ask the detail endpoint about.
            continue;
        };

        // One request in flight at a time, throttled, to bound
        // upstream load.
        tokio::time::sleep(throttle).await;

        match source.detail(&game_id).await {
            Ok(payload) => {
                // Detail payloads sometimes arrive wrapped in the same
                // `data` envelope as the list.
                let root = payload
                    .get("data")
                    .filter(|d| d.is_object())
                    .unwrap_or(&payload);
                record.merge_detail(extract_detail_fields(root));
                debug!(game_id = %game_id, "merged detail fields");
            },
            Err(err) => {
                warn!(game_id = %game_id, error = %err, "detail fetch failed, keeping partial record");
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use rinkside_common::IngestError;
    use serde_json::json;
    use std::cell::RefCell;

    /// Scripted detail source recording the ids it was asked for
    struct StubSource {
        responses: Vec<(String, Result<Value>)>,
        asked: RefCell<Vec<String>>,
    }

    impl StubSource {
        fn new(responses: Vec<(String, Result<Value>)>) -> Self {
            Self {
                responses,
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl DetailSource for StubSource {
        async fn detail(&self, game_id: &str) -> Result<Value> {
            self.asked.borrow_mut().push(game_id.to_string());
            for (id, response) in &self.responses {
                if id == game_id {
                    return match response {
                        Ok(v) => Ok(v.clone()),
                        Err(_) => Err(IngestError::Decode("scripted failure".to_string())),
                    };
                }
            }
            Err(IngestError::Decode(format!("unexpected id {}", game_id)))
        }
    }

    fn incomplete(id: &str) -> GameRecord {
        GameRecord {
            id: Some(id.to_string()),
            home_team: Some("A".to_string()),
            ..Default::default()
        }
    }

    fn complete(id: &str) -> GameRecord {
        GameRecord {
            id: Some(id.to_string()),
            home_team: Some("A".to_string()),
            away_team: Some("B".to_string()),
            start_time: Some("2025-10-01T18:00:00Z".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn complete_records_are_skipped() {
        let mut records = vec![complete("1"), complete("2")];
        let source = StubSource::new(vec![]);
        enrich(&mut records, &source, 10, Duration::ZERO).await;
        assert!(source.asked.borrow().is_empty());
    }

    #[tokio::test]
    async fn merges_non_null_detail_fields_only() {
        let mut records = vec![incomplete("5")];
        let source = StubSource::new(vec![(
            "5".to_string(),
            Ok(json!({
                "awayTeam": { "name": "B" },
                "venue": { "name": "X" },
                "homeTeam": null
            })),
        )]);
        enrich(&mut records, &source, 10, Duration::ZERO).await;

        assert_eq!(records[0].home_team.as_deref(), Some("A"));
        assert_eq!(records[0].away_team.as_deref(), Some("B"));
        assert_eq!(records[0].venue.as_deref(), Some("X"));
    }

    #[tokio::test]
    async fn detail_under_data_envelope_is_unwrapped() {
        let mut records = vec![incomplete("7")];
        let source = StubSource::new(vec![(
            "7".to_string(),
            Ok(json!({ "data": { "awayTeam": { "name": "C" } } })),
        )]);
        enrich(&mut records, &source, 10, Duration::ZERO).await;
        assert_eq!(records[0].away_team.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn ceiling_caps_candidates_in_order() {
        let mut records = vec![incomplete("1"), incomplete("2"), incomplete("3")];
        let source = StubSource::new(vec![
            ("1".to_string(), Ok(json!({}))),
            ("2".to_string(), Ok(json!({}))),
        ]);
        enrich(&mut records, &source, 2, Duration::ZERO).await;
        assert_eq!(*source.asked.borrow(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_batch() {
        let mut records = vec![incomplete("1"), incomplete("2")];
        let source = StubSource::new(vec![
            (
                "1".to_string(),
                Err(IngestError::Decode("boom".to_string())),
            ),
            ("2".to_string(), Ok(json!({ "awayTeam": { "name": "B" } }))),
        ]);
        enrich(&mut records, &source, 10, Duration::ZERO).await;

        // Record 1 keeps its original fields, record 2 was still enriched.
        assert!(records[0].away_team.is_none());
        assert_eq!(records[0].home_team.as_deref(), Some("A"));
        assert_eq!(records[1].away_team.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn idless_records_consume_a_slot_but_skip_the_fetch() {
        let mut no_id = incomplete("x");
        no_id.id = None;
        let mut records = vec![no_id, incomplete("2")];
        let source = StubSource::new(vec![("2".to_string(), Ok(json!({})))]);
        enrich(&mut records, &source, 1, Duration::ZERO).await;
        // The id-less candidate used up the only slot.
        assert!(source.asked.borrow().is_empty());
    }
}

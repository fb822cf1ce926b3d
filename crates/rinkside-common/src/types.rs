//! Domain types shared across the pipeline

use serde::{Deserialize, Serialize};

/// Canonical output unit: one game, normalized from whatever shape the
/// upstream API happened to ship.
///
/// `id` is optional while a record moves through the pipeline; the
/// aggregator drops id-less records before anything is emitted, so the
/// persisted list only ever contains records with an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Opaque upstream identifier (numeric upstream ids are coerced to strings)
    pub id: Option<String>,

    /// ISO-8601-like start timestamp, when known
    pub start_time: Option<String>,

    /// Free-text league label
    pub league: Option<String>,

    pub home_team: Option<String>,
    pub away_team: Option<String>,

    /// "H:A" free text, absent for unplayed games
    pub score: Option<String>,

    /// Only present when the detail endpoint supplied it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,

    /// Game-state label, only present in array-shaped upstream payloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Partial record recovered from the per-game detail endpoint.
///
/// Same fields as the object-row extraction plus `venue`. Only
/// non-null values survive the merge.
#[derive(Debug, Clone, Default)]
pub struct DetailFields {
    pub start_time: Option<String>,
    pub league: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub score: Option<String>,
    pub venue: Option<String>,
}

impl GameRecord {
    /// True when the record is a candidate for enrichment
    pub fn needs_detail(&self) -> bool {
        self.home_team.is_none() || self.away_team.is_none() || self.start_time.is_none()
    }

    /// Fill-only merge: a field is overwritten only by a non-null
    /// detail value. Existing data is never erased.
    pub fn merge_detail(&mut self, detail: DetailFields) {
        if detail.start_time.is_some() {
            self.start_time = detail.start_time;
        }
        if detail.league.is_some() {
            self.league = detail.league;
        }
        if detail.home_team.is_some() {
            self.home_team = detail.home_team;
        }
        if detail.away_team.is_some() {
            self.away_team = detail.away_team;
        }
        if detail.score.is_some() {
            self.score = detail.score;
        }
        if detail.venue.is_some() {
            self.venue = detail.venue;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn merge_fills_gaps_without_erasing() {
        let mut record = GameRecord {
            id: Some("42".to_string()),
            home_team: Some("A".to_string()),
            away_team: None,
            ..Default::default()
        };

        record.merge_detail(DetailFields {
            home_team: None,
            away_team: Some("B".to_string()),
            venue: Some("X".to_string()),
            ..Default::default()
        });

        assert_eq!(record.home_team.as_deref(), Some("A"));
        assert_eq!(record.away_team.as_deref(), Some("B"));
        assert_eq!(record.venue.as_deref(), Some("X"));
    }

    #[test]
    fn merge_never_replaces_with_null() {
        let mut record = GameRecord {
            id: Some("1".to_string()),
            home_team: Some("A".to_string()),
            start_time: Some("2025-10-01T18:00:00Z".to_string()),
            ..Default::default()
        };

        record.merge_detail(DetailFields::default());

        assert_eq!(record.home_team.as_deref(), Some("A"));
        assert_eq!(record.start_time.as_deref(), Some("2025-10-01T18:00:00Z"));
    }

    #[test]
    fn needs_detail_on_any_missing_required_field() {
        let complete = GameRecord {
            id: Some("1".to_string()),
            home_team: Some("A".to_string()),
            away_team: Some("B".to_string()),
            start_time: Some("2025-10-01T18:00:00Z".to_string()),
            ..Default::default()
        };
        assert!(!complete.needs_detail());

        let mut missing_away = complete.clone();
        missing_away.away_team = None;
        assert!(missing_away.needs_detail());
    }

    #[test]
    fn optional_fields_are_skipped_when_absent() {
        let record = GameRecord {
            id: Some("9".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("venue"));
        assert!(!json.contains("status"));
        assert!(json.contains("\"id\":\"9\""));
    }
}

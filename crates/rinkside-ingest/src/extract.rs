//! Ordered-candidate-path extraction
//!
//! The core normalization primitive: for each target field there is an
//! ordered list of dotted paths, and the first path whose full
//! traversal reaches a non-null leaf wins. Upstream shape drift is
//! handled by editing these tables, not by touching code.

use rinkside_common::DetailFields;
use serde_json::Value;

// ============================================================================
// Field → candidate path tables
// ============================================================================

pub const ID_PATHS: &[&str] = &["gameId", "id", "game.gameId"];

pub const START_TIME_PATHS: &[&str] = &["startDateTime", "startDate", "dateTime", "start"];

pub const LEAGUE_PATHS: &[&str] = &["league.name", "league", "leagueName"];

pub const HOME_TEAM_PATHS: &[&str] = &[
    "homeTeam.name",
    "homeTeam",
    "home",
    "teamHome.name",
    "teams.home.name",
];

pub const AWAY_TEAM_PATHS: &[&str] = &[
    "awayTeam.name",
    "awayTeam",
    "away",
    "teamAway.name",
    "teams.away.name",
];

pub const SCORE_PATHS: &[&str] = &["score", "result", "totalScore"];

/// Detail responses only; the list endpoint never ships a venue
pub const VENUE_PATHS: &[&str] = &["venue.name", "venue", "arena.name", "location.name"];

/// Walk one dotted path. Absence or an explicit null at any segment
/// disqualifies the candidate.
pub fn value_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// First candidate path with a non-null leaf, in declared order
pub fn first_at_paths<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| value_at_path(value, path))
}

/// Text rendering of a leaf: strings pass through, numbers are
/// formatted (upstream ships ids both ways), everything else is
/// treated as absent.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Ordered-candidate extraction straight to text
pub fn text_at_paths(value: &Value, paths: &[&str]) -> Option<String> {
    first_at_paths(value, paths).and_then(value_to_text)
}

/// Extract the partial record a detail response contributes: the
/// object-row fields plus venue.
pub fn extract_detail_fields(value: &Value) -> DetailFields {
    DetailFields {
        start_time: text_at_paths(value, START_TIME_PATHS),
        league: text_at_paths(value, LEAGUE_PATHS),
        home_team: text_at_paths(value, HOME_TEAM_PATHS),
        away_team: text_at_paths(value, AWAY_TEAM_PATHS),
        score: text_at_paths(value, SCORE_PATHS),
        venue: text_at_paths(value, VENUE_PATHS),
    }
}

//! Schema normalization: heterogeneous upstream rows → GameRecord
//!
//! Upstream has shipped at least two incompatible list shapes:
//! object-keyed rows and positional array rows. The envelope around
//! the row list varies too. Both decisions are made once per payload
//! and dispatched, instead of sprinkling shape checks through the
//! pipeline.

use crate::extract::{
    text_at_paths, value_at_path, value_to_text, AWAY_TEAM_PATHS, HOME_TEAM_PATHS, ID_PATHS,
    LEAGUE_PATHS, SCORE_PATHS, START_TIME_PATHS,
};
use rinkside_common::GameRecord;
use serde_json::Value;
use tracing::{debug, info};

/// Known envelopes around the row list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Envelope {
    /// `{"data": [...]}`
    Data,
    /// `{"rows": [...]}`
    Rows,
    /// The decoded value is the row list itself (only recognized when
    /// its first element is itself an array)
    Bare,
}

/// Positional layout of an array-shaped row. Indexes 0-2 carry
/// weekday/date/time as display text; the machine-readable start
/// timestamp lives in the status descriptor.
const IDX_HOME: usize = 3;
const IDX_AWAY: usize = 4;
const IDX_RESULT: usize = 5;
const IDX_STATUS: usize = 9;
const IDX_ID: usize = 10;

/// Normalize a decoded payload into game records.
///
/// An unrecognized envelope is not an error: off-season responses are
/// legitimately empty, so this yields an empty list and logs it.
pub fn normalize(value: &Value) -> Vec<GameRecord> {
    let Some((envelope, rows)) = detect_envelope(value) else {
        info!("no recognized envelope in upstream payload, treating as empty result set");
        return Vec::new();
    };

    // Row shape is decided once, from the first row.
    let array_rows = rows.first().map_or(false, Value::is_array);
    debug!(?envelope, rows = rows.len(), array_rows, "normalizing rows");

    if array_rows {
        rows.iter()
            .map(|row| row.as_array().map(|cells| from_array_row(cells)).unwrap_or_default())
            .collect()
    } else {
        rows.iter().map(from_object_row).collect()
    }
}

fn detect_envelope(value: &Value) -> Option<(Envelope, &Vec<Value>)> {
    if let Some(Value::Array(rows)) = value.get("data") {
        return Some((Envelope::Data, rows));
    }
    if let Some(Value::Array(rows)) = value.get("rows") {
        return Some((Envelope::Rows, rows));
    }
    if let Value::Array(rows) = value {
        if rows.first().is_some_and(Value::is_array) {
            return Some((Envelope::Bare, rows));
        }
    }
    None
}

/// Object-keyed row: table-driven candidate-path extraction
fn from_object_row(row: &Value) -> GameRecord {
    GameRecord {
        id: text_at_paths(row, ID_PATHS),
        start_time: text_at_paths(row, START_TIME_PATHS),
        league: text_at_paths(row, LEAGUE_PATHS),
        home_team: text_at_paths(row, HOME_TEAM_PATHS),
        away_team: text_at_paths(row, AWAY_TEAM_PATHS),
        score: text_at_paths(row, SCORE_PATHS),
        venue: None,
        status: None,
    }
}

/// Positional row: any missing index or sub-field yields a null field,
/// never a failed record.
fn from_array_row(cells: &[Value]) -> GameRecord {
    let status_cell = cells.get(IDX_STATUS);

    // The result descriptor is only a score when it says so itself.
    let score = cells
        .get(IDX_RESULT)
        .filter(|r| value_at_path(r, "type").and_then(value_to_text).as_deref() == Some("result"))
        .and_then(|r| {
            let home = value_at_path(r, "homeTeam").and_then(value_to_text)?;
            let away = value_at_path(r, "awayTeam").and_then(value_to_text)?;
            Some(format!("{}:{}", home, away))
        });

    GameRecord {
        id: cells
            .get(IDX_ID)
            .and_then(|c| value_at_path(c, "gameId"))
            .and_then(value_to_text),
        start_time: status_cell
            .and_then(|c| value_at_path(c, "startDateTime"))
            .and_then(value_to_text),
        league: None,
        home_team: cells
            .get(IDX_HOME)
            .and_then(|c| value_at_path(c, "name"))
            .and_then(value_to_text),
        away_team: cells
            .get(IDX_AWAY)
            .and_then(|c| value_at_path(c, "name"))
            .and_then(value_to_text),
        score,
        venue: None,
        status: status_cell
            .and_then(|c| value_at_path(c, "name"))
            .and_then(value_to_text),
    }
}

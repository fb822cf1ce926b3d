//! Run orchestration
//!
//! Sequences fetch → decode → normalize → enrich → aggregate and owns
//! the one hard guarantee of this tool: artifacts are written on every
//! exit path. A run never propagates an error past this boundary; the
//! binary decides its exit code from the returned [`RunOutcome`].

use crate::aggregate::finalize;
use crate::config::{Config, RAW_ARTIFACT, RESULTS_ARTIFACT, STATUS_ARTIFACT};
use crate::decode::decode;
use crate::enrich::{enrich, DetailSource};
use crate::normalize::normalize;
use crate::sink::OutputSink;
use crate::transport::Transport;
use chrono::Utc;
use rinkside_common::{GameRecord, IngestError, Result};
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Orchestrator states, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Fetching,
    Decoding,
    Normalizing,
    Enriching,
    Aggregating,
    Persisted,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Start => "start",
            RunState::Fetching => "fetching",
            RunState::Decoding => "decoding",
            RunState::Normalizing => "normalizing",
            RunState::Enriching => "enriching",
            RunState::Aggregating => "aggregating",
            RunState::Persisted => "persisted",
            RunState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// What a completed run amounts to. Artifacts exist in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Persisted { count: usize },
    Failed,
}

/// Detail lookups through the real upstream endpoint
struct UpstreamDetailSource<'a> {
    transport: &'a Transport,
    config: &'a Config,
}

impl DetailSource for UpstreamDetailSource<'_> {
    async fn detail(&self, game_id: &str) -> Result<Value> {
        let url = self.config.detail_url(game_id)?;
        let text = self
            .transport
            .fetch_text(&url, &self.config.headers())
            .await?;
        decode(&text)
    }
}

/// Execute one full pipeline run.
pub async fn run(config: &Config, sink: &impl OutputSink) -> RunOutcome {
    let run_id = Uuid::new_v4();
    execute(config, sink)
        .instrument(info_span!("pipeline_run", %run_id))
        .await
}

async fn execute(config: &Config, sink: &impl OutputSink) -> RunOutcome {
    info!(state = %RunState::Start, "pipeline run starting");

    // Raw upstream text is captured as soon as it exists so the
    // forensic artifact survives later-stage failures.
    let mut raw_text: Option<String> = None;

    match attempt(config, &mut raw_text).await {
        Ok(records) => persist_and_report(sink, &records, raw_text.as_deref()),
        Err(err) => {
            error!(state = %RunState::Failed, error = %err, "pipeline stage failed");
            persist_failure(sink, &err, raw_text.as_deref());
            RunOutcome::Failed
        },
    }
}

/// The fallible part of the run, strictly sequential
async fn attempt(config: &Config, raw_text: &mut Option<String>) -> Result<Vec<GameRecord>> {
    info!(state = %RunState::Fetching, "fetching results list");
    let transport = Transport::new(config.doh_endpoint.clone(), config.request_timeout)?;
    let url = config.list_url()?;
    let text = transport.fetch_text(&url, &config.headers()).await?;
    *raw_text = Some(text.clone());

    info!(state = %RunState::Decoding, bytes = text.len(), "decoding payload");
    let payload = decode(&text)?;

    info!(state = %RunState::Normalizing, "normalizing rows");
    let mut records = normalize(&payload);

    info!(state = %RunState::Enriching, candidates = records.iter().filter(|r| r.needs_detail()).count(), "enriching incomplete records");
    let source = UpstreamDetailSource {
        transport: &transport,
        config,
    };
    enrich(
        &mut records,
        &source,
        config.max_detail,
        config.detail_throttle,
    )
    .await;

    info!(state = %RunState::Aggregating, records = records.len(), "aggregating");
    Ok(finalize(records, &config.team_filters))
}

/// Terminal persist for a successful pipeline. A sink error here still
/// ends with all three artifact writes attempted, via the same
/// best-effort failure path a stage error takes.
fn persist_and_report(
    sink: &impl OutputSink,
    records: &[GameRecord],
    raw_text: Option<&str>,
) -> RunOutcome {
    match persist_success(sink, records, raw_text) {
        Ok(()) => {
            info!(state = %RunState::Persisted, count = records.len(), "run complete");
            RunOutcome::Persisted {
                count: records.len(),
            }
        },
        Err(err) => {
            error!(state = %RunState::Failed, error = %err, "persisting results failed");
            persist_failure(sink, &err, raw_text);
            RunOutcome::Failed
        },
    }
}

fn persist_success(
    sink: &impl OutputSink,
    records: &[GameRecord],
    raw_text: Option<&str>,
) -> Result<()> {
    sink.persist(RAW_ARTIFACT, raw_text.unwrap_or(""))?;
    sink.persist(RESULTS_ARTIFACT, &serde_json::to_string_pretty(records)?)?;
    let status = format!(
        "ok: {} games written at {}\n",
        records.len(),
        Utc::now().to_rfc3339()
    );
    sink.persist(STATUS_ARTIFACT, &status)?;
    Ok(())
}

/// Best-effort terminal persist for the failure path. Downstream
/// consumers expect all three artifacts to exist even after a total
/// failure, so each write is attempted independently.
fn persist_failure(sink: &impl OutputSink, cause: &IngestError, raw_text: Option<&str>) {
    if let Err(err) = sink.persist(RESULTS_ARTIFACT, "[]") {
        error!(error = %err, "could not persist empty result list");
    }
    if let Err(err) = sink.persist(RAW_ARTIFACT, raw_text.unwrap_or("")) {
        error!(error = %err, "could not persist raw payload");
    }
    let status = format!("failed: {} at {}\n", cause, Utc::now().to_rfc3339());
    if let Err(err) = sink.persist(STATUS_ARTIFACT, &status) {
        error!(error = %err, "could not persist status");
    }
    sink.notify_failure(&cause.to_string());
}

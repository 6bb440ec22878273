//! Shared glue between the log, the active index and retrieval

use cairn_classify::Classifier;
use cairn_core::{extract_events, BackendKind, Config, ConfigError, Event};
use cairn_index::{Backend, EventIndex};
use cairn_retrieve::{format_context, Retriever};
use cairn_store::{atomic_write, EventLog, Paths};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

pub fn load_config(paths: &Paths) -> Result<Config, ConfigError> {
    Config::load(&paths.config_file())
}

pub fn save_config(paths: &Paths, config: &Config) -> anyhow::Result<()> {
    std::fs::create_dir_all(paths.cairn_dir())?;
    atomic_write(&paths.config_file(), config.to_json().as_bytes())?;
    Ok(())
}

pub fn event_log(paths: &Paths) -> EventLog {
    EventLog::new(paths.events_log())
}

/// Persisted index with the number of log events it reflects
#[derive(Debug, Serialize, Deserialize)]
struct IndexState<'a> {
    log_events: usize,
    #[serde(flatten)]
    index: Cow<'a, EventIndex>,
}

/// Open the persisted index for `kind`.
///
/// Missing, malformed, foreign or stale state is discarded and rebuilt from the log.
pub fn load_index(paths: &Paths, kind: BackendKind) -> anyhow::Result<EventIndex> {
    let events = event_log(paths).read_all()?;
    let state_path = paths.index_state();
    if state_path.exists() {
        let content = std::fs::read_to_string(&state_path)?;
        match restore_state(kind, &content, events.len()) {
            Ok(index) => return Ok(index),
            Err(e) => tracing::warn!(error = %e, "index state unusable, rebuilding from log"),
        }
    }
    replay(paths, kind, &events)
}

fn restore_state(kind: BackendKind, content: &str, logged: usize) -> anyhow::Result<EventIndex> {
    let state: IndexState = serde_json::from_str(content)?;
    let index = state.index.into_owned();
    index.validate()?;
    index.ensure_kind(kind)?;
    if state.log_events != logged {
        anyhow::bail!("index state reflects {} of {} logged events", state.log_events, logged);
    }
    Ok(index)
}

/// Replay the full event log into a fresh index and persist it
pub fn rebuild_index(paths: &Paths, kind: BackendKind) -> anyhow::Result<EventIndex> {
    let events = event_log(paths).read_all()?;
    replay(paths, kind, &events)
}

fn replay(paths: &Paths, kind: BackendKind, events: &[Event]) -> anyhow::Result<EventIndex> {
    let index = EventIndex::rebuild(kind, events);
    write_state(paths, &index, events.len())?;
    Ok(index)
}

/// Persist an index that has seen every logged event
pub fn save_index(paths: &Paths, index: &EventIndex) -> anyhow::Result<()> {
    let logged = event_log(paths).read_all()?.len();
    write_state(paths, index, logged)
}

fn write_state(paths: &Paths, index: &EventIndex, log_events: usize) -> anyhow::Result<()> {
    std::fs::create_dir_all(paths.cairn_dir())?;
    let state = IndexState {
        log_events,
        index: Cow::Borrowed(index),
    };
    atomic_write(&paths.index_state(), serde_json::to_string(&state)?.as_bytes())?;
    Ok(())
}

/// Counts from ingesting one transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub lines: usize,
    pub skipped: usize,
    pub extracted: usize,
    pub appended: usize,
}

/// Extract, classify and log a transcript's new events, then index them.
///
/// Events already in the log are not sent to the classifier again.
pub fn ingest_transcript(
    paths: &Paths,
    index: &mut EventIndex,
    classifier: &Classifier,
    transcript: &Path,
    session_id: &str,
) -> anyhow::Result<IngestReport> {
    let content = std::fs::read_to_string(transcript)?;
    let extraction = extract_events(content.lines(), session_id);
    if extraction.skipped > 0 {
        tracing::warn!(
            transcript = %transcript.display(),
            skipped = extraction.skipped,
            "skipped malformed transcript lines"
        );
    }

    let log = event_log(paths);
    let known = log.known_ids()?;
    let extracted = extraction.events.len();
    let pending: Vec<Event> = extraction
        .events
        .into_iter()
        .filter(|e| !known.contains(&e.id))
        .collect();

    let mut appended = Vec::new();
    if !pending.is_empty() {
        std::fs::create_dir_all(paths.cairn_dir())?;
        appended = log.append_new(&classifier.classify(pending))?;
        index.ingest(&appended);
    }

    tracing::info!(
        session_id,
        extracted,
        appended = appended.len(),
        indexed = index.len(),
        "ingested transcript"
    );

    Ok(IngestReport {
        lines: extraction.lines,
        skipped: extraction.skipped,
        extracted,
        appended: appended.len(),
    })
}

/// Query, trim to budget and render
pub fn recall(index: &EventIndex, prompt: &str, files_hinted: &[String], budget: usize) -> String {
    let results = index.query(prompt, files_hinted);
    let selected = Retriever::new(budget).select(&results);
    format_context(selected)
}

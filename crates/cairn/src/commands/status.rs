use crate::pipeline;
use cairn_core::{Category, Event};
use cairn_index::Backend;
use cairn_store::Paths;

pub fn run(paths: &Paths) -> anyhow::Result<()> {
    let output = status_json(paths)?;
    println!("{output}");
    Ok(())
}

fn status_json(paths: &Paths) -> anyhow::Result<serde_json::Value> {
    let config = pipeline::load_config(paths)?;
    let events = pipeline::event_log(paths).read_all()?;
    let index = pipeline::load_index(paths, config.backend)?;

    let sessions: std::collections::BTreeSet<&str> =
        events.iter().map(|e| e.session_id.as_str()).collect();

    Ok(serde_json::json!({
        "backend": config.backend.as_str(),
        "budget": config.budget,
        "summarizer": config.summarizer.api_key().is_some(),
        "logged": events.len(),
        "indexed": index.len(),
        "sessions": sessions.len(),
        "categories": category_counts(&events),
    }))
}

fn category_counts(events: &[Event]) -> serde_json::Map<String, serde_json::Value> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let count = events.iter().filter(|e| e.category == category).count();
            (category.as_str().to_string(), serde_json::json!(count))
        })
        .collect()
}

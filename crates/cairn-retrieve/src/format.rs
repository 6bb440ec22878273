//! Render selected events as a context block grouped by file

use cairn_core::{collapse_whitespace, truncate_chars, Event};
use std::collections::HashMap;

/// Maximum characters of response text quoted under an event line
pub const EXCERPT_LIMIT: usize = 200;

/// Render events grouped per affected file.
///
/// Groups appear in first-encountered order. An event touching several
/// files is listed under each of them; events with no files go to a
/// general group rendered without a heading.
pub fn format_context(events: &[Event]) -> String {
    if events.is_empty() {
        return String::new();
    }

    // None is the general group
    let mut groups: Vec<(Option<&str>, Vec<&Event>)> = Vec::new();
    let mut slots: HashMap<Option<&str>, usize> = HashMap::new();

    for event in events {
        let keys: Vec<Option<&str>> = if event.is_unattributed() {
            vec![None]
        } else {
            event.files_affected.iter().map(|f| Some(f.as_str())).collect()
        };

        for key in keys {
            let slot = *slots.entry(key).or_insert_with(|| {
                groups.push((key, Vec::new()));
                groups.len() - 1
            });
            let members = &mut groups[slot].1;
            // Duplicate paths within one event list it once
            if !members.last().is_some_and(|last| std::ptr::eq(*last, event)) {
                members.push(event);
            }
        }
    }

    let sections: Vec<String> = groups
        .iter()
        .map(|(key, members)| render_group(*key, members))
        .collect();
    sections.join("\n\n")
}

fn render_group(path: Option<&str>, members: &[&Event]) -> String {
    let mut lines = Vec::new();
    if let Some(path) = path {
        lines.push(format!("### {}", path));
    }
    for event in members {
        lines.push(format!("- [{}] {}", event.category, event.summary));
        let excerpt = excerpt(&event.response_text);
        if !excerpt.is_empty() {
            lines.push(format!("  > \"{}\"", excerpt));
        }
    }
    lines.join("\n")
}

fn excerpt(response_text: &str) -> String {
    truncate_chars(&collapse_whitespace(response_text.trim()), EXCERPT_LIMIT)
}

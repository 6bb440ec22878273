//! Phrase-pattern classification of reasoning text

use cairn_core::{collapse_whitespace, truncate_chars, Category};
use regex::Regex;
use std::sync::OnceLock;

struct PatternFamily {
    category: Category,
    phrases: &'static [&'static str],
}

/// Tested in order; the first family with a matching phrase wins
const PATTERN_FAMILIES: &[PatternFamily] = &[
    PatternFamily {
        category: Category::Decision,
        phrases: &[
            r"\b(?:i['’]ll|i will|let['’]s|we['’]ll|we will) (?:go with|use|choose|pick|opt for|stick with)\b",
            r"\b(?:decided|deciding|chose|choosing) to\b",
            r"\bi(?:['’]ve| have)? decided\b",
            r"\bgoing with\b",
            r"\bsettled on\b",
            r"\bopting for\b",
            r"\bwe should (?:use|go with)\b",
            r"\bthe (?:best|right|cleanest|simplest) (?:approach|option|fix|way) is\b",
        ],
    },
    PatternFamily {
        category: Category::Rejection,
        phrases: &[
            r"\binstead of\b",
            r"\brather than\b",
            r"\b(?:won['’]t|wouldn['’]t|doesn['’]t|does not|will not|would not) work\b",
            r"\brul(?:e|ed|ing) out\b",
            r"\b(?:reject|rejected|rejecting|abandon|abandoned|scrap|scrapping|discard)\b",
            r"\bnot (?:going to|worth)\b",
            r"\bbad idea\b",
        ],
    },
    PatternFamily {
        category: Category::Tradeoff,
        phrases: &[
            r"\btrade-?offs?\b",
            r"\bon the other hand\b",
            r"\b(?:downside|upside|drawback)s?\b",
            r"\bpros and cons\b",
            r"\bat the (?:cost|expense) of\b",
            r"\bbut (?:it|this|that) (?:would|means|costs|adds)\b",
            r"\bcompared to\b",
        ],
    },
    PatternFamily {
        category: Category::Exploration,
        phrases: &[
            r"\blet me (?:check|look|see|read|explore|examine|investigate|search|find|understand)\b",
            r"\bi need to (?:understand|check|look|see|find)\b",
            r"\b(?:investigating|exploring|looking at|looking into)\b",
            r"\bi wonder\b",
            r"\bwhere (?:is|does)\b",
        ],
    },
];

static COMPILED: OnceLock<Vec<(Category, Regex)>> = OnceLock::new();

fn compiled_families() -> &'static [(Category, Regex)] {
    COMPILED.get_or_init(|| {
        PATTERN_FAMILIES
            .iter()
            .filter_map(|family| {
                let pattern = format!("(?i)(?:{})", family.phrases.join("|"));
                match Regex::new(&pattern) {
                    Ok(re) => Some((family.category, re)),
                    Err(e) => {
                        tracing::warn!(category = %family.category, error = %e, "invalid pattern family");
                        None
                    }
                }
            })
            .collect()
    })
}

/// Summary for reasoning text that is blank
pub const EMPTY_SUMMARY: &str = "(no reasoning text)";

/// First sentence of the text (split on `.`, `!`, `?`), truncated to the summary limit.
///
/// Never empty: text with no sentence is used whole, blank text gets [`EMPTY_SUMMARY`].
pub fn first_sentence(text: &str) -> String {
    let sentence = text
        .split(['.', '!', '?'])
        .map(collapse_whitespace)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| collapse_whitespace(text));
    if sentence.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }
    truncate_chars(&sentence, cairn_core::SUMMARY_LIMIT)
}

/// Classify reasoning text by phrase patterns; deterministic for a given input
pub fn classify_heuristic(raw_text: &str) -> (Category, String) {
    let category = compiled_families()
        .iter()
        .find(|(_, re)| re.is_match(raw_text))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Raw);

    (category, first_sentence(raw_text))
}

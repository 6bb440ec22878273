//! Size estimate for an event once rendered into context

use cairn_core::Event;

/// Characters per budget unit, roughly one token of prose
pub const CHARS_PER_UNIT: usize = 4;

/// Estimated cost of an event: rendered characters divided by four, rounded up
pub fn estimate_cost(event: &Event) -> usize {
    let chars = event.summary.chars().count()
        + event.response_text.chars().count()
        + event.files_affected.join(",").chars().count();
    chars.div_ceil(CHARS_PER_UNIT)
}

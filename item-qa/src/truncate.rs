//! Context budgeting.
//!
//! Budgets are counted in whitespace-separated units, a model-independent
//! stand-in for tokens. Truncation keeps the leading text verbatim (original
//! spacing included) and cuts right after the last unit that fits.

/// Number of units in `text`.
pub fn count_units(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keeps at most `budget` leading units of `text`.
///
/// Text within budget is returned unchanged. The result always ends at a unit
/// boundary, so truncating it again with the same budget is a no-op.
///
/// ```
/// use item_qa::truncate::truncate_units;
///
/// assert_eq!(truncate_units("a  b\nc d", 3), "a  b\nc");
/// assert_eq!(truncate_units("a b ", 5), "a b ");
/// ```
pub fn truncate_units(text: &str, budget: usize) -> &str {
    if budget == 0 {
        return "";
    }

    let mut seen = 0usize;
    let mut in_unit = false;
    let mut cut = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_unit && seen == budget {
                cut = Some(i);
            }
            in_unit = false;
        } else if !in_unit {
            // A unit past the budget: cut after the last one that fits.
            if let Some(end) = cut {
                return &text[..end];
            }
            in_unit = true;
            seen += 1;
        }
    }
    text
}

/// Debug preview: first 200 characters followed by `...`.
pub fn snippet(text: &str) -> String {
    const SNIPPET_CHARS: usize = 200;
    let mut out: String = text.chars().take(SNIPPET_CHARS).collect();
    out.push_str("...");
    out
}

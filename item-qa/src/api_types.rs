//! Public API types re-used by external crates (e.g., the HTTP API layer).

/// One question about one item.
///
/// # Example
/// ```
/// use item_qa::Query;
/// let q = Query::new("diamondpickaxe", "Who crafted the Diamond Pickaxe?");
/// assert_eq!(q.item_type, "diamondpickaxe");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub item_type: String,
    pub question: String,
}

impl Query {
    pub fn new(item_type: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            question: question.into(),
        }
    }
}

/// Final answer. Optional fields are filled in according to the variant.
#[derive(Clone, Debug, PartialEq)]
pub struct Answer {
    /// User-facing answer (the refined one when refinement is chained).
    pub response: String,
    /// First-pass answer, chained variant only.
    pub initial_response: Option<String>,
    /// First 200 characters of the truncated context plus `...`.
    pub context_snippet: Option<String>,
    /// Seconds spent producing the answer, chained variant only.
    pub time_taken: Option<f64>,
}

//! Prompt templates, one per model family plus refinement.
//!
//! Extractive QA has no template: the `(question, context)` pair goes to the
//! model as-is.

/// Lead-in the text2text prompt ends with; the model continues after it.
pub const TEXT2TEXT_PREAMBLE: &str = "According to the available information,";

/// Instructional prompt for summarization models used as answerers.
pub fn summarization_prompt(context: &str, question: &str) -> String {
    format!(
        "Please answer the following question about an item based only on the provided description.\n\
         If the information is not in the description, respond with \"Based on the description, I cannot answer this question.\"\n\
         \n\
         Item Description:\n\
         {context}\n\
         \n\
         Question: {question}\n\
         \n\
         Answer:"
    )
}

/// Instructional prompt for text2text models.
pub fn text2text_prompt(context: &str, question: &str) -> String {
    format!(
        "Generate a factual answer to the question using only the context.\n\
         Use complete sentences. If information is missing, say \"I don't know\".\n\
         \n\
         Context: {context}\n\
         \n\
         Question: {question}\n\
         Answer: {TEXT2TEXT_PREAMBLE}"
    )
}

/// Second-pass prompt that restates an initial answer as a full sentence.
pub fn refinement_prompt(question: &str, initial_answer: &str) -> String {
    format!(
        "Based on the original question and the initial answer provided below,\n\
         please generate a refined, complete sentence that fully explains the answer.\n\
         In your answer, make sure to include any relevant context from the question if needed.\n\
         \n\
         Original Question: {question}\n\
         \n\
         Initial Answer: {initial_answer}\n\
         \n\
         Refined, complete sentence answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text2text_ends_with_preamble() {
        let p = text2text_prompt("CTX", "Who?");
        assert!(p.contains("\nContext: CTX\n\nQuestion: Who?\n"));
        assert!(p.ends_with("Answer: According to the available information,"));
    }

    #[test]
    fn summarization_layout() {
        let p = summarization_prompt("CTX", "Who?");
        assert!(p.starts_with("Please answer the following question"));
        assert!(p.contains("Item Description:\nCTX\n\nQuestion: Who?\n\nAnswer:"));
    }

    #[test]
    fn refinement_mentions_both_inputs() {
        let p = refinement_prompt("Who crafted it?", "Aldric.");
        assert!(p.contains("Original Question: Who crafted it?"));
        assert!(p.contains("Initial Answer: Aldric."));
        assert!(p.ends_with("Refined, complete sentence answer:"));
    }
}

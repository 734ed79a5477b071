// src/assistant.rs
// The language model is external; this only builds the text that goes in.

use crate::edgar::models::TickerSymbol;

/// Default persona for the research assistant
pub const DEFAULT_PERSONA: &str = "You are a financial research assistant. \
Answer questions about the company using the annual report excerpt provided. \
Quote figures from the report tables when they are relevant and say which table they come from. \
Be concise and do not speculate beyond what the report and widely known facts support.";

const NO_FILING_NOTE: &str = "No annual report text is available for this company. \
Answer from general knowledge and say so when a question depends on the filing.";

const TRUNCATION_NOTE: &str = "[Report excerpt truncated to fit the context window]";

/// Builds the prompt: persona, then filing context, then the user's message.
///
/// Filing text longer than `char_budget` characters is cut at the last line
/// break inside the budget. An empty filing yields a note telling the
/// assistant to proceed without it.
pub fn compose_prompt(
    persona: &str,
    ticker: &TickerSymbol,
    filing_text: &str,
    message: &str,
    char_budget: usize,
) -> String {
    let mut prompt =
        String::with_capacity(persona.len() + filing_text.len().min(char_budget) + message.len() + 256);
    prompt.push_str(persona.trim());
    prompt.push_str("\n\n");

    let filing_text = filing_text.trim();
    if filing_text.is_empty() {
        prompt.push_str(NO_FILING_NOTE);
    } else {
        let (excerpt, truncated) = truncate_to_budget(filing_text, char_budget);
        prompt.push_str(&format!("=== Most recent annual report for {} ===\n", ticker));
        prompt.push_str(excerpt);
        if truncated {
            tracing::debug!(
                "Filing context for {} truncated to {} of {} bytes",
                ticker,
                excerpt.len(),
                filing_text.len()
            );
            prompt.push('\n');
            prompt.push_str(TRUNCATION_NOTE);
        }
        prompt.push_str("\n=== End of report ===");
    }

    prompt.push_str("\n\nUser: ");
    prompt.push_str(message.trim());
    prompt
}

/// Cuts `text` to at most `budget` characters, preferring a line boundary.
fn truncate_to_budget(text: &str, budget: usize) -> (&str, bool) {
    let Some((cut, _)) = text.char_indices().nth(budget) else {
        return (text, false);
    };
    let head = &text[..cut];
    let end = head.rfind('\n').unwrap_or(cut);
    (head[..end].trim_end(), true)
}

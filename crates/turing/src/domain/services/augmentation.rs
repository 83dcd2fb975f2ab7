//! Prompt augmentation
//!
//! Combines retrieved memory with the live user message. The wrapper keeps
//! historical context visibly apart from the instruction the model must answer.

pub const MEMORY_PREAMBLE: &str = "BACKGROUND MEMORY (Do not mention this unless relevant):";
pub const MEMORY_OPEN: &str = "<memory>";
pub const MEMORY_CLOSE: &str = "</memory>";
pub const CURRENT_MESSAGE_MARKER: &str = "USER'S CURRENT MESSAGE: ";

/// Build the outbound prompt.
///
/// An empty `context_block` returns `user_text` untouched, so no wrapper text
/// ever reaches the model when there is nothing to inject.
pub fn augment_prompt(user_text: &str, context_block: &str) -> String {
    if context_block.is_empty() {
        return user_text.to_string();
    }

    format!(
        "{MEMORY_PREAMBLE}\n{MEMORY_OPEN}\n{context_block}\n{MEMORY_CLOSE}\n\n{CURRENT_MESSAGE_MARKER}{user_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context_is_identity() {
        assert_eq!(augment_prompt("hello there", ""), "hello there");
        assert_eq!(augment_prompt("", ""), "");
    }

    #[test]
    fn test_user_text_is_contiguous_suffix() {
        let context = "\n--- RELEVANT PAST CONTEXT ---\nUSER: My name is Ada\n-----------------------------\n";
        let user_text = "what is my name?\nanswer briefly";
        let prompt = augment_prompt(user_text, context);
        assert!(prompt.ends_with(user_text));
        assert!(prompt.starts_with(MEMORY_PREAMBLE));
    }

    #[test]
    fn test_memory_precedes_live_message() {
        let prompt = augment_prompt("now", "USER: before");
        let memory_at = prompt.find("USER: before").unwrap();
        let close_at = prompt.find(MEMORY_CLOSE).unwrap();
        let marker_at = prompt.find(CURRENT_MESSAGE_MARKER).unwrap();
        assert!(memory_at < close_at);
        assert!(close_at < marker_at);
        assert_eq!(
            prompt,
            "BACKGROUND MEMORY (Do not mention this unless relevant):\n<memory>\nUSER: before\n</memory>\n\nUSER'S CURRENT MESSAGE: now"
        );
    }
}

//! Prompt assembly for context-grounded answers

/// Fixed system instruction the retrieved context is appended to
pub const SYSTEM_INSTRUCTION: &str = "You are an assistant that answers questions only in \
     Bahasa Indonesia. Your answers must be based solely on the provided context from the \
     database. If the answer cannot be determined, respond with 'Maaf, saya tidak tahu.' ";

/// Build the full system prompt: the fixed instruction followed by the
/// ranked context passages
pub fn build_system_prompt(context: &str) -> String {
    format!("{SYSTEM_INSTRUCTION}{context}")
}

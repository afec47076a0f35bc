//! Prompt template rendering.
//!
//! The delimiter tokens emitted here (`CONVERSATION`, `QUESTION:`, `ANSWER:`,
//! follow-up labels) are the wire contract with [`crate::parser`]; both sides
//! share the label helpers below so the contract cannot drift.

use std::fmt::Write as _;

/// Instruction text used when the caller supplies a blank custom prompt.
pub const DEFAULT_INSTRUCTIONS: &str = "You are generating a question-and-answer \
training dataset. Generate natural, educational conversations grounded strictly \
in the provided text.";

/// Label opening follow-up round `round` (the round is the 1-based exchange
/// number, so the first follow-up is round 2).
///
/// The two-exchange case keeps the bare `FOLLOW-UP:` label; deeper
/// conversations number the rounds, since repeated identical labels cannot be
/// told apart by substring scanning.
#[must_use]
pub fn followup_label(round: usize, num_exchanges: usize) -> String {
    if num_exchanges == 2 {
        "FOLLOW-UP:".to_owned()
    } else {
        format!("FOLLOW-UP {round}:")
    }
}

/// Label opening the answer of follow-up round `round`.
#[must_use]
pub fn followup_answer_label(round: usize, num_exchanges: usize) -> String {
    if num_exchanges == 2 {
        "FOLLOW-UP ANSWER:".to_owned()
    } else {
        format!("FOLLOW-UP ANSWER {round}:")
    }
}

fn format_instructions(num_exchanges: usize) -> String {
    let mut block = String::from(
        "Format for each conversation:\n\
         CONVERSATION X:\n\
         QUESTION: [initial question from user, all lowercase]\n\
         ANSWER: [AI response based on text]\n",
    );
    for round in 2..=num_exchanges {
        let _ = writeln!(
            block,
            "{} [follow-up question, all lowercase]",
            followup_label(round, num_exchanges)
        );
        let _ = writeln!(
            block,
            "{} [AI response to follow-up, also based on text]",
            followup_answer_label(round, num_exchanges)
        );
    }
    block
}

/// Render the generation prompt for one chunk.
///
/// Blank `custom_instructions` fall back to [`DEFAULT_INSTRUCTIONS`]; the
/// chunk text is appended last.
#[must_use]
pub fn build(
    chunk_text: &str,
    custom_instructions: &str,
    num_questions: usize,
    num_exchanges: usize,
) -> String {
    let instructions = if custom_instructions.trim().is_empty() {
        DEFAULT_INSTRUCTIONS
    } else {
        custom_instructions
    };

    format!(
        "{instructions}\n\n\
         Based on the following text, generate {num_questions} conversation pairs \
         with {num_exchanges} exchange(s) each.\n\n\
         Requirements:\n\
         - User questions should be natural and use lowercase\n\
         - AI responses should be informative and based on the provided text\n\
         - Cover the major concepts mentioned in the text\n\
         - Each conversation should feel natural and educational\n\n\
         {}\n\
         Text content:\n\
         {chunk_text}\n\n\
         Generate exactly {num_questions} conversations that thoroughly cover the content:",
        format_instructions(num_exchanges)
    )
}

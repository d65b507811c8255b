use crate::models::{communication::GameEvent, game::Question};

/// Resolves typed input against the options on screen: "1" to "4" pick by position,
/// anything else is taken as the answer text itself.
pub fn resolve_answer(input: &str, question: &Question) -> String {
    let trimmed = input.trim();
    trimmed
        .parse::<usize>()
        .ok()
        .and_then(|position| question.option_at(position))
        .unwrap_or(trimmed)
        .to_string()
}

/// Maps one line typed at the prompt to a game event.
pub fn parse_input(line: &str) -> GameEvent {
    match line.trim() {
        "q" | "quit" | ":q" => GameEvent::Quit,
        text => GameEvent::Answer {
            text: text.to_string(),
        },
    }
}

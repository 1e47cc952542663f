pub const XAI_SYSTEM: &str = include_str!("../data/prompts/xai_system.txt");
pub const XAI_USER: &str = include_str!("../data/prompts/xai_user.txt");
pub const ANTHROPIC: &str = include_str!("../data/prompts/anthropic.txt");
pub const OPENAI: &str = include_str!("../data/prompts/openai.txt");
pub const ZAI: &str = include_str!("../data/prompts/zai.txt");

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 5] = [XAI_SYSTEM, XAI_USER, ANTHROPIC, OPENAI, ZAI];

    #[test]
    fn test_prompts_are_non_empty() {
        for prompt in ALL {
            assert!(!prompt.trim().is_empty());
        }
    }

    #[test]
    fn test_prompts_state_piece_color_convention() {
        for prompt in ALL {
            let lower = prompt.to_lowercase();
            assert!(lower.contains("hollow"), "missing convention in: {}", prompt);
            assert!(lower.contains("solid") || lower.contains("black"));
        }
    }

    #[test]
    fn test_xai_system_asks_for_labeled_fen() {
        assert!(XAI_SYSTEM.contains("FEN:"));
        assert!(XAI_SYSTEM.contains("Rank 8"));
    }
}

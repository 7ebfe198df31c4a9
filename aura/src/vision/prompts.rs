//! System instructions for the vision model.

const BASE_INSTRUCTION: &str = "You are Aura, a helpful vision assistant. Keep answers short.";

/// Language code selecting a transliterated-vernacular reply style.
pub const TANGLISH: &str = "TG";

/// Build the system instruction for a describe call. `TG` selects a
/// transliterated Tamil ("Tanglish") reply style; anything else selects
/// plain English.
pub fn system_instruction(language: &str) -> String {
    if language.eq_ignore_ascii_case(TANGLISH) {
        format!("{BASE_INSTRUCTION} Reply in 'Tanglish'.")
    } else {
        format!("{BASE_INSTRUCTION} Reply in English.")
    }
}

/// Prompt used when the client sends an empty query.
pub const DEFAULT_PROMPT: &str = "Describe this.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tanglish_selects_vernacular_style() {
        let instruction = system_instruction("TG");
        assert!(instruction.contains("Tanglish"));
        assert!(instruction.starts_with(BASE_INSTRUCTION));

        let lower = system_instruction("tg");
        assert!(lower.contains("Tanglish"));
    }

    #[test]
    fn other_languages_select_english() {
        for lang in ["EN", "FR", "", "anything"] {
            let instruction = system_instruction(lang);
            assert!(instruction.contains("Reply in English"), "{lang}");
        }
    }
}

// Extraction prompt template.
// `{format_instructions}` and `{resume_text}` are filled by `build_prompt`.

use crate::extraction::schema::format_instructions;

pub const RESUME_EXTRACTION_TEMPLATE: &str = r#"You are an AI resume analyzer.

Extract the following information from the resume text.
If a field is missing, return null.
Skills must be returned as a list of strings.

{format_instructions}

Resume Text:
{resume_text}
"#;

/// Builds the full extraction prompt for one resume. Pure; no I/O.
pub fn build_prompt(resume_text: &str) -> String {
    // Format instructions go in first so braces inside the resume text are never
    // mistaken for a placeholder.
    RESUME_EXTRACTION_TEMPLATE
        .replace("{format_instructions}", &format_instructions())
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_resume_text_verbatim() {
        let text = "Jane Doe\njane@example.com\n  Rust | Go  ";
        let prompt = build_prompt(text);
        assert!(prompt.contains(text));
        assert!(prompt.trim_end().ends_with("Rust | Go"));
    }

    #[test]
    fn test_prompt_contains_instructions_and_schema() {
        let prompt = build_prompt("x");
        assert!(prompt.contains("If a field is missing, return null."));
        assert!(prompt.contains("Skills must be returned as a list of strings."));
        assert!(prompt.contains("\"experience_summary\""));
        assert!(!prompt.contains("{format_instructions}"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_placeholder_like_resume_text_is_left_alone() {
        let prompt = build_prompt("Built {format_instructions} parser");
        assert!(prompt.contains("Built {format_instructions} parser"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt("same"), build_prompt("same"));
    }
}

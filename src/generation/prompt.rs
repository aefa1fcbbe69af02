use tracing::warn;

const DESCRIPTION_LIMIT: usize = 1000;
const USER_PROMPT_LIMIT: usize = 500;
/// Maximum length of the assembled prompt. Anything beyond this is cut off
/// without word-boundary care; the cap is a safety net, not formatting.
const CONTEXT_BUDGET: usize = 8000;

const ELLIPSIS: &str = "...";

const PREAMBLE: &str =
    "You are a project management assistant helping to plan initial tickets for a new project.\n\n";

const INSTRUCTIONS: &str = r#"Please generate 3-5 related tickets that would be good starting points for this project. Each ticket should be actionable and well-defined.

Requirements:
1. Generate between 3 and 5 tickets
2. Each ticket must have a clear, concise title
3. Each ticket must have a detailed description explaining what needs to be done
4. Each ticket must include acceptance criteria as an array of specific, testable conditions

Format your response as a JSON object with this exact structure:
{
    "tickets": [
        {
            "title": "Clear, actionable ticket title",
            "description": "Detailed description of what needs to be done and why it matters",
            "acceptance_criteria": [
                "Specific, testable condition 1",
                "Specific, testable condition 2",
                "Specific, testable condition 3"
            ]
        }
    ]
}

Important guidelines:
- Titles should be concise and start with an action verb
- Descriptions should give enough context for someone to pick up the task
- Acceptance criteria should be specific, measurable, and testable
- Focus on foundational tasks that make sense for a new project

Return ONLY the JSON object, no additional text or explanation."#;

/// Assemble the generation prompt from project context. The project name is
/// embedded verbatim; description and extra user context are truncated at a
/// word boundary before embedding.
pub fn build(project_name: &str, description: Option<&str>, user_prompt: Option<&str>) -> String {
    let mut prompt = String::from(PREAMBLE);
    prompt.push_str(&format!("Project Name: {project_name}\n"));

    if let Some(description) = description.filter(|text| !text.trim().is_empty()) {
        prompt.push_str(&format!(
            "Project Description: {}\n",
            truncate_at_word(description, DESCRIPTION_LIMIT)
        ));
    }
    if let Some(extra) = user_prompt.filter(|text| !text.trim().is_empty()) {
        prompt.push_str(&format!(
            "Additional Context: {}\n",
            truncate_at_word(extra, USER_PROMPT_LIMIT)
        ));
    }

    prompt.push('\n');
    prompt.push_str(INSTRUCTIONS);

    let assembled_len = prompt.chars().count();
    if assembled_len > CONTEXT_BUDGET {
        warn!(
            original_len = assembled_len,
            capped_len = CONTEXT_BUDGET,
            "assembled prompt exceeds context budget, truncating"
        );
        prompt = prompt.chars().take(CONTEXT_BUDGET).collect();
    }

    prompt
}

/// Cut `text` to at most `max_chars` characters, ending at the last word
/// boundary before the limit, with room reserved for the ellipsis marker.
fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let budget = max_chars.saturating_sub(ELLIPSIS.chars().count());
    let cut: String = text.chars().take(budget).collect();
    let kept = match cut.rfind(' ') {
        Some(idx) => &cut[..idx],
        None => cut.as_str(),
    };
    format!("{kept}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_name_verbatim() {
        let prompt = build("Demo Project", None, None);
        assert!(prompt.contains("Project Name: Demo Project\n"));
        assert!(!prompt.contains("Project Description:"));
        assert!(!prompt.contains("Additional Context:"));
    }

    #[test]
    fn embeds_description_and_context_sections() {
        let prompt = build("Demo", Some("a web shop"), Some("focus on checkout"));
        assert!(prompt.contains("Project Description: a web shop\n"));
        assert!(prompt.contains("Additional Context: focus on checkout\n"));
    }

    #[test]
    fn keeps_short_text_untouched() {
        assert_eq!(truncate_at_word("short text", 1000), "short text");
    }

    #[test]
    fn truncates_long_description_at_word_boundary() {
        let words = "lorem ipsum dolor sit amet ".repeat(60);
        let fragment = truncate_at_word(&words, DESCRIPTION_LIMIT);

        assert!(fragment.chars().count() <= DESCRIPTION_LIMIT);
        assert!(fragment.ends_with(ELLIPSIS));

        let kept = fragment.trim_end_matches(ELLIPSIS);
        assert!(words.starts_with(kept));
        assert!(!kept.ends_with(' '));
        // The cut point sits on the space that separated two words.
        assert_eq!(words.as_bytes()[kept.len()], b' ');
    }

    #[test]
    fn truncates_user_prompt_at_500() {
        let words = "alpha beta gamma delta ".repeat(40);
        let fragment = truncate_at_word(&words, USER_PROMPT_LIMIT);
        assert!(fragment.chars().count() <= USER_PROMPT_LIMIT);
        assert!(fragment.ends_with(ELLIPSIS));
    }

    #[test]
    fn caps_assembled_prompt_at_context_budget() {
        let huge_name = "x".repeat(20_000);
        let prompt = build(&huge_name, Some("desc"), Some("extra"));
        assert_eq!(prompt.chars().count(), CONTEXT_BUDGET);
    }

    #[test]
    fn instructs_json_ticket_envelope() {
        let prompt = build("Demo", None, None);
        assert!(prompt.contains("between 3 and 5 tickets"));
        assert!(prompt.contains("\"tickets\""));
        assert!(prompt.contains("acceptance_criteria"));
        assert!(prompt.contains("ONLY the JSON object"));
    }

    #[test]
    fn skips_blank_optional_sections() {
        let prompt = build("Demo", Some("   "), Some(""));
        assert!(!prompt.contains("Project Description:"));
        assert!(!prompt.contains("Additional Context:"));
    }
}

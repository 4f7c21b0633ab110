use crate::models::{Persona, ProjectCard};

pub const PROJECT_DESCRIPTION: &str = include_str!("../data/prompts/project_description.txt");
pub const RESUME_CHAT: &str = include_str!("../data/prompts/resume_chat.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Substitution is a single pass over the template: placeholders that appear
/// inside a substituted value are left as they are. Unknown keys stay literal.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            result.push_str(&rest[start..]);
            return result;
        };
        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    result.push_str(rest);
    result
}

/// Prompt asking for a portfolio paragraph about one project card.
pub fn project_description(card: &ProjectCard) -> String {
    let highlights = card
        .highlights
        .iter()
        .map(|h| format!("- {}", h))
        .collect::<Vec<_>>()
        .join("\n");

    render(
        PROJECT_DESCRIPTION,
        &[("title", &card.title), ("highlights", &highlights)],
    )
}

/// Prompt grounding a single visitor question in the resume context.
pub fn resume_chat(persona: &Persona, context: &str, question: &str) -> String {
    render(
        RESUME_CHAT,
        &[
            ("owner", &persona.owner),
            ("assistant", &persona.assistant_name),
            ("context", context),
            ("question", question),
        ],
    )
}

use pathpilot_intent::intent::prompt::PromptBuilder;

#[test]
fn given_same_text_when_rendered_twice_then_prompts_match() {
    let builder = PromptBuilder;
    assert_eq!(
        builder.render("Navigate to the pharmacy"),
        builder.render("Navigate to the pharmacy")
    );
}

#[test]
fn given_text_when_rendered_then_text_is_quoted_verbatim() {
    let prompt = PromptBuilder.render("  Take me to Café \"Rosa\"  ");
    assert!(prompt.contains("Voice Command: \"  Take me to Café \"Rosa\"  \""));
}

#[test]
fn given_any_text_when_rendered_then_every_intent_is_enumerated() {
    let prompt = PromptBuilder.render("help");
    for intent in ["navigate", "location", "nearby", "help", "stop_navigation"] {
        assert!(prompt.contains(&format!("\"{intent}\"")), "missing {intent}");
    }
    assert!(prompt.contains("confidence"));
    assert!(prompt.contains("Examples:"));
}

#[test]
fn given_different_texts_when_rendered_then_only_command_line_differs() {
    let a = PromptBuilder.render("Where am I?");
    let b = PromptBuilder.render("Stop navigation");
    let diff: Vec<(&str, &str)> = a
        .lines()
        .zip(b.lines())
        .filter(|(left, right)| left != right)
        .collect();
    assert_eq!(diff.len(), 1);
    assert!(diff[0].0.starts_with("Voice Command:"));
}

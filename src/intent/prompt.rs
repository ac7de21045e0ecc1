#[derive(Default, Clone, Copy)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn render(&self, transcribed_text: &str) -> String {
        format!(
            "{}\n\nVoice Command: \"{}\"\n\n{}\n\n{}",
            preamble(),
            transcribed_text,
            schema_description(),
            worked_examples()
        )
    }
}

fn preamble() -> &'static str {
    concat!(
        "You are a navigation assistant for visually impaired users. ",
        "Analyze this voice command and extract structured information."
    )
}

fn schema_description() -> &'static str {
    concat!(
        "Extract and return JSON with these fields:\n",
        "{\n",
        "  \"intent\": \"navigate\" | \"location\" | \"nearby\" | \"help\" | \"stop_navigation\",\n",
        "  \"destination\": \"destination name or null\",\n",
        "  \"category\": \"place category if asking for nearby (e.g., pharmacy, restaurant) or null\",\n",
        "  \"confidence\": 0.0 to 1.0\n",
        "}"
    )
}

fn worked_examples() -> &'static str {
    concat!(
        "Examples:\n",
        "- \"Navigate to the pharmacy\" -> ",
        "{\"intent\": \"navigate\", \"destination\": \"pharmacy\", \"category\": null, \"confidence\": 0.95}\n",
        "- \"Where am I?\" -> ",
        "{\"intent\": \"location\", \"destination\": null, \"category\": null, \"confidence\": 1.0}\n",
        "- \"Find nearby restaurants\" -> ",
        "{\"intent\": \"nearby\", \"destination\": null, \"category\": \"restaurant\", \"confidence\": 0.9}\n",
        "- \"Stop navigation\" -> ",
        "{\"intent\": \"stop_navigation\", \"destination\": null, \"category\": null, \"confidence\": 1.0}"
    )
}

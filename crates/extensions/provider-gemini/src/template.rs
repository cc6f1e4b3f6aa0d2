/// Instruction wrapped around the user's prompt. `{prompt}` is replaced verbatim.
pub const ENHANCE_TEMPLATE: &str = "Please rephrase and enhance the following prompt to make it clearer, more specific, and more effective. Maintain the original intent but make it more articulate and well-structured. Only return the enhanced prompt. Do not say anything else. Here's the prompt to enhance:

\"{prompt}\"

Enhanced version:";

pub fn render_prompt(prompt: &str) -> String {
    ENHANCE_TEMPLATE.replacen("{prompt}", prompt, 1)
}

/// What the user chose when shown a candidate fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Apply,
    Skip,
    Quit,
}

/// Interaction seam for the interactive mode. The CLI binds this to stdin;
/// tests script it.
pub trait UserPrompt {
    /// Display a block of text (diagnostic, snippet, preview, outcome).
    fn show(&mut self, text: &str);

    /// Ask whether the previewed fix should be applied.
    fn choose(&mut self) -> anyhow::Result<PromptChoice>;
}

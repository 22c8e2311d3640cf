//! MOTD (`375`/`372`/`376`) accumulation.

/// Collects `372` lines between `375` and `376`.
#[derive(Debug, Default)]
pub struct MotdAccumulator {
    lines: Option<Vec<String>>,
}

impl MotdAccumulator {
    pub fn is_collecting(&self) -> bool {
        self.lines.is_some()
    }

    /// `375`: begin a fresh MOTD, discarding anything half-collected.
    pub fn start(&mut self) {
        self.lines = Some(Vec::new());
    }

    /// `372`: append one line. The conventional `- ` lead-in is stripped;
    /// blank rows stay as empty lines.
    pub fn push(&mut self, text: &str) {
        let line = text
            .strip_prefix("- ")
            .or_else(|| text.strip_prefix('-'))
            .unwrap_or(text);
        self.lines
            .get_or_insert_with(Vec::new)
            .push(line.to_owned());
    }

    /// `376` (or `422`): the joined text, newline separated.
    pub fn finish(&mut self) -> String {
        self.lines.take().unwrap_or_default().join("\n")
    }
}

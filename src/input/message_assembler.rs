//! Groups stdin lines into chat messages

/// Line that closes a multi-line block, besides a blank line
pub const BLOCK_TERMINATOR: &str = ".";

/// Collects typed lines into messages.
///
/// In single-line mode every non-blank line is a message. In block mode
/// (pasting a CV or a job description) lines accumulate until a blank line
/// or a lone `.`, and the block is sent as one message.
#[derive(Debug, Default)]
pub struct MessageAssembler {
    buffer: Vec<String>,
}

impl MessageAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line; returns a message once one is complete
    pub fn push(&mut self, line: &str, block_mode: bool) -> Option<String> {
        let trimmed = line.trim();

        if !block_mode && self.buffer.is_empty() {
            return (!trimmed.is_empty()).then(|| trimmed.to_string());
        }

        if trimmed.is_empty() || trimmed == BLOCK_TERMINATOR {
            return self.flush();
        }
        self.buffer.push(line.trim_end().to_string());
        None
    }

    /// Whatever is still buffered, for end of input
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let message = self.buffer.join("\n");
        self.buffer.clear();
        Some(message)
    }

    pub fn is_collecting(&self) -> bool {
        !self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_mode() {
        let mut assembler = MessageAssembler::new();
        assert_eq!(assembler.push("  Bonjour ", false), Some("Bonjour".to_string()));
        assert_eq!(assembler.push("   ", false), None);
        assert!(!assembler.is_collecting());
    }

    #[test]
    fn test_block_is_sent_whole_on_blank_line() {
        let mut assembler = MessageAssembler::new();
        let lines = [
            "Camille Martin, développeuse full-stack",
            "3 ans d'expérience avec Python, React et PostgreSQL",
            "Master en informatique, projets en équipe agile",
        ];
        for line in lines {
            assert_eq!(assembler.push(line, true), None);
        }
        assert!(assembler.is_collecting());

        let message = assembler.push("", true).unwrap();
        assert_eq!(message, lines.join("\n"));
        assert!(message.chars().count() > 100);
        assert!(!assembler.is_collecting());
    }

    #[test]
    fn test_dot_terminates_and_leading_blank_lines_are_skipped() {
        let mut assembler = MessageAssembler::new();
        assert_eq!(assembler.push("", true), None);
        assert_eq!(assembler.push("Poste Python", true), None);
        assert_eq!(assembler.push("    - Docker  ", true), None);
        assert_eq!(assembler.push(".", true), Some("Poste Python\n    - Docker".to_string()));
    }

    #[test]
    fn test_started_block_finishes_after_mode_change() {
        let mut assembler = MessageAssembler::new();
        assembler.push("première ligne", true);
        assert_eq!(assembler.push("seconde ligne", false), None);
        assert_eq!(assembler.flush(), Some("première ligne\nseconde ligne".to_string()));
        assert_eq!(assembler.flush(), None);
    }
}

//! Reporter notes kept alongside the guidance.

/// Length shown next to free-text inputs. Not enforced.
pub const NOTE_SOFT_LIMIT: usize = 1000;

/// Character counter in the `n/1000` form used under every text input.
pub fn counter(text: &str) -> String {
    format!("{}/{}", text.chars().count(), NOTE_SOFT_LIMIT)
}

/// Field notes and follow-up question ideas. Lives only in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    pub field_notes: String,
    pub question_ideas: String,
}

impl Notes {
    /// Append a line to the field notes.
    pub fn add_field_note(&mut self, line: &str) {
        push_line(&mut self.field_notes, line);
    }

    /// Append a line to the question ideas.
    pub fn add_question_idea(&mut self, line: &str) {
        push_line(&mut self.question_ideas, line);
    }

    pub fn is_empty(&self) -> bool {
        self.field_notes.is_empty() && self.question_ideas.is_empty()
    }

    pub fn clear(&mut self) {
        self.field_notes.clear();
        self.question_ideas.clear();
    }

    pub fn field_notes_counter(&self) -> String {
        counter(&self.field_notes)
    }

    pub fn question_ideas_counter(&self) -> String {
        counter(&self.question_ideas)
    }
}

fn push_line(buf: &mut String, line: &str) {
    let line = line.trim_end();
    if line.is_empty() {
        return;
    }
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_counts_chars() {
        assert_eq!(counter(""), "0/1000");
        assert_eq!(counter("해경"), "2/1000");
    }

    #[test]
    fn test_notes_lines_and_clear() {
        let mut notes = Notes::default();
        assert!(notes.is_empty());

        notes.add_field_note("목격자 3명 확보");
        notes.add_field_note("   ");
        notes.add_field_note("현장 통제선 설치");
        notes.add_question_idea("초동 대응 매뉴얼은?");

        assert_eq!(notes.field_notes, "목격자 3명 확보\n현장 통제선 설치");
        assert_eq!(notes.question_ideas_counter(), "11/1000");

        notes.clear();
        assert!(notes.is_empty());
    }
}

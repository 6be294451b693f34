/// Single-line text field. The cursor counts chars, not bytes.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    cursor: usize,
    char_limit: usize,
}

/// Editing operations; each reports whether the value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    DeleteWordBackward,
    DeleteToStart,
}

impl TextInput {
    pub fn new(char_limit: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            char_limit,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub fn apply(&mut self, edit: Edit) -> bool {
        let before = self.value.len();
        match edit {
            Edit::Insert(c) => {
                if c.is_control() || self.len() >= self.char_limit {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                return true;
            }
            Edit::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            Edit::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
            }
            Edit::Left => self.cursor = self.cursor.saturating_sub(1),
            Edit::Right => self.cursor = (self.cursor + 1).min(self.len()),
            Edit::Home => self.cursor = 0,
            Edit::End => self.cursor = self.len(),
            Edit::DeleteWordBackward => {
                let chars: Vec<char> = self.value.chars().collect();
                let mut start = self.cursor;
                while start > 0 && chars[start - 1].is_whitespace() {
                    start -= 1;
                }
                while start > 0 && !chars[start - 1].is_whitespace() {
                    start -= 1;
                }
                let (from, to) = (self.byte_index(start), self.byte_index(self.cursor));
                self.value.replace_range(from..to, "");
                self.cursor = start;
            }
            Edit::DeleteToStart => {
                let to = self.byte_index(self.cursor);
                self.value.replace_range(..to, "");
                self.cursor = 0;
            }
        }
        self.value.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::new(200);
        for c in text.chars() {
            input.apply(Edit::Insert(c));
        }
        input
    }

    #[test]
    fn inserts_at_cursor() {
        let mut input = typed("note");
        input.apply(Edit::Home);
        assert!(input.apply(Edit::Insert('>')));
        assert_eq!(input.value(), ">note");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn cursor_moves_do_not_change_value() {
        let mut input = typed("abc");
        assert!(!input.apply(Edit::Left));
        assert!(!input.apply(Edit::Right));
        assert!(!input.apply(Edit::Right));
        assert_eq!(input.cursor(), 3);
        input.apply(Edit::Home);
        assert!(!input.apply(Edit::Left));
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn backspace_and_delete_handle_multibyte_chars() {
        let mut input = typed("café");
        assert!(input.apply(Edit::Backspace));
        assert_eq!(input.value(), "caf");
        input.apply(Edit::Home);
        assert!(!input.apply(Edit::Backspace));
        assert!(input.apply(Edit::Delete));
        assert_eq!(input.value(), "af");
        input.apply(Edit::End);
        assert!(!input.apply(Edit::Delete));
    }

    #[test]
    fn char_limit_is_enforced() {
        let mut input = TextInput::new(3);
        for c in "abcd".chars() {
            input.apply(Edit::Insert(c));
        }
        assert_eq!(input.value(), "abc");
        assert!(!input.apply(Edit::Insert('\n')));
    }

    #[test]
    fn word_and_line_deletion() {
        let mut input = typed("visual studio  ");
        assert!(input.apply(Edit::DeleteWordBackward));
        assert_eq!(input.value(), "visual ");
        assert!(input.apply(Edit::DeleteWordBackward));
        assert_eq!(input.value(), "");

        let mut input = typed("/rust book");
        input.apply(Edit::Left);
        input.apply(Edit::Left);
        assert!(input.apply(Edit::DeleteToStart));
        assert_eq!(input.value(), "ok");
        assert_eq!(input.cursor(), 0);
    }
}

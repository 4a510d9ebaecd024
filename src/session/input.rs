/// Longest answer the input line accepts.
pub const MAX_INPUT_LEN: usize = 22;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerInput {
    text: String,
}

impl AnswerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.text.len() >= MAX_INPUT_LEN
    }
}

/// Appends an ASCII digit. Returns false for anything else or when the line is full.
pub fn process_digit(input: &mut AnswerInput, ch: char) -> bool {
    if !ch.is_ascii_digit() || input.is_full() {
        return false;
    }
    input.text.push(ch);
    true
}

/// Returns whether there was anything to clear.
pub fn process_clear(input: &mut AnswerInput) -> bool {
    let had_text = !input.text.is_empty();
    input.text.clear();
    had_text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only() {
        let mut input = AnswerInput::new();
        assert!(process_digit(&mut input, '4'));
        assert!(!process_digit(&mut input, 'a'));
        assert!(!process_digit(&mut input, '-'));
        assert!(process_digit(&mut input, '2'));
        assert_eq!(input.as_str(), "42");
    }

    #[test]
    fn test_input_is_capped() {
        let mut input = AnswerInput::new();
        for _ in 0..MAX_INPUT_LEN {
            assert!(process_digit(&mut input, '9'));
        }
        assert!(input.is_full());
        assert!(!process_digit(&mut input, '9'));
        assert_eq!(input.as_str().len(), MAX_INPUT_LEN);
    }

    #[test]
    fn test_clear() {
        let mut input = AnswerInput::new();
        assert!(!process_clear(&mut input));
        process_digit(&mut input, '7');
        assert!(process_clear(&mut input));
        assert!(input.is_empty());
    }
}

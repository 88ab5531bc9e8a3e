//! Answer being typed on the keypad

use serde::{Deserialize, Serialize};

use crate::consts::MAX_INPUT_DIGITS;

/// Bounded digit buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInput {
    digits: String,
}

impl PendingInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a digit. Returns false if it was rejected (not 0-9, or full).
    pub fn push_digit(&mut self, digit: u8) -> bool {
        if digit > 9 || self.digits.len() >= MAX_INPUT_DIGITS {
            return false;
        }
        self.digits.push(char::from(b'0' + digit));
        true
    }

    pub fn backspace(&mut self) {
        self.digits.pop();
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Empty the buffer, returning what it held as a number (None if empty)
    pub fn take_value(&mut self) -> Option<u32> {
        let value = self.digits.parse().ok();
        self.digits.clear();
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_length() {
        let mut input = PendingInput::new();
        for d in [1, 2, 3, 4, 5] {
            input.push_digit(d);
        }
        assert_eq!(input.as_str(), "1234");
        assert!(!input.push_digit(9));
        assert!(!PendingInput::new().push_digit(10));
    }

    #[test]
    fn test_take_value_clears() {
        let mut input = PendingInput::new();
        input.push_digit(0);
        input.push_digit(4);
        input.push_digit(2);
        assert_eq!(input.take_value(), Some(42));
        assert!(input.is_empty());
        assert_eq!(input.take_value(), None);
    }

    #[test]
    fn test_backspace() {
        let mut input = PendingInput::new();
        input.backspace();
        input.push_digit(1);
        input.push_digit(5);
        input.backspace();
        assert_eq!(input.as_str(), "1");
    }
}

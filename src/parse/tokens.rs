//! Character scanner for the literal reader
//!
//! Positions are counted in characters, not bytes, so that error positions
//! line up with what a user sees in literals such as `E♭4`.

use crate::error::IntervalError;

#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    position: usize,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewind to an earlier position after a failed production
    pub fn reset(&mut self, position: usize) {
        self.position = position.min(self.chars.len());
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.chars.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            return true;
        }
        false
    }

    pub fn starts_with(&self, text: &str) -> bool {
        let mut offset = 0;
        for c in text.chars() {
            if self.peek_at(offset) != Some(c) {
                return false;
            }
            offset += 1;
        }
        true
    }

    pub fn eat_str(&mut self, text: &str) -> bool {
        if self.starts_with(text) {
            self.position += text.chars().count();
            return true;
        }
        false
    }

    pub fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            taken.push(c);
            self.position += 1;
        }
        taken
    }

    pub fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    pub fn error(&self, message: impl Into<String>) -> IntervalError {
        IntervalError::Parse {
            position: self.position,
            message: message.into(),
        }
    }

    /// Error describing the character under the cursor
    pub fn unexpected(&self) -> IntervalError {
        match self.peek() {
            Some(c) => self.error(format!("Unexpected '{}'", c)),
            None => self.error("Unexpected end of literal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_count_characters() {
        let mut scanner = Scanner::new("E♭4");
        assert!(scanner.eat('E'));
        assert!(scanner.eat('♭'));
        assert_eq!(scanner.position(), 2);
        assert_eq!(scanner.take_while(|c| c.is_ascii_digit()), "4");
        assert!(scanner.is_done());
    }

    #[test]
    fn test_eat_str_and_reset() {
        let mut scanner = Scanner::new("phi@4");
        assert!(!scanner.eat_str("psi"));
        assert!(scanner.eat_str("phi"));
        assert_eq!(scanner.peek(), Some('@'));
        scanner.reset(0);
        assert_eq!(scanner.peek(), Some('p'));
        assert!(matches!(
            scanner.unexpected(),
            IntervalError::Parse { position: 0, .. }
        ));
    }
}

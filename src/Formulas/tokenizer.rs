//! # Tokenizer Module
//!
//! ## Aim
//! Turns a formula string into a lazy stream of lexical tokens with byte
//! positions, for the recursive-descent parser. A token is an element name
//! (`[A-Za-z][a-z]*`), a digit run (`[0-9]+`) or one of the single symbols
//! `+ - ^ = ( )`; spaces and tabs between tokens are skipped silently, any
//! other character is reported as `Invalid symbol` at its offset.

use crate::Formulas::parser::SyntaxError;
use regex::Regex;

/// Cursor-carrying token stream over a formula string.
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    token_re: Regex,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        // alternation order sets the match priority: name, digit run, symbol
        let token_re = Regex::new(r"^(?:[A-Za-z][a-z]*|[0-9]+|[+\-^=()])").unwrap();
        let mut tokenizer = Self {
            src,
            pos: 0,
            token_re,
        };
        tokenizer.skip_spaces();
        tokenizer
    }

    /// Byte offset of the next token in the original string.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the next token without consuming it, or `None` at end of input.
    pub fn peek(&self) -> Result<Option<&'a str>, SyntaxError> {
        if self.pos == self.src.len() {
            return Ok(None);
        }
        let src = self.src;
        let rest = &src[self.pos..];
        match self.token_re.find(rest) {
            Some(found) => Ok(Some(&rest[..found.end()])),
            None => Err(SyntaxError::new("Invalid symbol", self.pos)),
        }
    }

    /// Consumes and returns the next token, advancing past trailing whitespace.
    pub fn take(&mut self) -> Result<&'a str, SyntaxError> {
        match self.peek()? {
            Some(token) => {
                self.pos += token.len();
                self.skip_spaces();
                Ok(token)
            }
            None => Err(SyntaxError::new("Advancing beyond last token", self.pos)),
        }
    }

    /// Consumes the next token and checks that it equals `expected`.
    pub fn consume(&mut self, expected: &str) -> Result<(), SyntaxError> {
        let start = self.pos;
        let token = self.take()?;
        if token != expected {
            return Err(SyntaxError::new("Token mismatch", start));
        }
        Ok(())
    }

    fn skip_spaces(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && (bytes[self.pos] == b' ' || bytes[self.pos] == b'\t') {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_stream() {
        let mut tok = Tokenizer::new("H2 + O2 = H2O");
        assert_eq!(tok.peek(), Ok(Some("H")));
        assert_eq!(tok.take(), Ok("H"));
        assert_eq!(tok.take(), Ok("2"));
        assert_eq!(tok.peek(), Ok(Some("+")));
        assert_eq!(tok.take(), Ok("+"));
        assert_eq!(tok.take(), Ok("O"));
        assert_eq!(tok.take(), Ok("2"));
        assert!(tok.consume("=").is_ok());
        assert_eq!(tok.take(), Ok("H"));
        assert_eq!(tok.take(), Ok("2"));
        assert_eq!(tok.take(), Ok("O"));
        assert_eq!(tok.peek(), Ok(None));
    }

    #[test]
    fn test_longest_match_priority() {
        let mut tok = Tokenizer::new("Uuq16Na");
        assert_eq!(tok.take(), Ok("Uuq"));
        assert_eq!(tok.take(), Ok("16"));
        assert_eq!(tok.take(), Ok("Na"));
        assert_eq!(tok.peek(), Ok(None));
    }

    #[test]
    fn test_position_tracking() {
        let mut tok = Tokenizer::new("  H2O");
        // leading whitespace is skipped at construction
        assert_eq!(tok.position(), 2);
        tok.take().unwrap();
        assert_eq!(tok.position(), 3);
        tok.take().unwrap();
        assert_eq!(tok.position(), 4);
    }

    #[test]
    fn test_whitespace_between_tokens() {
        let mut tok = Tokenizer::new("H \t2");
        assert_eq!(tok.take(), Ok("H"));
        assert_eq!(tok.position(), 3);
        assert_eq!(tok.take(), Ok("2"));
    }

    #[test]
    fn test_invalid_symbol_carries_offset() {
        let mut tok = Tokenizer::new("H2?");
        tok.take().unwrap();
        tok.take().unwrap();
        let err = tok.peek().unwrap_err();
        assert_eq!(err.message, "Invalid symbol");
        assert_eq!(err.start, 2);
    }

    #[test]
    fn test_take_past_end() {
        let mut tok = Tokenizer::new("H");
        tok.take().unwrap();
        let err = tok.take().unwrap_err();
        assert_eq!(err.message, "Advancing beyond last token");
    }

    #[test]
    fn test_consume_mismatch() {
        let mut tok = Tokenizer::new("H");
        let err = tok.consume("=").unwrap_err();
        assert_eq!(err.message, "Token mismatch");
    }
}

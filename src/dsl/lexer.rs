//! Lexer (tokenizer) for the scenario DSL.

use crate::error::{DilutionError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text (string literals without their quotes)
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier (entry keyword, holder id, parameter name)
    Identifier,
    /// A number, possibly with `$` prefix and magnitude suffix
    Number,
    /// A double-quoted display name
    Str,
    /// A directive (starts with '.')
    Directive,
    /// Equals sign '='
    Equals,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing scenario DSL input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => return Ok(token(TokenKind::Eof, String::new())),
        };

        match ch {
            '\n' => {
                self.advance();
                Ok(token(TokenKind::Newline, "\n".to_string()))
            }
            '.' => {
                self.advance();
                let name = self.read_identifier();
                if name.is_empty() {
                    return Err(DilutionError::lexer(line, column, "expected directive name after '.'"));
                }
                Ok(token(TokenKind::Directive, format!(".{}", name)))
            }
            '=' => {
                self.advance();
                Ok(token(TokenKind::Equals, "=".to_string()))
            }
            '"' => {
                self.advance();
                let text = self.read_string(line, column)?;
                Ok(token(TokenKind::Str, text))
            }
            '-' | '+' | '$' | '0'..='9' => Ok(token(TokenKind::Number, self.read_number())),
            _ if ch.is_alphabetic() || ch == '_' => {
                Ok(token(TokenKind::Identifier, self.read_identifier()))
            }
            _ => Err(DilutionError::lexer(
                line,
                column,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                // Skip comment until end of line
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.chars.peek().copied() {
                Some('"') => {
                    self.advance();
                    return Ok(text);
                }
                Some('\n') | None => {
                    return Err(DilutionError::lexer(line, column, "unterminated string"));
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();

        // Optional sign
        if let Some(&ch) = self.chars.peek() {
            if ch == '-' || ch == '+' {
                text.push(ch);
                self.advance();
            }
        }

        // Optional currency marker
        if let Some(&'$') = self.chars.peek() {
            text.push('$');
            self.advance();
        }

        // Integer part
        self.read_digits(&mut text);

        // Decimal part
        if let Some(&'.') = self.chars.peek() {
            text.push('.');
            self.advance();
            self.read_digits(&mut text);
        }

        // Exponent part
        if let Some(&ch) = self.chars.peek() {
            if ch == 'e' || ch == 'E' {
                text.push(ch);
                self.advance();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '-' || sign == '+' {
                        text.push(sign);
                        self.advance();
                    }
                }
                self.read_digits(&mut text);
            }
        }

        // Magnitude suffix (k, M, B)
        if let Some(&ch) = self.chars.peek() {
            if matches!(ch, 'k' | 'K' | 'M' | 'B' | 'G') {
                text.push(ch);
                self.advance();
            }
        }

        text
    }
}

/// Parse a number string with optional `$` marker, `_` separators and
/// magnitude suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let (sign, rest) = match text.chars().next()? {
        '-' => (-1.0, &text[1..]),
        '+' => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);

    let (num_str, multiplier) = match rest.chars().last()? {
        'k' | 'K' => (&rest[..rest.len() - 1], 1e3),
        'M' => (&rest[..rest.len() - 1], 1e6),
        'B' | 'G' => (&rest[..rest.len() - 1], 1e9),
        _ => (rest, 1.0),
    };

    let digits: String = num_str.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() || !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    digits.parse::<f64>().ok().map(|v| sign * v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("10k"), Some(10_000.0));
        assert_eq!(parse_value("1M"), Some(1_000_000.0));
        assert_eq!(parse_value("$2.5M"), Some(2_500_000.0));
        assert_eq!(parse_value("1_250_000"), Some(1_250_000.0));
        assert_eq!(parse_value("-$300k"), Some(-300_000.0));
        assert_eq!(parse_value("1.2B"), Some(1_200_000_000.0));
        assert_eq!(parse_value("1e6"), Some(1_000_000.0));
        assert_eq!(parse_value("80"), Some(80.0));
        assert_eq!(parse_value("$"), None);
        assert_eq!(parse_value("-"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn test_lexer_entry() {
        let input = "SAFE angel \"Angel Syndicate\" 250k cap=$5M";
        let mut lexer = Lexer::new(input);

        let kinds: Vec<(TokenKind, String)> = std::iter::from_fn(|| {
            let tok = lexer.next_token().unwrap();
            (tok.kind != TokenKind::Eof).then_some((tok.kind, tok.text))
        })
        .collect();

        assert_eq!(
            kinds,
            vec![
                (TokenKind::Identifier, "SAFE".to_string()),
                (TokenKind::Identifier, "angel".to_string()),
                (TokenKind::Str, "Angel Syndicate".to_string()),
                (TokenKind::Number, "250k".to_string()),
                (TokenKind::Identifier, "cap".to_string()),
                (TokenKind::Equals, "=".to_string()),
                (TokenKind::Number, "$5M".to_string()),
            ]
        );
    }

    #[test]
    fn test_lexer_directive_and_lines() {
        let input = "# header\n.round post 11M\n";
        let mut lexer = Lexer::new(input);

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Newline);

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Directive);
        assert_eq!(tok.text, ".round");
        assert_eq!(tok.line, 2);
        assert_eq!(tok.column, 1);
    }

    #[test]
    fn test_lexer_errors() {
        let mut lexer = Lexer::new("SAFE a \"unterminated\n");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        assert!(matches!(
            lexer.next_token(),
            Err(DilutionError::LexerError { line: 1, column: 8, .. })
        ));

        let mut lexer = Lexer::new("INVESTOR a 1M @");
        for _ in 0..3 {
            lexer.next_token().unwrap();
        }
        assert!(matches!(lexer.next_token(), Err(DilutionError::LexerError { .. })));
    }
}

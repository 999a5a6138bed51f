//! Lexer (tokenizer) for the gate-level Verilog subset.

use tracing::trace;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the netlist subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier (keyword, gate type, instance or signal name)
    Identifier,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// Comma ','
    Comma,
    /// Statement terminator ';'
    Semicolon,
    /// End of file
    Eof,
}

/// Lexer for tokenizing netlist source text.
///
/// Line comments (`//`) run to the end of the line. Characters outside the
/// subset are skipped rather than rejected, so lexing never fails.
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
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            let ch = match self.chars.peek().copied() {
                Some(ch) => ch,
                None => return self.token(TokenKind::Eof, String::new(), self.line, self.column),
            };

            let start_line = self.line;
            let start_column = self.column;

            let kind = match ch {
                '(' => Some(TokenKind::OpenParen),
                ')' => Some(TokenKind::CloseParen),
                ',' => Some(TokenKind::Comma),
                ';' => Some(TokenKind::Semicolon),
                _ => None,
            };

            if let Some(kind) = kind {
                self.advance();
                return self.token(kind, ch.to_string(), start_line, start_column);
            }

            if is_identifier_char(ch) {
                let text = self.read_identifier();
                return self.token(TokenKind::Identifier, text, start_line, start_column);
            }

            trace!(line = start_line, column = start_column, "skipping character {:?}", ch);
            self.advance();
        }
    }

    fn token(&self, kind: TokenKind, text: String, line: usize, column: usize) -> Token {
        Token {
            kind,
            text,
            line,
            column,
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
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.second_char_is('/') {
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

    fn second_char_is(&self, expected: char) -> bool {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        lookahead.next() == Some(expected)
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if is_identifier_char(ch) {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn test_lexer_gate_instance() {
        let mut lexer = Lexer::new("nand NAND2_1 (N10, N1, N3);");

        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text, "nand");

        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text, "NAND2_1");

        assert_eq!(lexer.next_token().kind, TokenKind::OpenParen);
        assert_eq!(lexer.next_token().text, "N10");
        assert_eq!(lexer.next_token().kind, TokenKind::Comma);
    }

    #[test]
    fn test_lexer_skips_comments() {
        let input = "// header comment\n\n   // indented\ninput a; // trailing\n";
        assert_eq!(
            kinds(input),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Semicolon]
        );
    }

    #[test]
    fn test_lexer_tracks_lines() {
        let mut lexer = Lexer::new("module m;\n\n  wire w;");
        lexer.next_token();
        lexer.next_token();
        lexer.next_token();
        let tok = lexer.next_token();
        assert_eq!(tok.text, "wire");
        assert_eq!(tok.line, 3);
        assert_eq!(tok.column, 3);
    }

    #[test]
    fn test_lexer_ignores_unknown_characters() {
        // Bus ranges are outside the subset; they must not abort lexing.
        let tokens: Vec<String> = Lexer::new("wire [3:0] w;").map(|t| t.text).collect();
        assert_eq!(tokens, vec!["wire", "3", "0", "w", ";"]);
    }

    #[test]
    fn test_single_slash_is_not_a_comment() {
        assert_eq!(kinds("a / b"), vec![TokenKind::Identifier, TokenKind::Identifier]);
    }
}

//! Statement parser for the netlist subset.

use tracing::{debug, warn};

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{NetpathError, Result};

/// Parser for gate-level netlists.
///
/// The source is split into `;`-terminated statements (`endmodule` also ends a
/// statement). Each statement is classified by its leading keyword; anything
/// that is neither a declaration nor a well-formed gate instantiation is
/// skipped.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

/// Which declaration block a statement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Declaration {
    Input,
    Output,
    Wire,
}

impl Declaration {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            "wire" => Some(Self::Wire),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Wire => "wire",
        }
    }
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parse the entire netlist into a module AST.
    pub fn parse(&mut self) -> Result<ModuleAst> {
        let mut header: Option<(String, Vec<String>)> = None;
        let mut inputs: Option<Vec<String>> = None;
        let mut outputs: Option<Vec<String>> = None;
        let mut wires: Option<Vec<String>> = None;
        let mut gates = Vec::new();

        while self.current.kind != TokenKind::Eof {
            let statement = self.next_statement();
            let Some(first) = statement.first() else {
                continue;
            };
            let line = first.line;

            if first.text == "module" {
                match (parse_module_header(&statement), &header) {
                    (Some(parsed), None) => {
                        debug!(line, module = %parsed.0, "module header");
                        header = Some(parsed);
                    }
                    (Some(parsed), Some(_)) => {
                        warn!(line, module = %parsed.0, "ignoring additional module header");
                    }
                    (None, _) => debug!(line, "skipping malformed module header"),
                }
                continue;
            }

            if let Some(decl) = Declaration::from_keyword(&first.text) {
                let names = parse_name_list(&statement[1..]);
                if names.is_empty() {
                    debug!(line, "skipping empty {} declaration", decl.keyword());
                    continue;
                }
                let slot = match decl {
                    Declaration::Input => &mut inputs,
                    Declaration::Output => &mut outputs,
                    Declaration::Wire => &mut wires,
                };
                if slot.is_some() {
                    warn!(
                        line,
                        "ignoring additional {} block ({} names); only the first block is used",
                        decl.keyword(),
                        names.len()
                    );
                } else {
                    debug!(line, count = names.len(), "{} declaration", decl.keyword());
                    *slot = Some(names);
                }
                continue;
            }

            match parse_gate_instance(&statement) {
                Some(gate) => gates.push(gate),
                None => debug!(line, "skipping unrecognized statement starting with `{}`", first.text),
            }
        }

        let (name, ports) = header.ok_or(NetpathError::ModuleNotFound)?;

        Ok(ModuleAst {
            name,
            ports,
            inputs: inputs.unwrap_or_default(),
            outputs: outputs.unwrap_or_default(),
            wires: wires.unwrap_or_default(),
            gates,
        })
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Collect tokens up to the next `;` or `endmodule`, consuming the terminator.
    fn next_statement(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                TokenKind::Identifier if self.current.text == "endmodule" => {
                    self.advance();
                    break;
                }
                _ => {
                    tokens.push(self.current.clone());
                    self.advance();
                }
            }
        }
        tokens
    }
}

/// `module <name> ( <ports> )`
fn parse_module_header(tokens: &[Token]) -> Option<(String, Vec<String>)> {
    match tokens {
        [_, name, open, rest @ .., close]
            if name.kind == TokenKind::Identifier
                && open.kind == TokenKind::OpenParen
                && close.kind == TokenKind::CloseParen =>
        {
            Some((name.text.clone(), parse_name_list(rest)))
        }
        _ => None,
    }
}

/// `<type> <instance> ( <output> [, <input>]... )`
fn parse_gate_instance(tokens: &[Token]) -> Option<GateInstance> {
    let [gate_type, instance, open, connections @ .., close] = tokens else {
        return None;
    };
    if gate_type.kind != TokenKind::Identifier
        || instance.kind != TokenKind::Identifier
        || open.kind != TokenKind::OpenParen
        || close.kind != TokenKind::CloseParen
    {
        return None;
    }

    // Strict alternation of names and commas, at least one name.
    let mut names = Vec::with_capacity(connections.len() / 2 + 1);
    for (i, tok) in connections.iter().enumerate() {
        let expected = if i % 2 == 0 {
            TokenKind::Identifier
        } else {
            TokenKind::Comma
        };
        if tok.kind != expected {
            return None;
        }
        if expected == TokenKind::Identifier {
            names.push(tok.text.clone());
        }
    }
    if connections.len() % 2 == 0 {
        return None;
    }

    let mut names = names.into_iter();
    let output = names.next()?;

    Some(GateInstance {
        gate_type: gate_type.text.clone(),
        instance: instance.text.clone(),
        output,
        inputs: names.collect(),
        line: gate_type.line,
    })
}

fn parse_name_list(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Identifier)
        .map(|t| t.text.clone())
        .collect()
}

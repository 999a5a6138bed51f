//! Parser for gate-level Verilog netlists.
//!
//! This module reads the restricted, declarative Verilog subset used by the
//! ISCAS-style combinational benchmarks. It is matched statement by statement
//! rather than against a full Verilog grammar.
//!
//! # Accepted Subset
//!
//! ```text
//! netlist     = { statement }
//! statement   = header | declaration | instance | other
//! header      = "module" name "(" [ name { "," name } ] ")" ";"
//! declaration = ("input" | "output" | "wire") name { "," name } ";"
//! instance    = gate_type name "(" name { "," name } ")" ";"
//! other       = any token run up to ";" (skipped)
//!
//! gate_type   = "and" | "or" | "not" | "nand" | "nor" | "xor" | "xnor" | "buf" | "buff"
//! name        = (letter | digit | '_' | '$') { letter | digit | '_' | '$' }
//! ```
//!
//! Gate types are case-insensitive. `//` starts a comment that runs to the end
//! of the line; block comments are not supported. `endmodule` closes the
//! current statement.
//!
//! # Known Limitation
//!
//! Only the first `input`, `output` and `wire` statement is honored. Sources
//! that split declarations over several statements lose the later ones (a
//! warning is logged for each dropped block).
//!
//! # Example
//!
//! ```text
//! module m (a, b, y);
//! input a, b;
//! output y;
//! AND g1 (y, a, b);
//! endmodule
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use std::path::Path;

use crate::circuit::Circuit;
use crate::error::{NetpathError, Result};

/// Parse netlist source text into a module AST.
pub fn parse_module(input: &str) -> Result<ModuleAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse netlist source text into a fully connected, fan-out-normalized circuit.
pub fn parse(input: &str) -> Result<Circuit> {
    Circuit::from_ast(parse_module(input)?)
}

/// Parse a netlist file.
pub fn parse_file(path: &Path) -> Result<Circuit> {
    let content = std::fs::read_to_string(path).map_err(|e| NetpathError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

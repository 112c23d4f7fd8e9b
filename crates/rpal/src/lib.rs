//! A CSE-machine interpreter for RPAL.
//!
//! The pipeline is `lex -> parse -> standardize -> build_control -> Machine`;
//! [`run_source`] wires the whole thing together for callers that just want
//! an answer, while the individual stages stay public for tools (like the
//! CLI's `-ast`/`-sast` flags) that want to stop partway through.

mod ast;
mod control;
mod env;
mod error;
mod format;
mod lexer;
mod machine;
mod ops;
mod parser;
mod standardize;
mod symbol;
mod token;

pub use ast::AstNode;
pub use control::build_control;
pub use error::{RpalError, SourceLoc};
pub use lexer::lex;
pub use machine::Machine;
pub use parser::parse;
pub use standardize::standardize;
pub use token::{Token, TokenKind};

/// Parses `source` into its raw AST, without standardizing it — what the
/// CLI's `-ast` flag prints.
pub fn parse_source(source: &str) -> Result<AstNode, RpalError> {
    parse(&lex(source)?)
}

/// Parses and standardizes `source` — what the CLI's `-sast` flag prints.
pub fn standardize_source(source: &str) -> Result<AstNode, RpalError> {
    standardize(&parse_source(source)?)
}

/// Runs `source` end to end and renders its answer (spec §6 "Public API").
pub fn run_source(source: &str) -> Result<String, RpalError> {
    let standardized = standardize_source(source)?;
    let control = build_control(&standardized)?;
    let mut machine = Machine::new(control);
    machine.run()?;
    Ok(machine.get_answer())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_source_drives_the_whole_pipeline() {
        assert_eq!(run_source("let x = 6 in let y = 7 in x * y").unwrap(), "42");
    }

    #[test]
    fn run_source_surfaces_lex_errors() {
        assert!(run_source("let x = `").is_err());
    }
}

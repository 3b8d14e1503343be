//! GraphQL syntax layer for gschema.
//!
//! This crate provides:
//! - `token`: token kinds and directive locations
//! - `lexer`: tokenization and string literal decoding
//! - `ast`: type-system and executable AST
//! - `parser`: recursive descent parser
//! - `printer`: canonical document printing

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{parse, ParseResult, Parser};
pub use printer::{print, Printer};
pub use token::{DirectiveLocation, Token, TokenKind};

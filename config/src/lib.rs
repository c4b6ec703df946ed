mod ast;
mod document;
mod error;
mod parser;

pub use ast::{AtomDecl, Item, LineDecl, Prop, Script, Setting, Span, Spanned, Value};
pub use document::{load, Colour, Document, EffectStyle, Settings};
pub use error::{format_errors, LoadError, ParseError};

pub fn parse(source: &str) -> (Option<Script>, Vec<ParseError>) {
    parser::parse(source)
}

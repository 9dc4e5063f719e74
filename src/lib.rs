//! A grammar-definition and parsing engine.
//!
//! Grammars are built from a small rule algebra ([`Rule`]): terminals (literal
//! strings, character sets, regular expressions) composed by sequence, ordered
//! choice, greedy repetition, negation and lookahead. Each rule invocation
//! carries a [`Behaviour`], a label plus annotations such as `@void` and
//! `@transient`, which decides what a match contributes to the parse tree.
//!
//! A finished [`Grammar`] parses text into a [`HomogenousTree`], which the
//! structural decoder ([`decode`]) projects onto typed values.
//!
//! Grammars can be written by hand with a [`Resolver`], or in STLR notation
//! and compiled with [`stlr::compile`]:
//!
//! ```text
//! @void ows = .whitespace*
//! list = "[" ows (item ows)* "]"
//! item = .decimalDigit+
//! ```

pub mod annotation;
pub mod charset;
pub mod context;
pub mod decode;
mod display;
pub mod error;
pub mod grammar;
pub mod node;
pub mod optimize;
mod rendering;
pub mod resolve;
pub mod rule;
mod scanner;
pub mod stlr;
mod util;

pub use annotation::{Annotation, AnnotationValue, Annotations, Behaviour, Label};
pub use charset::{CharacterSet, SetName};
pub use context::Context;
pub use decode::{Decode, Encode, Record, Sum};
pub use error::{DecodingError, GrammarError, LanguageError, Span};
pub use grammar::{Definition, Grammar, RuleId};
pub use node::{AbstractSyntaxTreeConstructor, HomogenousTree, Node, ParseIntoError};
pub use optimize::{FoldCharacterSetChoices, InlineIdentifiers, Optimization};
pub use rendering::Rendered;
pub use resolve::Resolver;
pub use rule::{Pattern, Rule, RuleKind, Terminal};
pub use scanner::Token;
pub use util::{normalize_escapes, EscapeError};

#[cfg(test)]
mod tests;

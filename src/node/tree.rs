use crate::annotation::{Annotations, Label};
use crate::decode::Decode;
use crate::error::{DecodingError, LanguageError, Span};
use crate::grammar::Grammar;
use crate::node::Node;
use crate::scanner::Scanner;

/// The result of a whole-input parse: a synthetic root whose children are
/// what the entry rule produced.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HomogenousTree {
    pub root: Node,
}

impl HomogenousTree {
    pub fn children(&self) -> &[Node] { &self.root.children }

    /// The node the entry rule produced, when it produced exactly one.
    pub fn top(&self) -> Option<&Node> {
        match self.root.children.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Decodes the entry rule's node, or the root itself when the entry rule
    /// is transient.
    pub fn decode<T: Decode>(&self) -> Result<T, DecodingError> {
        T::decode(self.top().unwrap_or(&self.root))
    }
}

/// Drives a scan of the grammar's entry rule across the whole input and wraps
/// the result in a root node.
#[derive(Clone, Debug)]
pub struct AbstractSyntaxTreeConstructor<'g> {
    grammar: &'g Grammar,
    root_label: Label,
}

impl<'g> AbstractSyntaxTreeConstructor<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        AbstractSyntaxTreeConstructor { grammar, root_label: Label::from("root") }
    }

    pub fn with_root_label(mut self, label: impl Into<Label>) -> Self {
        self.root_label = label.into();
        self
    }

    pub fn build(&self, source: &str) -> Result<HomogenousTree, LanguageError> {
        let mut scanner = Scanner::new(self.grammar, source);
        let len = scanner.len();
        let (end, children) = match scanner.run(self.grammar.entry(), 0) {
            Ok(matched) => matched,
            Err(err) => return Err(scanner.most_specific(err)),
        };
        if end < len {
            let err = LanguageError::parsing(Span::new(end, len), "Unexpected input");
            return Err(scanner.most_specific(err));
        }
        log::debug!("parsed {} characters into {} top-level nodes", len, children.len());

        let span = Span::new(0, len);
        Ok(HomogenousTree {
            root: Node {
                label: self.root_label.clone(),
                span,
                matched: source.to_string(),
                children,
                annotations: Annotations::new(),
            },
        })
    }
}

impl Grammar {
    /// Parses all of `source` with the entry rule.
    pub fn parse(&self, source: &str) -> Result<HomogenousTree, LanguageError> {
        AbstractSyntaxTreeConstructor::new(self).build(source)
    }

    /// Parses `source` and decodes the tree into `T`.
    pub fn parse_into<T: Decode>(&self, source: &str) -> Result<T, ParseIntoError> {
        Ok(self.parse(source)?.decode()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseIntoError {
    #[error(transparent)]
    Language(#[from] LanguageError),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
}

#[cfg(test)]
#[path = "../tests/tree.rs"]
mod tests_for_tree;

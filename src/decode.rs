//! Structural decoding: projecting a [`HomogenousTree`](crate::HomogenousTree)
//! onto typed values, and back.
//!
//! A type describes its shape by implementing [`Decode`], usually in terms of
//! the two helpers here. A [`Record`] looks its fields up among the children of
//! a node by label. A [`Sum`] tries its alternatives in the order they are
//! listed and takes the first that decodes: when two alternatives could both
//! decode the same node, the more specific one has to be listed first.

use crate::error::{DecodingError, Span};
use crate::node::Node;

pub trait Decode: Sized {
    fn decode(node: &Node) -> Result<Self, DecodingError>;
}

/// The inverse of [`Decode`]: rebuilds the tree fragment a value was decoded
/// from, under the given label. Spans are not reconstructed.
pub trait Encode {
    fn encode(&self, label: &str) -> Node;
}

/// The fields of a node, looked up by label.
pub struct Record<'n> {
    node: &'n Node,
    type_name: &'static str,
}

impl<'n> Record<'n> {
    pub fn new(node: &'n Node, type_name: &'static str) -> Self { Record { node, type_name } }

    pub fn node(&self) -> &'n Node { self.node }
    pub fn span(&self) -> Span { self.node.span }

    pub fn required<T: Decode>(&self, field: &str) -> Result<T, DecodingError> {
        match self.node.child(field) {
            Some(child) => T::decode(child),
            None => Err(DecodingError::ValueNotFound { field: field.to_string(), type_name: self.type_name }),
        }
    }

    pub fn optional<T: Decode>(&self, field: &str) -> Result<Option<T>, DecodingError> {
        self.node.child(field).map(T::decode).transpose()
    }

    /// Every child labelled `field`, in tree order.
    pub fn sequence<T: Decode>(&self, field: &str) -> Result<Vec<T>, DecodingError> {
        self.node.children_labelled(field).map(T::decode).collect()
    }

    /// Whether a child labelled `field` is present at all.
    pub fn flag(&self, field: &str) -> bool { self.node.has_child(field) }
}

/// Alternatives tried in order; see the module documentation.
pub struct Sum<'n, T> {
    node: &'n Node,
    type_name: &'static str,
    attempted: Vec<String>,
    decoded: Option<T>,
}

impl<'n, T> Sum<'n, T> {
    pub fn new(node: &'n Node, type_name: &'static str) -> Self {
        Sum { node, type_name, attempted: vec![], decoded: None }
    }

    /// An alternative that decodes the node itself.
    pub fn or(mut self, name: &str, f: impl FnOnce(&'n Node) -> Result<T, DecodingError>) -> Self {
        if self.decoded.is_none() {
            self.attempted.push(name.to_string());
            if let Ok(value) = f(self.node) {
                self.decoded = Some(value);
            }
        }
        self
    }

    /// An alternative that applies when the node has a child labelled
    /// `label`, decoding that child.
    pub fn or_child(self, label: &str, f: impl FnOnce(&'n Node) -> Result<T, DecodingError>) -> Self {
        let node = self.node;
        self.or(label, |_| match node.child(label) {
            Some(child) => f(child),
            None => Err(DecodingError::ValueNotFound { field: label.to_string(), type_name: "" }),
        })
    }

    /// An alternative that applies when the node itself is labelled `label`.
    pub fn or_labelled(self, label: &str, f: impl FnOnce(&'n Node) -> Result<T, DecodingError>) -> Self {
        self.or(label, |n| {
            if n.label == label { f(n) } else {
                Err(DecodingError::TypeMismatch { type_name: "", found: n.label.to_string(), span: n.span })
            }
        })
    }

    pub fn end(self) -> Result<T, DecodingError> {
        match self.decoded {
            Some(value) => Ok(value),
            None => Err(DecodingError::NoAlternative { type_name: self.type_name, attempted: self.attempted }),
        }
    }
}

/// Decodes a node whose text is one of a closed set of spellings.
pub fn spelled<T: Clone>(node: &Node, type_name: &'static str, spellings: &[(&str, T)]) -> Result<T, DecodingError> {
    spellings.iter()
        .find(|(s, _)| *s == node.matched)
        .map(|(_, value)| value.clone())
        .ok_or_else(|| DecodingError::TypeMismatch { type_name, found: node.matched.clone(), span: node.span })
}

/// A node with the given children, standing for the text they were matched from.
pub fn composite(label: &str, children: Vec<Node>) -> Node {
    let matched: String = children.iter().map(|c| c.matched.as_str()).collect();
    Node::new(label, Span::default(), matched).with_children(children)
}

impl Decode for Node {
    fn decode(node: &Node) -> Result<Self, DecodingError> { Ok(node.clone()) }
}

impl Decode for String {
    fn decode(node: &Node) -> Result<Self, DecodingError> { Ok(node.matched.clone()) }
}

impl Decode for i64 {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        node.matched.trim().parse().map_err(|_| DecodingError::TypeMismatch {
            type_name: "i64",
            found: node.matched.clone(),
            span: node.span,
        })
    }
}

impl Decode for bool {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        spelled(node, "bool", &[("true", true), ("false", false)])
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(node: &Node) -> Result<Self, DecodingError> { T::decode(node).map(Box::new) }
}

impl Encode for String {
    fn encode(&self, label: &str) -> Node { Node::new(label, Span::default(), self.as_str()) }
}

impl Encode for i64 {
    fn encode(&self, label: &str) -> Node { Node::new(label, Span::default(), self.to_string()) }
}

impl Encode for bool {
    fn encode(&self, label: &str) -> Node { Node::new(label, Span::default(), self.to_string()) }
}

impl<T: Encode> Encode for Box<T> {
    fn encode(&self, label: &str) -> Node { self.as_ref().encode(label) }
}

#[cfg(test)]
#[path = "tests/decode.rs"]
mod tests_for_decode;

use crate::annotation::{Annotations, Label};
use crate::error::Span;

mod tree;

pub use tree::{AbstractSyntaxTreeConstructor, HomogenousTree, ParseIntoError};

/// One produced element of a parse: what was matched, where, and the elements
/// produced inside it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Node {
    pub label: Label,
    /// In scalar offsets.
    pub span: Span,
    pub matched: String,
    pub children: Vec<Node>,
    /// Custom annotations of the rule that produced the node.
    pub annotations: Annotations,
}

impl Node {
    pub fn new(label: impl Into<Label>, span: Span, matched: impl Into<String>) -> Node {
        Node { label: label.into(), span, matched: matched.into(), children: vec![], annotations: Annotations::new() }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Node {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool { self.children.is_empty() }

    /// The first child labelled `label`.
    pub fn child(&self, label: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.label == label)
    }

    /// Every child labelled `label`, in order of appearance.
    pub fn children_labelled<'a>(&'a self, label: &'a str) -> impl Iterator<Item=&'a Node> + 'a {
        self.children.iter().filter(move |c| c.label == label)
    }

    pub fn has_child(&self, label: &str) -> bool { self.child(label).is_some() }

    /// The node and all of its descendants, parents before children.
    pub fn preorder(&self) -> Vec<&Node> {
        let mut accum = vec![];
        self.collect_preorder(&mut accum);
        accum
    }

    fn collect_preorder<'a>(&'a self, accum: &mut Vec<&'a Node>) {
        accum.push(self);
        for c in &self.children {
            c.collect_preorder(accum);
        }
    }

    /// The first descendant (or the node itself) labelled `label`.
    pub fn find(&self, label: &str) -> Option<&Node> {
        self.preorder().into_iter().find(|n| n.label == label)
    }
}

// notation: leaves as `label"text"`, interior nodes as `label(child child)`

impl std::fmt::Display for Node {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.children.is_empty() {
            return write!(w, "{}{:?}", self.label, self.matched);
        }
        write!(w, "{}(", self.label)?;
        for (i, c) in self.children.iter().enumerate() {
            if i > 0 { write!(w, " ")?; }
            write!(w, "{}", c)?;
        }
        write!(w, ")")
    }
}

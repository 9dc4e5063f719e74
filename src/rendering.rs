use crate::error::LanguageError;
use crate::node::{HomogenousTree, Node};
use crate::scanner::Token;

/// A plain-text rendering for snapshots and debugging.
pub trait Rendered {
    fn rendered(&self) -> String;
}

// trees as an indented outline, one node per line: leaves show their text

impl Rendered for Node {
    fn rendered(&self) -> String {
        let mut accum = String::new();
        outline(self, 0, &mut accum);
        accum
    }
}

fn outline(node: &Node, depth: usize, accum: &mut String) {
    accum.push_str(&"  ".repeat(depth));
    accum.push_str(node.label.as_str());
    if node.is_leaf() {
        accum.push_str(&format!(" {:?}", node.matched));
    }
    accum.push('\n');
    for c in &node.children {
        outline(c, depth + 1, accum);
    }
}

impl Rendered for HomogenousTree {
    fn rendered(&self) -> String { self.root.rendered() }
}

impl Rendered for [Token] {
    fn rendered(&self) -> String {
        self.iter()
            .map(|t| format!("{}{}@{} {:?}\n", "  ".repeat(t.depth), t.label, t.offset, t.matched))
            .collect()
    }
}

impl Rendered for [LanguageError] {
    fn rendered(&self) -> String {
        self.iter().map(|e| format!("{}\n", e)).collect()
    }
}

impl<T: Rendered> Rendered for Result<T, LanguageError> {
    fn rendered(&self) -> String {
        match self {
            Ok(t) => t.rendered(),
            Err(e) => format!("error: {}", e),
        }
    }
}

use std::collections::{HashMap, HashSet};

use cranelift_entity::{entity_impl, PrimaryMap};

use crate::error::Span;
use crate::rule::Rule;

// A grammar is an ordered sequence of named rules; the first one is the entry
// point for whole-input parses. Rules are kept in an arena and refer to each
// other by index, which is what makes self-reference possible.

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RuleId(u32);

entity_impl! { RuleId }

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Definition {
    pub name: String,
    pub rule: Rule,
    /// Where the rule was defined, for grammars compiled from text.
    pub span: Option<Span>,
}

/// A finished grammar. Every reference in it is bound; it is never mutated
/// while scanning and can be shared freely between scans.
#[derive(Clone, Debug)]
pub struct Grammar {
    pub(crate) definitions: PrimaryMap<RuleId, Definition>,
    pub(crate) names: HashMap<String, RuleId>,
    /// The rules in the order they were declared; the first is the entry rule.
    pub(crate) top_level: Vec<RuleId>,
}

impl Grammar {
    pub fn entry(&self) -> RuleId {
        // `Resolver::finish` refuses to build an empty grammar
        self.top_level[0]
    }

    pub fn top_level(&self) -> &[RuleId] { &self.top_level }

    pub fn definition(&self, id: RuleId) -> &Definition { &self.definitions[id] }
    pub fn rule(&self, id: RuleId) -> &Rule { &self.definitions[id].rule }
    pub fn name(&self, id: RuleId) -> &str { &self.definitions[id].name }

    pub fn rule_mut(&mut self, id: RuleId) -> &mut Rule { &mut self.definitions[id].rule }

    pub fn id_of(&self, name: &str) -> Option<RuleId> { self.names.get(name).copied() }

    pub fn rule_named(&self, name: &str) -> Option<&Rule> {
        self.id_of(name).map(|id| self.rule(id))
    }

    pub fn ids(&self) -> impl Iterator<Item=RuleId> + '_ { self.definitions.keys() }

    pub fn len(&self) -> usize { self.definitions.len() }
    pub fn is_empty(&self) -> bool { self.definitions.is_empty() }

    /// Every rule that can be reached by following references from `from`,
    /// including `from` itself.
    pub fn reachable_from(&self, from: RuleId) -> HashSet<RuleId> {
        let mut seen = HashSet::new();
        let mut queue = vec![from];
        while let Some(id) = queue.pop() {
            if seen.insert(id) {
                queue.extend(self.rule(id).references());
            }
        }
        seen
    }

    /// Whether the rule can reach itself through references.
    pub fn is_recursive(&self, id: RuleId) -> bool {
        self.rule(id).references().into_iter().any(|r| self.reachable_from(r).contains(&id))
    }
}

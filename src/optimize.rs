//! Rewrite passes applied to a grammar before it is used. A pass never changes
//! what a grammar matches or the tree it produces.

use std::collections::HashMap;

use crate::charset::CharacterSet;
use crate::grammar::{Grammar, RuleId};
use crate::rule::{Rule, RuleKind, Terminal};

pub trait Optimization: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Rewrites `grammar` in place; returns whether anything changed.
    fn optimize(&self, grammar: &mut Grammar) -> bool;
}

/// Replaces references to rules whose body is a single terminal with a copy of
/// that terminal. The annotations carried by the reference are kept, and win
/// over those of the rule it names.
///
/// References inside `!` and `>>` predicates are left alone, so that
/// descriptions of predicates keep naming the rule they test.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineIdentifiers;

impl Optimization for InlineIdentifiers {
    fn name(&self) -> &'static str { "inline-identifiers" }

    fn optimize(&self, grammar: &mut Grammar) -> bool {
        let terminals: HashMap<RuleId, Rule> = grammar.ids()
            .filter(|&id| grammar.rule(id).is_terminal())
            .map(|id| (id, grammar.rule(id).clone()))
            .collect();
        if terminals.is_empty() {
            return false;
        }

        let mut changed = false;
        for definition in grammar.definitions.values_mut() {
            changed |= inline(&mut definition.rule, &terminals);
        }
        changed
    }
}

fn inline(rule: &mut Rule, terminals: &HashMap<RuleId, Rule>) -> bool {
    match &rule.kind {
        RuleKind::Not(_) | RuleKind::Lookahead(_) => return false,
        RuleKind::Reference(id) => {
            if let Some(target) = terminals.get(id) {
                let behaviour = target.behaviour.overlay(&rule.behaviour);
                *rule = Rule { kind: target.kind.clone(), behaviour };
                return true;
            }
            return false;
        }
        _ => {}
    }
    let mut changed = false;
    for child in rule.children_mut() {
        changed |= inline(child, terminals);
    }
    changed
}

/// Collapses a choice between single characters and character sets into one
/// character set containing every alternative.
///
/// Only plain alternatives are folded: one that is labelled or annotated
/// produces something of its own and has to stay a separate alternative.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldCharacterSetChoices;

impl Optimization for FoldCharacterSetChoices {
    fn name(&self) -> &'static str { "fold-character-set-choices" }

    fn optimize(&self, grammar: &mut Grammar) -> bool {
        let mut changed = false;
        for definition in grammar.definitions.values_mut() {
            changed |= fold(&mut definition.rule);
        }
        changed
    }
}

fn fold(rule: &mut Rule) -> bool {
    let mut changed = false;
    for child in rule.children_mut() {
        changed |= fold(child);
    }
    if let RuleKind::Choice(alternatives) = &rule.kind {
        if let Some(set) = foldable(alternatives) {
            rule.kind = RuleKind::Terminal(Terminal::Set(set));
            changed = true;
        }
    }
    changed
}

fn foldable(alternatives: &[Rule]) -> Option<CharacterSet> {
    if alternatives.len() < 2 {
        return None;
    }
    let mut sets = Vec::with_capacity(alternatives.len());
    for alternative in alternatives {
        match &alternative.kind {
            RuleKind::Terminal(t) if alternative.behaviour.is_plain() => sets.push(t.as_single_char_set()?),
            _ => return None,
        }
    }
    Some(CharacterSet::Union(sets))
}

#[cfg(test)]
#[path = "tests/optimize.rs"]
mod tests_for_optimize;

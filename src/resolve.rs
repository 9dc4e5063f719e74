//! Building grammars whose rules refer to each other, or to themselves.
//!
//! Construction is two-phase. A name is first *declared*, which allocates its
//! slot in the arena and hands out a [`RuleId`] that other rules can reference
//! right away. The body is *defined* later, exactly once. [`Resolver::finish`]
//! freezes the arena into a [`Grammar`] and refuses if any declared slot was
//! never defined.

use std::collections::{HashMap, HashSet};

use cranelift_entity::PrimaryMap;

use crate::error::{GrammarError, Span};
use crate::grammar::{Definition, Grammar, RuleId};
use crate::rule::Rule;

#[derive(Debug)]
struct Slot {
    name: String,
    rule: Option<Rule>,
    span: Option<Span>,
}

/// The placeholder cache of one grammar construction.
#[derive(Debug, Default)]
pub struct Resolver {
    slots: PrimaryMap<RuleId, Slot>,
    names: HashMap<String, RuleId>,
    /// Rules whose body is being built by `recursive`.
    building: HashSet<RuleId>,
}

impl Resolver {
    pub fn new() -> Self { Resolver::default() }

    /// The id for `name`, allocating a placeholder the first time it is seen.
    pub fn declare(&mut self, name: &str) -> RuleId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = self.slots.push(Slot { name: name.to_string(), rule: None, span: None });
        self.names.insert(name.to_string(), id);
        id
    }

    pub fn id_of(&self, name: &str) -> Option<RuleId> { self.names.get(name).copied() }

    pub fn is_defined(&self, id: RuleId) -> bool { self.slots[id].rule.is_some() }

    pub fn name(&self, id: RuleId) -> &str { &self.slots[id].name }

    pub fn body(&self, id: RuleId) -> Option<&Rule> { self.slots[id].rule.as_ref() }

    pub fn span(&self, id: RuleId) -> Option<Span> { self.slots[id].span }

    /// Binds the body of a declared rule. A rule is never rebound.
    pub fn define(&mut self, id: RuleId, rule: Rule) -> Result<(), GrammarError> {
        let slot = &mut self.slots[id];
        if slot.rule.is_some() {
            return Err(GrammarError::Rebound(slot.name.clone()));
        }
        slot.rule = Some(rule);
        Ok(())
    }

    pub fn define_at(&mut self, id: RuleId, rule: Rule, span: Span) -> Result<(), GrammarError> {
        self.define(id, rule)?;
        self.slots[id].span = Some(span);
        Ok(())
    }

    /// Replaces the body of a rule that is already defined, as when a later
    /// definition extends an earlier one.
    pub(crate) fn redefine(&mut self, id: RuleId, rule: Rule) {
        self.slots[id].rule = Some(rule);
    }

    /// Declares and defines `name` in one step; the rule is labelled with its
    /// own name.
    pub fn rule(&mut self, name: &str, rule: Rule) -> Result<RuleId, GrammarError> {
        let id = self.declare(name);
        let rule = if rule.behaviour.label.is_none() { rule.labelled(name) } else { rule };
        self.define(id, rule)?;
        Ok(id)
    }

    /// A reference to `name`, whether or not it has been defined yet.
    pub fn reference(&mut self, name: &str) -> Rule {
        Rule::reference(self.declare(name))
    }

    /// A reference to `name`. If the rule is neither defined nor being built
    /// already, its body is built by `build`, which may itself ask for `name`
    /// again and gets the placeholder back instead of recursing forever.
    pub fn recursive(
        &mut self,
        name: &str,
        build: impl FnOnce(&mut Resolver) -> Result<Rule, GrammarError>,
    ) -> Result<Rule, GrammarError> {
        if let Some(id) = self.id_of(name) {
            if self.is_defined(id) || self.building.contains(&id) {
                return Ok(Rule::reference(id));
            }
        }
        let id = self.declare(name);
        self.building.insert(id);
        let body = build(self);
        self.building.remove(&id);
        self.define(id, body?.labelled(name))?;
        Ok(Rule::reference(id))
    }

    /// Freezes the arena. `entry` names the rules in order, the first being
    /// the entry rule; when it is empty, declaration order is used.
    pub fn finish(mut self, entry: &[&str]) -> Result<Grammar, GrammarError> {
        let mut top_level = Vec::new();
        for name in entry {
            match self.names.get(*name) {
                Some(&id) => top_level.push(id),
                None => return Err(GrammarError::UnknownRule(name.to_string())),
            }
        }
        if top_level.is_empty() {
            top_level = self.slots.keys().collect();
        }
        if top_level.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut definitions = PrimaryMap::with_capacity(self.slots.len());
        for slot in self.slots.values_mut() {
            let name = std::mem::take(&mut slot.name);
            match slot.rule.take() {
                Some(rule) => { definitions.push(Definition { name, rule, span: slot.span }); }
                None => return Err(GrammarError::Unbound(name)),
            }
        }
        log::debug!("resolved grammar of {} rules", definitions.len());
        Ok(Grammar { definitions, names: self.names, top_level })
    }
}

#[cfg(test)]
#[path = "tests/resolve.rs"]
mod tests_for_resolve;

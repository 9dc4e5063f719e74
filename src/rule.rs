//! The rule algebra: terminals and the combinators that compose them.
//!
//! Every rule is a tree of [`RuleKind`]s, each carrying a [`Behaviour`] that says
//! what a successful match produces. Rules reference other rules of the same
//! grammar through a [`RuleId`], which is how recursion is expressed; see
//! [`crate::resolve`].

use crate::annotation::{Annotation, AnnotationValue, Behaviour, Label};
use crate::charset::CharacterSet;
use crate::error::GrammarError;
use crate::grammar::RuleId;

/// A regular expression terminal. Matching is always anchored at the current
/// position.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    anchored: regex::Regex,
}

impl Pattern {
    pub(crate) fn compile(source: &str) -> Result<Pattern, GrammarError> {
        // checked on its own first, so that errors point into what was written
        let malformed = |err: regex::Error| GrammarError::MalformedPattern { pattern: source.to_string(), source: err };
        regex::Regex::new(source).map_err(malformed)?;
        let anchored = regex::Regex::new(&format!("^(?:{})", source)).map_err(malformed)?;
        Ok(Pattern { source: source.to_string(), anchored })
    }

    pub fn source(&self) -> &str { &self.source }

    /// The byte length of the match at the start of `input`, if any.
    pub(crate) fn match_len(&self, input: &str) -> Option<usize> {
        self.anchored.find(input).map(|m| m.end())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool { self.source == other.source }
}

impl Eq for Pattern {}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Terminal {
    Literal(String),
    Set(CharacterSet),
    Pattern(Pattern),
}

impl Terminal {
    /// A terminal that always matches exactly one character: a character set
    /// or a one-character literal.
    pub(crate) fn as_single_char_set(&self) -> Option<CharacterSet> {
        match self {
            Terminal::Set(set) => Some(set.clone()),
            Terminal::Literal(s) => {
                let mut cs = s.chars();
                match (cs.next(), cs.next()) {
                    (Some(c), None) => Some(CharacterSet::from(c)),
                    _ => None,
                }
            }
            Terminal::Pattern(_) => None,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum RuleKind {
    Terminal(Terminal),
    /// Every child, in order.
    Sequence(Vec<Rule>),
    /// The first child that matches. Earlier alternatives shadow later ones.
    Choice(Vec<Rule>),
    /// Greedy; `max: None` is unbounded.
    Repeat { rule: Box<Rule>, min: usize, max: Option<usize> },
    /// Succeeds iff the child fails. Consumes nothing.
    Not(Box<Rule>),
    /// Succeeds iff the child succeeds. Consumes nothing.
    Lookahead(Box<Rule>),
    /// Another rule of the same grammar.
    Reference(RuleId),
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Rule {
    pub kind: RuleKind,
    pub behaviour: Behaviour,
}

impl From<RuleKind> for Rule {
    fn from(kind: RuleKind) -> Rule { Rule { kind, behaviour: Behaviour::transparent() } }
}

impl From<Terminal> for Rule {
    fn from(t: Terminal) -> Rule { RuleKind::Terminal(t).into() }
}

impl From<&str> for Rule {
    fn from(s: &str) -> Rule { Rule::literal(s) }
}

impl From<CharacterSet> for Rule {
    fn from(set: CharacterSet) -> Rule { Rule::set(set) }
}

// constructors
impl Rule {
    pub fn literal(s: impl Into<String>) -> Rule { Terminal::Literal(s.into()).into() }
    pub fn set(set: impl Into<CharacterSet>) -> Rule { Terminal::Set(set.into()).into() }
    pub fn pattern(pattern: Pattern) -> Rule { Terminal::Pattern(pattern).into() }
    pub fn reference(id: RuleId) -> Rule { RuleKind::Reference(id).into() }

    pub fn sequence(rules: impl IntoIterator<Item=Rule>) -> Rule {
        RuleKind::Sequence(rules.into_iter().collect()).into()
    }

    pub fn one_of(rules: impl IntoIterator<Item=Rule>) -> Rule {
        RuleKind::Choice(rules.into_iter().collect()).into()
    }

    /// A choice between literals, tried in the given order.
    pub fn one_of_literals<'a>(literals: impl IntoIterator<Item=&'a str>) -> Rule {
        Rule::one_of(literals.into_iter().map(Rule::literal))
    }

    pub fn repeated(self, min: usize, max: Option<usize>) -> Rule {
        RuleKind::Repeat { rule: Box::new(self), min, max }.into()
    }

    pub fn optional(self) -> Rule { self.repeated(0, Some(1)) }
    pub fn zero_or_more(self) -> Rule { self.repeated(0, None) }
    pub fn one_or_more(self) -> Rule { self.repeated(1, None) }

    pub fn not(self) -> Rule { RuleKind::Not(Box::new(self)).into() }
    pub fn lookahead(self) -> Rule { RuleKind::Lookahead(Box::new(self)).into() }
}

// behaviour
impl Rule {
    pub fn labelled(mut self, label: impl Into<Label>) -> Rule {
        self.behaviour.label = Some(label.into());
        self
    }

    pub fn annotated(mut self, key: Annotation, value: impl Into<AnnotationValue>) -> Rule {
        self.behaviour.annotations.insert(key, value.into());
        self
    }

    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Rule {
        self.behaviour = behaviour;
        self
    }

    pub fn void(self) -> Rule { self.annotated(Annotation::Void, AnnotationValue::Set) }
    pub fn transient(self) -> Rule { self.annotated(Annotation::Transient, AnnotationValue::Set) }
    pub fn pinned(self) -> Rule { self.annotated(Annotation::Pinned, AnnotationValue::Set) }
    pub fn error(self, message: impl Into<String>) -> Rule { self.annotated(Annotation::Error, message.into()) }
    pub fn token(self, name: impl Into<String>) -> Rule { self.annotated(Annotation::Token, name.into()) }
}

// traversal
impl Rule {
    pub fn children(&self) -> Vec<&Rule> {
        match &self.kind {
            RuleKind::Terminal(_) | RuleKind::Reference(_) => vec![],
            RuleKind::Sequence(rules) | RuleKind::Choice(rules) => rules.iter().collect(),
            RuleKind::Repeat { rule, .. } | RuleKind::Not(rule) | RuleKind::Lookahead(rule) => vec![rule.as_ref()],
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut Rule> {
        match &mut self.kind {
            RuleKind::Terminal(_) | RuleKind::Reference(_) => vec![],
            RuleKind::Sequence(rules) | RuleKind::Choice(rules) => rules.iter_mut().collect(),
            RuleKind::Repeat { rule, .. } | RuleKind::Not(rule) | RuleKind::Lookahead(rule) => vec![rule.as_mut()],
        }
    }

    /// Every rule this one refers to, directly or through its children.
    pub fn references(&self) -> Vec<RuleId> {
        let mut accum = Vec::new();
        self.collect_references(&mut accum);
        accum
    }

    fn collect_references(&self, accum: &mut Vec<RuleId>) {
        if let RuleKind::Reference(id) = self.kind {
            accum.push(id);
        }
        for child in self.children() {
            child.collect_references(accum);
        }
    }

    pub fn is_terminal(&self) -> bool { matches!(self.kind, RuleKind::Terminal(_)) }
}

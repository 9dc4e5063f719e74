//! Matching rules against source text.
//!
//! The scanner is a recursive-descent interpreter of the rule algebra. Every
//! rule invocation is evaluated in two steps: the rule's kind decides whether
//! and how far it matches, then [`Scanner::annotate`] applies the invocation's
//! behaviour (label, `@void`, `@transient`, `@error`, `@pin`) to the result.
//! No combinator looks at annotations itself.

use std::collections::HashSet;

use crate::annotation::{Annotation, Annotations, Behaviour, Label};
use crate::error::{LanguageError, Span};
use crate::grammar::{Grammar, RuleId};
use crate::node::Node;
use crate::rule::{Rule, RuleKind, Terminal};
use crate::util::scalar_offsets;

/// The end of a match, in scalar offsets, and the nodes it produced.
pub(crate) type Outcome = Result<(usize, Vec<Node>), LanguageError>;

pub(crate) struct Scanner<'g, 's> {
    grammar: &'g Grammar,
    source: &'s str,
    offsets: Vec<usize>,
    /// The most specific failure seen so far.
    best: Option<LanguageError>,
    /// How many `!`/`>>` predicates enclose the current rule. Failures inside
    /// a predicate are expected and are not diagnostics.
    predicate_depth: usize,
    /// Rules being evaluated, with the position they started at.
    active: HashSet<(RuleId, usize)>,
}

impl<'g, 's> Scanner<'g, 's> {
    pub(crate) fn new(grammar: &'g Grammar, source: &'s str) -> Self {
        Scanner {
            grammar,
            source,
            offsets: scalar_offsets(source),
            best: None,
            predicate_depth: 0,
            active: HashSet::new(),
        }
    }

    /// The length of the source in scalars.
    pub(crate) fn len(&self) -> usize { self.offsets.len() - 1 }

    pub(crate) fn text(&self, span: Span) -> &'s str {
        &self.source[self.offsets[span.start]..self.offsets[span.end]]
    }

    /// Matches the named top-level rule at `pos`.
    pub(crate) fn run(&mut self, id: RuleId, pos: usize) -> Outcome {
        self.matches(&Rule::reference(id), pos)
    }

    /// `err`, unless a failure recorded while scanning says more.
    pub(crate) fn most_specific(&mut self, err: LanguageError) -> LanguageError {
        match self.best.take() {
            Some(best) if best.outranks(&err) => best,
            _ => err,
        }
    }

    fn record(&mut self, err: &LanguageError) {
        if self.predicate_depth > 0 {
            return;
        }
        if self.best.as_ref().map_or(true, |best| err.outranks(best)) {
            self.best = Some(err.clone());
        }
    }

    fn fail(&mut self, at: usize, message: String) -> LanguageError {
        let err = LanguageError::parsing(Span::at(at), message);
        self.record(&err);
        err
    }

    fn matches(&mut self, rule: &Rule, pos: usize) -> Outcome {
        let grammar = self.grammar;
        let RuleKind::Reference(id) = rule.kind else {
            let raw = self.evaluate(&rule.kind, pos);
            return self.annotate(&rule.behaviour, pos, raw);
        };

        // Follow the chain of references to a body. Each step adds the
        // behaviour of the referencing site on top of the referenced rule's.
        let mut chain = vec![id];
        let mut target = grammar.rule(id);
        let mut behaviour = target.behaviour.overlay(&rule.behaviour);
        while let RuleKind::Reference(next) = target.kind {
            if chain.contains(&next) {
                let message = format!("Rule `{}` is defined as itself", grammar.name(next));
                return Err(LanguageError::scanning(Span::at(pos), message));
            }
            chain.push(next);
            target = grammar.rule(next);
            behaviour = target.behaviour.overlay(&behaviour);
        }

        if chain.iter().any(|&id| self.active.contains(&(id, pos))) {
            let message = format!("Left recursion in rule `{}`", grammar.name(id));
            return Err(LanguageError::scanning(Span::at(pos), message));
        }
        for &id in &chain { self.active.insert((id, pos)); }
        let raw = self.evaluate(&target.kind, pos);
        for &id in &chain { self.active.remove(&(id, pos)); }

        let outcome = self.annotate(&behaviour, pos, raw);
        if log::log_enabled!(log::Level::Trace) {
            match &outcome {
                Ok((end, _)) => log::trace!("`{}` matched {}..{}", grammar.name(id), pos, end),
                Err(err) => log::trace!("`{}` failed at {}: {}", grammar.name(id), pos, err.message()),
            }
        }
        outcome
    }

    fn evaluate(&mut self, kind: &RuleKind, pos: usize) -> Outcome {
        match kind {
            RuleKind::Terminal(t) => match self.terminal(t, pos) {
                Some(end) => Ok((end, vec![])),
                None => Err(self.fail(pos, format!("Expected {}", t))),
            },

            RuleKind::Sequence(rules) => {
                let mut at = pos;
                let mut nodes = vec![];
                for r in rules {
                    let (end, mut produced) = self.matches(r, at)?;
                    nodes.append(&mut produced);
                    at = end;
                }
                Ok((at, nodes))
            }

            RuleKind::Choice(rules) => {
                let mut failure: Option<LanguageError> = None;
                for r in rules {
                    match self.matches(r, pos) {
                        Ok(matched) => return Ok(matched),
                        Err(err) => {
                            if failure.as_ref().map_or(true, |f| err.outranks(f)) {
                                failure = Some(err);
                            }
                        }
                    }
                }
                Err(failure.unwrap_or_else(|| self.fail(pos, "Nothing to choose from".to_string())))
            }

            RuleKind::Repeat { rule, min, max } => {
                let mut at = pos;
                let mut count = 0;
                let mut nodes = vec![];
                let mut failure = None;
                while max.map_or(true, |max| count < max) {
                    match self.matches(rule, at) {
                        Ok((end, mut produced)) => {
                            count += 1;
                            nodes.append(&mut produced);
                            if end == at {
                                // a match of nothing would match forever
                                break;
                            }
                            at = end;
                        }
                        Err(err) => { failure = Some(err); break; }
                    }
                }
                if count < *min {
                    let message = format!("Expected at least {} repetitions, found {}", min, count);
                    return Err(failure.unwrap_or_else(|| self.fail(at, message)));
                }
                Ok((at, nodes))
            }

            RuleKind::Not(rule) => {
                self.predicate_depth += 1;
                let inner = self.matches(rule, pos);
                self.predicate_depth -= 1;
                match inner {
                    Ok(_) => Err(self.fail(pos, "Unexpected input".to_string())),
                    Err(_) => Ok((pos, vec![])),
                }
            }

            RuleKind::Lookahead(rule) => {
                self.predicate_depth += 1;
                let inner = self.matches(rule, pos);
                self.predicate_depth -= 1;
                inner.map(|_| (pos, vec![]))
            }

            RuleKind::Reference(id) => self.matches(&Rule::reference(*id), pos),
        }
    }

    /// The end of the terminal matched at `pos`, if it matches.
    fn terminal(&self, t: &Terminal, pos: usize) -> Option<usize> {
        let rest = &self.source[self.offsets[pos]..];
        match t {
            Terminal::Literal(s) => rest.starts_with(s.as_str()).then(|| pos + s.chars().count()),
            Terminal::Set(set) => rest.chars().next().filter(|&c| set.contains(c)).map(|_| pos + 1),
            Terminal::Pattern(p) => {
                let byte_end = self.offsets[pos] + p.match_len(rest)?;
                match self.offsets.binary_search(&byte_end) {
                    Ok(end) | Err(end) => Some(end),
                }
            }
        }
    }

    /// Applies the behaviour of a rule invocation to its raw outcome.
    fn annotate(&mut self, behaviour: &Behaviour, pos: usize, raw: Outcome) -> Outcome {
        let annotations = &behaviour.annotations;
        let (end, children) = match raw {
            Ok(matched) => matched,
            Err(inner) => return Err(match annotations.error() {
                Some(message) => {
                    let err = LanguageError::semantic(Span::new(pos, inner.span().start.max(pos)), message);
                    self.record(&err);
                    err
                }
                None => inner,
            }),
        };

        if annotations.is_void() {
            return Ok((end, vec![]));
        }
        let label = match behaviour.token() {
            Some(label) if !annotations.is_transient() => label,
            _ => return Ok((end, children)),
        };
        // a match of nothing produces nothing, unless pinned
        if end == pos && !annotations.is_pinned() {
            return Ok((end, children));
        }

        let span = Span::new(pos, end);
        Ok((end, vec![Node {
            label,
            span,
            matched: self.text(span).to_string(),
            children,
            annotations: custom(annotations),
        }]))
    }
}

fn custom(annotations: &Annotations) -> Annotations {
    annotations.iter()
        .filter(|(k, _)| matches!(k, Annotation::Custom(_)))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// One produced node of a scan, as seen by a token visitor.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub label: Label,
    pub matched: String,
    /// The scalar offset of the first matched character.
    pub offset: usize,
    /// The depth of the node in the tree of its top-level match.
    pub depth: usize,
}

impl Grammar {
    /// Scans `source` as a stream of top-level rules: at each position the
    /// top-level rules are tried in order and the first one that consumes
    /// input wins. Every node produced along the way is handed to `visitor`,
    /// parents before children; scanning stops early when it returns `false`.
    pub fn visit_tokens(&self, source: &str, mut visitor: impl FnMut(&Token) -> bool) -> Result<(), LanguageError> {
        let mut scanner = Scanner::new(self, source);
        let mut at = 0;
        while at < scanner.len() {
            let mut next = None;
            let mut failure = None;
            for &id in self.top_level() {
                match scanner.run(id, at) {
                    Ok((end, nodes)) if end > at => { next = Some((end, nodes)); break; }
                    Ok(_) => {}
                    Err(err) => if failure.as_ref().map_or(true, |f| err.outranks(f)) { failure = Some(err) },
                }
            }
            let Some((end, nodes)) = next else {
                let err = failure.unwrap_or_else(|| LanguageError::parsing(Span::new(at, scanner.len()), "Unexpected input"));
                return Err(scanner.most_specific(err));
            };
            for node in &nodes {
                if !visit(node, 0, &mut visitor) {
                    return Ok(());
                }
            }
            at = end;
        }
        Ok(())
    }

    /// Every token of `source`; see [`Grammar::visit_tokens`].
    pub fn scan(&self, source: &str) -> Result<Vec<Token>, LanguageError> {
        let mut tokens = vec![];
        self.visit_tokens(source, |t| { tokens.push(t.clone()); true })?;
        Ok(tokens)
    }

    /// Whether the entry rule matches all of `source`.
    pub fn matches(&self, source: &str) -> bool {
        let mut scanner = Scanner::new(self, source);
        matches!(scanner.run(self.entry(), 0), Ok((end, _)) if end == scanner.len())
    }
}

fn visit(node: &Node, depth: usize, visitor: &mut impl FnMut(&Token) -> bool) -> bool {
    let token = Token { label: node.label.clone(), matched: node.matched.clone(), offset: node.span.start, depth };
    if !visitor(&token) {
        return false;
    }
    node.children.iter().all(|c| visit(c, depth + 1, visitor))
}

#[cfg(test)]
#[path = "tests/scanner.rs"]
mod tests_for_scanner;

//! Compiling STLR abstract syntax into a [`Grammar`].
//!
//! Every rule is declared before any is defined, so rules can refer to rules
//! defined after them, and to themselves. Diagnostics are collected rather than
//! returned at the first one; warnings never stop a compilation.

use std::collections::{HashMap, HashSet};

use crate::annotation::{Annotation, AnnotationValue, Annotations, Behaviour};
use crate::charset::CharacterSet;
use crate::context::Context;
use crate::decode::Decode;
use crate::error::{LanguageError, Span};
use crate::grammar::{Grammar, RuleId};
use crate::resolve::Resolver;
use crate::rule::Rule;
use crate::util::normalize_escapes;

use super::ast;

/// A compiled grammar, the syntax it was compiled from, and anything worth
/// telling the author that did not stop the compilation.
#[derive(Debug)]
pub struct Compiled {
    pub grammar: Grammar,
    pub ast: ast::Grammar,
    pub warnings: Vec<LanguageError>,
}

/// Parses STLR `source` and compiles it with the passes and modules of `ctx`.
pub fn compile(source: &str, ctx: &Context) -> Result<Compiled, Vec<LanguageError>> {
    let stlr = super::grammar(ctx).map_err(|e| vec![LanguageError::from(e)])?;
    let ast = parse_with(&stlr, source).map_err(|e| vec![e])?;

    let mut compiler = Compiler::new(ctx, &stlr);
    let mut rules: Vec<&ast::Rule> = ast.rules.iter().collect();
    let mut imported = vec![];
    let mut visiting = HashSet::new();
    for import in &ast.modules {
        compiler.import(import, &mut imported, &mut visiting);
    }
    rules.extend(imported.iter().flat_map(|m: &ast::Grammar| m.rules.iter()));

    let mut grammar = compiler.compile(&rules)?;
    ctx.optimize(&mut grammar);
    log::debug!("compiled {} rules with {} warnings", grammar.len(), compiler.warnings.len());
    Ok(Compiled { grammar, ast, warnings: compiler.warnings })
}

/// Parses STLR `source` into its abstract syntax.
pub fn parse(source: &str, ctx: &Context) -> Result<ast::Grammar, LanguageError> {
    parse_with(&super::grammar(ctx)?, source)
}

fn parse_with(stlr: &Grammar, source: &str) -> Result<ast::Grammar, LanguageError> {
    let tree = stlr.parse(source)?;
    match tree.top() {
        Some(top) => ast::Grammar::decode(top)
            .map_err(|e| LanguageError::parsing(top.span, format!("Malformed grammar: {}", e))),
        None => Err(LanguageError::parsing(Span::at(0), "Expected a grammar")),
    }
}

/// A `@token` override of a referenced rule, made once all the rules it can
/// refer to are defined.
struct Override {
    target: RuleId,
    name: String,
}

struct Compiler<'c> {
    ctx: &'c Context,
    /// The STLR grammar, for parsing imported modules.
    stlr: &'c Grammar,
    resolver: Resolver,
    /// Names given a definition by some rule, with the place of the first.
    defined: HashMap<String, Span>,
    overrides: Vec<Override>,
    errors: Vec<LanguageError>,
    warnings: Vec<LanguageError>,
}

impl<'c> Compiler<'c> {
    fn new(ctx: &'c Context, stlr: &'c Grammar) -> Self {
        Compiler {
            ctx,
            stlr,
            resolver: Resolver::new(),
            defined: HashMap::new(),
            overrides: vec![],
            errors: vec![],
            warnings: vec![],
        }
    }

    fn semantic(&mut self, span: Span, message: impl Into<String>) {
        self.errors.push(LanguageError::semantic(span, message));
    }

    /// Parses a module registered on the context, and the modules it imports
    /// in turn. Each module is imported once.
    fn import(&mut self, import: &ast::ModuleImport, into: &mut Vec<ast::Grammar>, visiting: &mut HashSet<String>) {
        let name = &import.module_name;
        if !visiting.insert(name.clone()) {
            return;
        }
        let Some(source) = self.ctx.module(name) else {
            self.semantic(import.span, format!("Unknown module `{}`", name));
            return;
        };
        match parse_with(self.stlr, source) {
            Ok(module) => {
                for nested in &module.modules {
                    self.import(nested, into, visiting);
                }
                log::debug!("imported module `{}` of {} rules", name, module.rules.len());
                into.push(module);
            }
            Err(err) => self.semantic(import.span, format!("In module `{}`: {}", name, err)),
        }
    }

    fn compile(&mut self, rules: &[&ast::Rule]) -> Result<Grammar, Vec<LanguageError>> {
        for rule in rules {
            self.resolver.declare(&rule.identifier);
            self.defined.entry(rule.identifier.clone()).or_insert(rule.identifier_span);
        }
        if self.errors.is_empty() {
            for rule in rules {
                self.define(rule);
            }
            self.apply_overrides();
        }
        if !self.errors.is_empty() {
            return Err(std::mem::take(&mut self.errors));
        }

        let order: Vec<&str> = rules.iter().map(|r| r.identifier.as_str()).collect();
        let resolver = std::mem::take(&mut self.resolver);
        let grammar = resolver.finish(&order).map_err(|e| vec![LanguageError::from(e)])?;
        self.warn_unreachable(&grammar, rules);
        Ok(grammar)
    }

    fn define(&mut self, rule: &ast::Rule) {
        let Some(body) = self.expression(&rule.expression) else { return };
        let id = self.resolver.declare(&rule.identifier);

        let mut annotations = self.annotations(&rule.annotations, rule.span);
        if rule.transient { annotations.insert(Annotation::Transient, AnnotationValue::Set); }
        if rule.void { annotations.insert(Annotation::Void, AnnotationValue::Set); }

        let existing = self.resolver.body(id).cloned();
        match (rule.assignment, existing) {
            (ast::AssignmentOperator::Define, Some(_)) => {
                let first = self.defined.get(&rule.identifier).copied().unwrap_or_default();
                self.errors.push(LanguageError::conflict(
                    rule.identifier_span,
                    first,
                    format!("Rule `{}` is already defined", rule.identifier),
                ));
            }
            (ast::AssignmentOperator::Extend, Some(previous)) => {
                let extended = Rule::sequence([strip(&previous), body]);
                self.resolver.redefine(id, extended.with_behaviour(extend(&previous.behaviour, &annotations)));
            }
            (ast::AssignmentOperator::Alternative, Some(previous)) => {
                let extended = Rule::one_of([strip(&previous), body]);
                self.resolver.redefine(id, extended.with_behaviour(extend(&previous.behaviour, &annotations)));
            }
            (_, None) => {
                // the declaration's annotations apply on top of the body's own
                let behaviour = Behaviour {
                    label: Some(rule.identifier.as_str().into()),
                    annotations: body.behaviour.annotations.merged(&annotations),
                };
                if let Err(err) = self.resolver.define_at(id, body.with_behaviour(behaviour), rule.span) {
                    self.errors.push(err.into());
                }
            }
        }
    }

    fn apply_overrides(&mut self) {
        for Override { target, name } in std::mem::take(&mut self.overrides) {
            let id = self.resolver.declare(&name);
            if self.resolver.is_defined(id) {
                continue;
            }
            let Some(body) = self.resolver.body(target).cloned() else { continue };
            log::debug!("`{}` is `{}` produced as `{}`", name, self.resolver.name(target), name);
            let span = self.resolver.span(target).unwrap_or_default();
            if let Err(err) = self.resolver.define_at(id, body.labelled(name.as_str()), span) {
                self.errors.push(err.into());
            }
        }
    }

    fn warn_unreachable(&mut self, grammar: &Grammar, rules: &[&ast::Rule]) {
        let reachable = grammar.reachable_from(grammar.entry());
        let mut warned = HashSet::new();
        for rule in rules {
            let Some(id) = grammar.id_of(&rule.identifier) else { continue };
            if !reachable.contains(&id) && warned.insert(id) {
                let warning = LanguageError::warning(
                    rule.identifier_span,
                    format!("Rule `{}` is not reachable from `{}`", rule.identifier, grammar.name(grammar.entry())),
                );
                log::warn!("{}", warning);
                self.warnings.push(warning);
            }
        }
    }

    fn expression(&mut self, expression: &ast::Expression) -> Option<Rule> {
        match expression {
            ast::Expression::Sequence(elements) => Some(Rule::sequence(self.elements(elements)?)),
            ast::Expression::Choice(elements) => Some(Rule::one_of(self.elements(elements)?)),
            ast::Expression::Element(element) => self.element(element),
        }
    }

    fn elements(&mut self, elements: &[ast::Element]) -> Option<Vec<Rule>> {
        // every element is compiled so that all of their errors are reported
        let compiled: Vec<Option<Rule>> = elements.iter().map(|e| self.element(e)).collect();
        compiled.into_iter().collect()
    }

    fn element(&mut self, element: &ast::Element) -> Option<Rule> {
        let mut annotations = self.annotations(&element.annotations, element.span);

        let mut rule = match &element.body {
            ast::ElementBody::Group(expression) => self.expression(expression)?,
            ast::ElementBody::Terminal(terminal) => self.terminal(terminal, element.span)?,
            ast::ElementBody::Identifier(name) => {
                if !self.defined.contains_key(name) {
                    self.semantic(element.span, format!("Undefined identifier `{}`", name));
                    return None;
                }
                let target = self.resolver.declare(name);
                match annotations.remove(&Annotation::Token) {
                    Some(AnnotationValue::String(token)) if token != *name => {
                        self.overrides.push(Override { target, name: token.clone() });
                        self.resolver.reference(&token)
                    }
                    Some(other) => {
                        annotations.insert(Annotation::Token, other);
                        Rule::reference(target)
                    }
                    None => Rule::reference(target),
                }
            }
        };

        if element.negated {
            rule = rule.not();
        }
        rule = match element.quantifier {
            Some(ast::Quantifier::ZeroOrMore) => rule.zero_or_more(),
            Some(ast::Quantifier::OneOrMore) => rule.one_or_more(),
            Some(ast::Quantifier::Optional) => rule.optional(),
            None => rule,
        };
        rule = match element.prefix {
            Some(ast::Prefix::Lookahead) => rule.lookahead(),
            Some(ast::Prefix::Transient) => rule.transient(),
            Some(ast::Prefix::Void) => rule.void(),
            None => rule,
        };

        rule.behaviour.annotations = rule.behaviour.annotations.merged(&annotations);
        Some(rule)
    }

    fn terminal(&mut self, terminal: &ast::Terminal, span: Span) -> Option<Rule> {
        match terminal {
            ast::Terminal::CharacterSet(name) => Some(Rule::set(*name)),
            ast::Terminal::TerminalString(body) => Some(Rule::literal(self.unescaped(body, span, "terminal")?)),
            ast::Terminal::CharacterRange(lo, hi) => {
                let (lo, hi) = (self.unescaped(lo, span, "terminal")?, self.unescaped(hi, span, "terminal")?);
                let mut ends = (lo.chars(), hi.chars());
                match (ends.0.next(), ends.0.next(), ends.1.next(), ends.1.next()) {
                    (Some(lo), None, Some(hi), None) if lo <= hi => Some(Rule::set(CharacterSet::Range(lo, hi))),
                    (Some(_), None, Some(_), None) => {
                        self.semantic(span, "Character range must go from the lower to the higher character");
                        None
                    }
                    _ => {
                        self.semantic(span, "Character range must be between single characters");
                        None
                    }
                }
            }
            ast::Terminal::Regex(body) => match self.ctx.pattern(&body.replace("\\/", "/")) {
                Ok(pattern) => Some(Rule::pattern(pattern)),
                Err(err) => {
                    self.semantic(span, err.to_string());
                    None
                }
            },
        }
    }

    fn unescaped(&mut self, body: &str, span: Span, what: &str) -> Option<String> {
        match normalize_escapes(body) {
            Ok(s) => Some(s),
            Err(err) => {
                self.semantic(span, format!("Invalid {}: {}", what, err));
                None
            }
        }
    }

    fn annotations(&mut self, annotations: &[ast::Annotation], span: Span) -> Annotations {
        let mut accum = Annotations::new();
        for a in annotations {
            let key = match &a.label {
                ast::AnnotationLabel::Defined(defined) => Annotation::from_name(defined.name()),
                ast::AnnotationLabel::Custom(name) => Annotation::Custom(name.clone()),
            };
            let value = match &a.literal {
                None => AnnotationValue::Set,
                Some(ast::Literal::String(s)) => match self.unescaped(s, span, "annotation value") {
                    Some(s) => s.into(),
                    None => continue,
                },
                Some(ast::Literal::Number(n)) => AnnotationValue::Int(*n),
                Some(ast::Literal::Boolean(b)) => AnnotationValue::Bool(*b),
            };
            accum.insert(key, value);
        }
        accum
    }
}

/// A rule with its label and annotations removed, to be nested in its own
/// extension.
fn strip(rule: &Rule) -> Rule {
    rule.clone().with_behaviour(Behaviour::transparent())
}

fn extend(previous: &Behaviour, annotations: &Annotations) -> Behaviour {
    Behaviour { label: previous.label.clone(), annotations: previous.annotations.merged(annotations) }
}

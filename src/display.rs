//! Rendering rules back to STLR notation.

use crate::annotation::{AnnotationValue, Annotations};
use crate::charset::escaped;
use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::rule::{Rule, RuleKind, Terminal};

#[derive(Copy, Clone, PartialEq, Eq)]
enum RuleContext { Top, Sequence, Choice, Quantified, Prefixed }

impl Rule {
    fn needs_parens(&self, context: RuleContext) -> bool {
        let annotated = !self.behaviour.annotations.is_empty();
        match (&self.kind, context) {
            (_, RuleContext::Top) => false,
            (_, RuleContext::Quantified | RuleContext::Prefixed) if annotated => true,

            (RuleKind::Sequence(rules) | RuleKind::Choice(rules), _) => rules.len() != 1,

            (RuleKind::Terminal(_) | RuleKind::Reference(_), _) => false,

            (RuleKind::Repeat { .. } | RuleKind::Not(_) | RuleKind::Lookahead(_), RuleContext::Quantified) => true,
            (RuleKind::Repeat { .. } | RuleKind::Not(_) | RuleKind::Lookahead(_), _) => false,
        }
    }
}

impl std::fmt::Display for Terminal {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Terminal::Literal(s) => write!(w, "\"{}\"", escaped(s)),
            Terminal::Set(set) => write!(w, "{}", set),
            Terminal::Pattern(p) => write!(w, "/{}/", p.source().replace('/', "\\/")),
        }
    }
}

impl std::fmt::Display for AnnotationValue {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AnnotationValue::Set => Ok(()),
            AnnotationValue::String(s) => write!(w, "\"{}\"", escaped(s)),
            AnnotationValue::Int(n) => write!(w, "{}", n),
            AnnotationValue::Bool(b) => write!(w, "{}", b),
            AnnotationValue::Label(l) => write!(w, "{}", l),
        }
    }
}

impl std::fmt::Display for Annotations {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 { write!(w, " ")?; }
            match value {
                AnnotationValue::Set => write!(w, "@{}", key.name())?,
                value => write!(w, "@{}({})", key.name(), value)?,
            }
        }
        Ok(())
    }
}

impl Grammar {
    /// The definition of the named rule, in STLR notation:
    /// `annotations name = expression`.
    pub fn describe(&self, name: &str) -> Result<String, GrammarError> {
        let id = self.id_of(name).ok_or_else(|| GrammarError::UnknownRule(name.to_string()))?;
        let annotations = &self.rule(id).behaviour.annotations;
        let expression = self.describe_expression(name)?;
        if annotations.is_empty() {
            Ok(format!("{} = {}", name, expression))
        } else {
            Ok(format!("{} {} = {}", annotations, name, expression))
        }
    }

    /// The right-hand side of the named rule, without its own annotations.
    pub fn describe_expression(&self, name: &str) -> Result<String, GrammarError> {
        let rule = self.rule_named(name).ok_or_else(|| GrammarError::UnknownRule(name.to_string()))?;
        let mut out = String::new();
        self.write_body(rule, RuleContext::Top, &mut out);
        Ok(out)
    }

    /// Any rule of this grammar as an STLR expression.
    pub fn describe_rule(&self, rule: &Rule) -> String {
        let mut out = String::new();
        self.write_rule(rule, RuleContext::Top, &mut out);
        out
    }

    /// Every definition, one per line, in declaration order.
    pub fn describe_all(&self) -> String {
        let mut lines = vec![];
        for id in self.ids() {
            if let Ok(line) = self.describe(self.name(id)) {
                lines.push(line);
            }
        }
        lines.join("\n")
    }

    fn write_rule(&self, rule: &Rule, context: RuleContext, out: &mut String) {
        let parens = rule.needs_parens(context);
        if parens { out.push('('); }
        let annotations = &rule.behaviour.annotations;
        if !annotations.is_empty() {
            out.push_str(&format!("{} ", annotations));
        }
        self.write_body(rule, if parens { RuleContext::Top } else { context }, out);
        if parens { out.push(')'); }
    }

    fn write_body(&self, rule: &Rule, context: RuleContext, out: &mut String) {
        match &rule.kind {
            RuleKind::Terminal(t) => out.push_str(&t.to_string()),
            RuleKind::Reference(id) => out.push_str(self.name(*id)),
            RuleKind::Sequence(rules) => self.write_list(rules, " ", RuleContext::Sequence, context, out),
            RuleKind::Choice(rules) => self.write_list(rules, " | ", RuleContext::Choice, context, out),
            RuleKind::Repeat { rule, min, max } => {
                self.write_rule(rule, RuleContext::Quantified, out);
                match (min, max) {
                    (0, None) => out.push('*'),
                    (1, None) => out.push('+'),
                    (0, Some(1)) => out.push('?'),
                    (min, None) => out.push_str(&format!("{{{},}}", min)),
                    (min, Some(max)) => out.push_str(&format!("{{{},{}}}", min, max)),
                }
            }
            RuleKind::Not(rule) => {
                out.push('!');
                self.write_rule(rule, RuleContext::Prefixed, out);
            }
            RuleKind::Lookahead(rule) => {
                out.push_str(">>");
                self.write_rule(rule, RuleContext::Prefixed, out);
            }
        }
    }

    fn write_list(&self, rules: &[Rule], separator: &str, inner: RuleContext, outer: RuleContext, out: &mut String) {
        // a nested list is wrapped by `write_rule`; a lone element keeps the
        // context of its parent
        let inner = if rules.len() == 1 { outer } else { inner };
        for (i, r) in rules.iter().enumerate() {
            if i > 0 { out.push_str(separator); }
            self.write_rule(r, inner, out);
        }
    }
}

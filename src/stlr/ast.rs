//! The abstract syntax of STLR, as decoded from a parse with
//! [`super::grammar`].

use crate::charset::SetName;
use crate::decode::{composite, spelled, Decode, Encode, Record, Sum};
use crate::error::{DecodingError, Span};
use crate::node::Node;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grammar {
    pub modules: Vec<ModuleImport>,
    pub rules: Vec<Rule>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleImport {
    pub module_name: String,
    pub span: Span,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AssignmentOperator {
    /// `=`
    Define,
    /// `+=`, appends to the rule as a sequence
    Extend,
    /// `|=`, adds an alternative to the rule
    Alternative,
}

impl AssignmentOperator {
    const SPELLINGS: [(&'static str, AssignmentOperator); 3] = [
        ("=", AssignmentOperator::Define),
        ("+=", AssignmentOperator::Extend),
        ("|=", AssignmentOperator::Alternative),
    ];
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rule {
    pub annotations: Vec<Annotation>,
    pub transient: bool,
    pub void: bool,
    pub identifier: String,
    pub identifier_span: Span,
    pub assignment: AssignmentOperator,
    pub expression: Expression,
    pub span: Span,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expression {
    Sequence(Vec<Element>),
    Choice(Vec<Element>),
    Element(Element),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Prefix { Lookahead, Transient, Void }

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Quantifier { ZeroOrMore, OneOrMore, Optional }

impl Quantifier {
    const SPELLINGS: [(&'static str, Quantifier); 3] = [
        ("*", Quantifier::ZeroOrMore),
        ("+", Quantifier::OneOrMore),
        ("?", Quantifier::Optional),
    ];
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Element {
    pub annotations: Vec<Annotation>,
    pub prefix: Option<Prefix>,
    pub negated: bool,
    pub body: ElementBody,
    pub quantifier: Option<Quantifier>,
    pub span: Span,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ElementBody {
    Group(Box<Expression>),
    Terminal(Terminal),
    Identifier(String),
}

/// Terminal bodies are kept as written, escapes included.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Terminal {
    CharacterSet(SetName),
    CharacterRange(String, String),
    TerminalString(String),
    Regex(String),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Annotation {
    pub label: AnnotationLabel,
    pub literal: Option<Literal>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AnnotationLabel {
    Defined(DefinedLabel),
    Custom(String),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DefinedLabel { Token, Error, Void, Transient, Pin }

impl DefinedLabel {
    const SPELLINGS: [(&'static str, DefinedLabel); 5] = [
        ("token", DefinedLabel::Token),
        ("error", DefinedLabel::Error),
        ("void", DefinedLabel::Void),
        ("transient", DefinedLabel::Transient),
        ("pin", DefinedLabel::Pin),
    ];

    pub fn name(self) -> &'static str {
        DefinedLabel::SPELLINGS.iter().find(|(_, l)| *l == self).map_or("", |(s, _)| *s)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Literal {
    String(String),
    Number(i64),
    Boolean(bool),
}

// decoding

fn container<T: Decode>(record: &Record, container: &str, item: &str) -> Result<Vec<T>, DecodingError> {
    match record.node().child(container) {
        Some(node) => Record::new(node, "list").sequence(item),
        None => Ok(vec![]),
    }
}

fn span_of(record: &Record, field: &str) -> Span {
    record.node().child(field).map_or(Span::default(), |n| n.span)
}

impl Decode for Grammar {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        let r = Record::new(node, "Grammar");
        let rules: Node = r.required("rules")?;
        Ok(Grammar {
            modules: container(&r, "modules", "moduleImport")?,
            rules: Record::new(&rules, "Rules").sequence("rule")?,
        })
    }
}

impl Decode for ModuleImport {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        let r = Record::new(node, "ModuleImport");
        Ok(ModuleImport { module_name: r.required("moduleName")?, span: r.span() })
    }
}

impl Decode for AssignmentOperator {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        spelled(node, "AssignmentOperator", &AssignmentOperator::SPELLINGS)
    }
}

impl Decode for Quantifier {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        spelled(node, "Quantifier", &Quantifier::SPELLINGS)
    }
}

impl Decode for DefinedLabel {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        spelled(node, "DefinedLabel", &DefinedLabel::SPELLINGS)
    }
}

impl Decode for SetName {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        SetName::from_name(&node.matched).ok_or_else(|| DecodingError::TypeMismatch {
            type_name: "CharacterSetName",
            found: node.matched.clone(),
            span: node.span,
        })
    }
}

impl Decode for Rule {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        let r = Record::new(node, "Rule");
        Ok(Rule {
            annotations: container(&r, "annotations", "annotation")?,
            transient: r.flag("transient"),
            void: r.flag("void"),
            identifier: r.required("identifier")?,
            identifier_span: span_of(&r, "identifier"),
            assignment: r.required("assignmentOperators")?,
            expression: r.required("expression")?,
            span: r.span(),
        })
    }
}

impl Decode for Expression {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        Sum::new(node, "Expression")
            .or_child("sequence", |n| Ok(Expression::Sequence(Record::new(n, "Sequence").sequence("element")?)))
            .or_child("choice", |n| Ok(Expression::Choice(Record::new(n, "Choice").sequence("element")?)))
            .or_child("element", |n| Ok(Expression::Element(Element::decode(n)?)))
            .end()
    }
}

impl Decode for Element {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        let r = Record::new(node, "Element");
        let prefix = if r.flag("lookahead") {
            Some(Prefix::Lookahead)
        } else if r.flag("transient") {
            Some(Prefix::Transient)
        } else if r.flag("void") {
            Some(Prefix::Void)
        } else {
            None
        };
        let body = Sum::new(node, "Element")
            .or_child("group", |g| Ok(ElementBody::Group(Box::new(Record::new(g, "Group").required("expression")?))))
            .or_child("terminal", |t| Ok(ElementBody::Terminal(Terminal::decode(t)?)))
            .or_child("identifier", |i| Ok(ElementBody::Identifier(String::decode(i)?)))
            .end()?;
        Ok(Element {
            annotations: container(&r, "annotations", "annotation")?,
            prefix,
            negated: r.flag("negated"),
            body,
            quantifier: r.optional("quantifier")?,
            span: r.span(),
        })
    }
}

fn terminal_body(node: &Node) -> Result<String, DecodingError> {
    Record::new(node, "TerminalString").required("terminalBody")
}

impl Decode for Terminal {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        Sum::new(node, "Terminal")
            .or_child("characterSet", |n| {
                Ok(Terminal::CharacterSet(Record::new(n, "CharacterSet").required("characterSetName")?))
            })
            .or_child("regex", |n| Ok(Terminal::Regex(Record::new(n, "Regex").required("regexBody")?)))
            .or_child("terminalString", |n| Ok(Terminal::TerminalString(terminal_body(n)?)))
            .or_child("characterRange", |n| {
                let ends: Vec<&Node> = n.children_labelled("terminalString").collect();
                match ends.as_slice() {
                    [lo, hi] => Ok(Terminal::CharacterRange(terminal_body(lo)?, terminal_body(hi)?)),
                    _ => Err(DecodingError::TypeMismatch {
                        type_name: "CharacterRange",
                        found: n.matched.clone(),
                        span: n.span,
                    }),
                }
            })
            .end()
    }
}

impl Decode for Annotation {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        let r = Record::new(node, "Annotation");
        Ok(Annotation { label: r.required("label")?, literal: r.optional("literal")? })
    }
}

impl Decode for AnnotationLabel {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        Sum::new(node, "Label")
            .or_child("definedLabel", |n| Ok(AnnotationLabel::Defined(DefinedLabel::decode(n)?)))
            .or_child("customLabel", |n| Ok(AnnotationLabel::Custom(String::decode(n)?)))
            .end()
    }
}

impl Decode for Literal {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        Sum::new(node, "Literal")
            .or_child("boolean", |n| Ok(Literal::Boolean(bool::decode(n)?)))
            .or_child("number", |n| Ok(Literal::Number(i64::decode(n)?)))
            .or_child("string", |n| Ok(Literal::String(Record::new(n, "String").required("stringBody")?)))
            .end()
    }
}

// encoding

fn leaf(label: &str, text: &str) -> Node { Node::new(label, Span::default(), text) }

fn at(mut node: Node, span: Span) -> Node {
    node.span = span;
    node
}

fn annotations_node(annotations: &[Annotation], out: &mut Vec<Node>) {
    if !annotations.is_empty() {
        out.push(composite("annotations", annotations.iter().map(|a| a.encode("annotation")).collect()));
    }
}

impl Encode for Grammar {
    fn encode(&self, label: &str) -> Node {
        let mut children = vec![];
        if !self.modules.is_empty() {
            children.push(composite("modules", self.modules.iter().map(|m| m.encode("moduleImport")).collect()));
        }
        children.push(composite("rules", self.rules.iter().map(|r| r.encode("rule")).collect()));
        composite(label, children)
    }
}

impl Encode for ModuleImport {
    fn encode(&self, label: &str) -> Node {
        at(composite(label, vec![self.module_name.encode("moduleName")]), self.span)
    }
}

impl Encode for Rule {
    fn encode(&self, label: &str) -> Node {
        let mut children = vec![];
        annotations_node(&self.annotations, &mut children);
        if self.transient { children.push(leaf("transient", "~")); }
        if self.void { children.push(leaf("void", "-")); }
        children.push(at(self.identifier.encode("identifier"), self.identifier_span));
        children.push(self.assignment.encode("assignmentOperators"));
        children.push(self.expression.encode("expression"));
        at(composite(label, children), self.span)
    }
}

impl Encode for AssignmentOperator {
    fn encode(&self, label: &str) -> Node {
        let spelling = AssignmentOperator::SPELLINGS.iter().find(|(_, op)| op == self).map_or("=", |(s, _)| *s);
        leaf(label, spelling)
    }
}

impl Encode for Expression {
    fn encode(&self, label: &str) -> Node {
        let inner = match self {
            Expression::Sequence(es) => composite("sequence", es.iter().map(|e| e.encode("element")).collect()),
            Expression::Choice(es) => composite("choice", es.iter().map(|e| e.encode("element")).collect()),
            Expression::Element(e) => e.encode("element"),
        };
        composite(label, vec![inner])
    }
}

impl Encode for Element {
    fn encode(&self, label: &str) -> Node {
        let mut children = vec![];
        annotations_node(&self.annotations, &mut children);
        match self.prefix {
            Some(Prefix::Lookahead) => children.push(leaf("lookahead", ">>")),
            Some(Prefix::Transient) => children.push(leaf("transient", "~")),
            Some(Prefix::Void) => children.push(leaf("void", "-")),
            None => {}
        }
        if self.negated { children.push(leaf("negated", "!")); }
        children.push(match &self.body {
            ElementBody::Group(expression) => composite("group", vec![expression.encode("expression")]),
            ElementBody::Terminal(t) => t.encode("terminal"),
            ElementBody::Identifier(name) => name.encode("identifier"),
        });
        if let Some(q) = self.quantifier {
            let spelling = Quantifier::SPELLINGS.iter().find(|(_, s)| *s == q).map_or("*", |(s, _)| *s);
            children.push(leaf("quantifier", spelling));
        }
        at(composite(label, children), self.span)
    }
}

fn terminal_string(body: &str) -> Node {
    composite("terminalString", vec![leaf("terminalBody", body)])
}

impl Encode for Terminal {
    fn encode(&self, label: &str) -> Node {
        let inner = match self {
            Terminal::CharacterSet(name) => composite("characterSet", vec![leaf("characterSetName", name.name())]),
            Terminal::CharacterRange(lo, hi) => composite("characterRange", vec![terminal_string(lo), terminal_string(hi)]),
            Terminal::TerminalString(body) => terminal_string(body),
            Terminal::Regex(body) => composite("regex", vec![leaf("regexBody", body)]),
        };
        composite(label, vec![inner])
    }
}

impl Encode for Annotation {
    fn encode(&self, label: &str) -> Node {
        let mut children = vec![self.label.encode("label")];
        if let Some(literal) = &self.literal {
            children.push(literal.encode("literal"));
        }
        composite(label, children)
    }
}

impl Encode for AnnotationLabel {
    fn encode(&self, label: &str) -> Node {
        let inner = match self {
            AnnotationLabel::Defined(defined) => leaf("definedLabel", defined.name()),
            AnnotationLabel::Custom(name) => leaf("customLabel", name),
        };
        composite(label, vec![inner])
    }
}

impl Encode for Literal {
    fn encode(&self, label: &str) -> Node {
        let inner = match self {
            Literal::String(s) => composite("string", vec![leaf("stringBody", s)]),
            Literal::Number(n) => n.encode("number"),
            Literal::Boolean(b) => b.encode("boolean"),
        };
        composite(label, vec![inner])
    }
}

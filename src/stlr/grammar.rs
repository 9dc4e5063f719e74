//! The STLR grammar, built directly with the rule algebra.
//!
//! The same grammar, written in STLR, is [`super::STLR_SOURCE`]; compiling that
//! text gives a grammar that parses STLR the same way.

use crate::charset::{CharacterSet, SetName};
use crate::context::Context;
use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::resolve::Resolver;
use crate::rule::Rule;

fn identifier_start() -> CharacterSet {
    CharacterSet::from(SetName::Letter).union(CharacterSet::from('_'))
}

fn identifier_continue() -> CharacterSet {
    identifier_start().union(CharacterSet::from(SetName::DecimalDigit))
}

fn ows(r: &mut Resolver) -> Rule { r.reference("ows") }

fn quote() -> Rule { Rule::literal("\"").void() }

fn closing_quote() -> Rule { quote().error("Missing terminating quote") }

pub fn grammar(ctx: &Context) -> Result<Grammar, GrammarError> {
    let pattern = |source: &str| ctx.pattern(source).map(Rule::pattern);
    let mut r = Resolver::new();

    let modules = r.reference("modules");
    let rules = r.reference("rules");
    r.rule("grammar", Rule::sequence([modules, rules]))?;

    r.rule("whitespace", pattern(r"[[:space:]]+|/\*(?:.|\r?\n)*?\*/|//.*(?:\r?\n|$)")?.void())?;
    let whitespace = r.reference("whitespace");
    r.rule("ows", whitespace.zero_or_more().void())?;

    r.rule("quantifier", Rule::set("*+?"))?;
    r.rule("negated", Rule::literal("!"))?;
    r.rule("transient", Rule::literal("~"))?;
    r.rule("void", Rule::literal("-"))?;
    r.rule("lookahead", Rule::literal(">>"))?;

    // strings
    r.rule("terminalBody", pattern(r#"(\\.|[^"\\\n])+"#)?)?;
    r.rule("stringBody", pattern(r#"(\\.|[^"\\\n])*"#)?.pinned())?;
    let string_body = r.reference("stringBody");
    r.rule("string", Rule::sequence([quote(), string_body, closing_quote()]))?;
    let terminal_body = r.reference("terminalBody").error("Terminals must have at least one character");
    r.rule("terminalString", Rule::sequence([quote(), terminal_body, closing_quote()]))?;

    // character sets and ranges
    r.rule("characterSetName", Rule::one_of_literals(SetName::ALL.iter().map(|s| s.name())))?;
    let set_name = r.reference("characterSetName").error("Unknown character set");
    r.rule("characterSet", Rule::sequence([Rule::literal(".").void(), set_name]))?;
    r.rule("rangeOperator", Rule::sequence([
        Rule::literal(".."),
        Rule::literal(".").error("Expected ... in character range"),
    ]).void())?;
    let range = [
        r.reference("terminalString"),
        r.reference("rangeOperator"),
        r.reference("terminalString").error("Range must be terminated"),
    ];
    r.rule("characterRange", Rule::sequence(range))?;

    // literals
    r.rule("number", Rule::sequence([
        Rule::set("-+").optional(),
        Rule::set(SetName::DecimalDigit).one_or_more(),
    ]))?;
    r.rule("boolean", Rule::one_of_literals(["true", "false"]))?;
    let literals = [r.reference("string"), r.reference("number"), r.reference("boolean")];
    r.rule("literal", Rule::one_of(literals))?;

    // annotations
    let value = Rule::sequence([
        Rule::literal("(").void(),
        r.reference("literal").error("A value must be specified or the () omitted"),
        Rule::literal(")").void().error("Missing ')'"),
    ]);
    let annotation = [
        Rule::literal("@").void(),
        r.reference("label").error("Expected an annotation label"),
        value.optional(),
    ];
    r.rule("annotation", Rule::sequence(annotation))?;
    let annotations = Rule::sequence([r.reference("annotation"), ows(&mut r)]).one_or_more();
    r.rule("annotations", annotations)?;
    r.rule("customLabel", Rule::sequence([
        Rule::set(identifier_start()),
        Rule::set(identifier_continue()).zero_or_more(),
    ]))?;
    r.rule("definedLabel", Rule::sequence([
        Rule::one_of_literals(["token", "error", "void", "transient", "pin"]),
        Rule::set(identifier_continue()).not(),
    ]))?;
    let labels = [r.reference("definedLabel"), r.reference("customLabel")];
    r.rule("label", Rule::one_of(labels))?;

    // regular expressions; a `/` followed by `*` or `/` starts a comment
    r.rule("regexBody", pattern(r"(\\.|[^\\/\n])+")?)?;
    let regex = [
        Rule::literal("/").void(),
        Rule::literal("*").not(),
        Rule::literal("/").not(),
        r.reference("regexBody"),
        Rule::literal("/").void().error("Missing terminating '/'"),
    ];
    r.rule("regex", Rule::sequence(regex))?;

    let terminals = [
        r.reference("characterSet"),
        r.reference("characterRange"),
        r.reference("terminalString"),
        r.reference("regex"),
    ];
    r.rule("terminal", Rule::one_of(terminals))?;

    // expressions
    let group = r.recursive("group", |r| Ok(Rule::sequence([
        Rule::literal("(").void(),
        ows(r),
        r.reference("expression"),
        ows(r),
        Rule::literal(")").void().error("Expected ')'"),
    ])))?;
    r.rule("identifier", pattern(r"[[:alpha:]]\w*|_\w*")?)?;

    let prefix = Rule::one_of([r.reference("lookahead"), r.reference("transient"), r.reference("void")]);
    let not_definition = Rule::sequence([ows(&mut r), Rule::literal("=")]).not();
    let body = Rule::one_of([
        group,
        r.reference("terminal"),
        Rule::sequence([r.reference("identifier"), not_definition]),
    ]);
    let element = [
        r.reference("annotations").optional(),
        prefix.optional(),
        r.reference("negated").optional(),
        body,
        r.reference("quantifier").optional(),
    ];
    r.rule("element", Rule::sequence(element))?;

    r.rule("assignmentOperators", Rule::one_of_literals(["=", "+=", "|="]))?;
    let or = Rule::sequence([ows(&mut r), Rule::literal("|"), ows(&mut r)]);
    r.rule("or", or.void())?;
    let then = Rule::one_of([
        Rule::sequence([ows(&mut r), Rule::literal("+"), ows(&mut r)]),
        r.reference("whitespace").one_or_more(),
    ]);
    r.rule("then", then.void())?;

    let expected_element = "Expected terminal, identifier, or group";
    let choice = [
        r.reference("element"),
        Rule::sequence([r.reference("or"), r.reference("element").error(expected_element)]).one_or_more(),
    ];
    r.rule("choice", Rule::sequence(choice))?;
    let new_rule = [
        r.reference("annotations").optional(),
        Rule::one_of([r.reference("transient"), r.reference("void")]).optional(),
        r.reference("identifier"),
        ows(&mut r),
        r.reference("assignmentOperators"),
    ];
    r.rule("notNewRule", Rule::sequence(new_rule).not())?;
    let sequence = [
        r.reference("element"),
        Rule::sequence([
            r.reference("then"),
            r.reference("notNewRule"),
            r.reference("element").error(expected_element),
        ]).one_or_more(),
    ];
    r.rule("sequence", Rule::sequence(sequence))?;
    let expressions = [r.reference("choice"), r.reference("sequence"), r.reference("element")];
    r.rule("expression", Rule::one_of(expressions))?;

    // rules
    let lhs = [
        ows(&mut r),
        r.reference("annotations").optional(),
        r.reference("transient").optional(),
        r.reference("void").optional(),
        r.reference("identifier"),
        ows(&mut r),
        r.reference("assignmentOperators"),
    ];
    r.rule("lhs", Rule::sequence(lhs).transient())?;
    let rule = [
        r.reference("lhs"),
        ows(&mut r),
        r.reference("expression").error("Expected expression"),
        ows(&mut r),
    ];
    r.rule("rule", Rule::sequence(rule))?;

    // modules
    r.rule("moduleName", Rule::sequence([
        Rule::set(identifier_start()),
        Rule::set(identifier_continue()).zero_or_more(),
    ]))?;
    let import = [
        ows(&mut r),
        Rule::literal("import"),
        Rule::set(SetName::Whitespace).one_or_more(),
        r.reference("moduleName"),
        r.reference("whitespace").one_or_more(),
    ];
    r.rule("moduleImport", Rule::sequence(import))?;
    let modules = r.reference("moduleImport").zero_or_more();
    r.rule("modules", modules)?;
    let rules = r.reference("rule").one_or_more().error("Expected at least one rule");
    r.rule("rules", rules)?;

    r.finish(&["grammar"])
}

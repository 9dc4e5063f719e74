use super::*;

use expect_test::expect;

mod error;
mod fixes;

pub(crate) fn compiled(source: &str) -> Grammar {
    compiled_with(source, &Context::standard())
}

pub(crate) fn compiled_with(source: &str, ctx: &Context) -> Grammar {
    match crate::stlr::compile(source, ctx) {
        Ok(compiled) => compiled.grammar,
        Err(errors) => panic!("grammar failed to compile:\n{}", errors.rendered()),
    }
}

pub(crate) fn compile_errors(source: &str) -> Vec<LanguageError> {
    match crate::stlr::compile(source, &Context::standard()) {
        Ok(_) => vec![],
        Err(errors) => errors,
    }
}

pub(crate) fn tokens(grammar: &Grammar, source: &str) -> Vec<(String, String, usize)> {
    let tokens = grammar.scan(source).unwrap();
    tokens.into_iter().map(|t| (t.label.to_string(), t.matched, t.offset)).collect()
}

pub(crate) fn t(label: &str, matched: &str, offset: usize) -> (String, String, usize) {
    (label.to_string(), matched.to_string(), offset)
}

const ASSIGNMENT: &str = r#"
assignment = target eq value
~target = name ("." name)*
@void eq = "="
name = .letter+
value = .decimalDigit+
"#;

#[test]
fn parse_tree_outline() {
    let g = compiled(ASSIGNMENT);
    expect![[r#"
        root
          assignment
            name "a"
            name "b"
            value "12"
    "#]].assert_eq(&g.parse("a.b=12").rendered());
}

#[test]
fn parse_tree_notation() {
    let g = compiled(ASSIGNMENT);
    let tree = g.parse("xy=3").unwrap();
    assert_eq!(tree.root.to_string(), r#"root(assignment(name"xy" value"3"))"#);
}

#[test]
fn parse_failure_renders_error() {
    let g = compiled(ASSIGNMENT);
    expect!["error: Expected .decimalDigit from 2 to 2"].assert_eq(&g.parse("a=").rendered());
}

#[test]
fn token_stream() {
    let g = compiled(r#"
        word = .letter+
        number = .decimalDigit+
        @void space = .whitespace+
    "#);
    assert_eq!(tokens(&g, "ab 12 c"), vec![t("word", "ab", 0), t("number", "12", 3), t("word", "c", 6)]);
}

#[test]
fn token_stream_rendered() {
    let g = compiled(ASSIGNMENT);
    let tokens = g.scan("a.b=12").unwrap();
    expect![[r#"
        assignment@0 "a.b=12"
          name@0 "a"
          name@2 "b"
          value@4 "12"
    "#]].assert_eq(&tokens.rendered());
}

#[test]
fn token_visitor_can_stop() {
    let g = compiled("word = .letter+\n@void space = .whitespace+\n");
    let mut seen = vec![];
    g.visit_tokens("one two three", |t| { seen.push(t.matched.clone()); seen.len() < 2 }).unwrap();
    assert_eq!(seen, vec!["one", "two"]);
}

#[test]
fn hand_built_grammar() {
    let ctx = Context::default();
    let mut r = Resolver::new();
    let item = r.reference("item");
    let ows = Rule::set(SetName::Whitespace).zero_or_more();
    r.rule("list", Rule::sequence([
        Rule::literal("["),
        ows.clone(),
        Rule::sequence([item, ows]).zero_or_more(),
        Rule::literal("]"),
    ])).unwrap();
    r.rule("item", Rule::pattern(ctx.pattern("[0-9]+").unwrap())).unwrap();
    let g = r.finish(&["list"]).unwrap();

    expect![[r#"
        root
          list
            item "1"
            item "22"
    "#]].assert_eq(&g.parse("[1 22]").rendered());
    assert_eq!(ctx.cached_patterns(), 1);
}

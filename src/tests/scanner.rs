// This is actually defined at `crate::scanner::tests_for_scanner`

use crate::scanner::*;
use crate::tests::*;
use crate::{CharacterSet, Context, LanguageError, Resolver, Rule, SetName, Span};

fn single(rule: Rule) -> Grammar {
    let mut r = Resolver::new();
    r.rule("start", rule).unwrap();
    r.finish(&[]).unwrap()
}

#[test]
fn choice_is_ordered_and_commits() {
    let g = single(Rule::sequence([Rule::one_of_literals(["a", "ab"]), Rule::literal("c")]));
    assert!(g.matches("ac"));
    // the first alternative wins and is not revisited when what follows fails
    assert!(!g.matches("abc"));
}

#[test]
fn repetition_is_greedy() {
    let g = single(Rule::sequence([Rule::literal("a").zero_or_more(), Rule::literal("a")]));
    assert!(!g.matches("aaa"));
}

#[test]
fn bounded_repetition() {
    let g = single(Rule::set(SetName::DecimalDigit).repeated(2, Some(3)));
    assert!(!g.matches("1"));
    assert!(g.matches("12"));
    assert!(g.matches("123"));
    assert!(!g.matches("1234"));
}

#[test]
fn repetition_of_nothing_terminates() {
    let g = single(Rule::literal("a").optional().zero_or_more());
    assert!(g.matches(""));
    assert!(g.matches("aa"));
    assert!(!g.matches("ab"));
}

#[test]
fn predicates_consume_nothing() {
    let ident = single(Rule::sequence([Rule::literal("let").not(), Rule::set(SetName::Letter).one_or_more()]));
    assert!(ident.matches("abc"));
    assert!(ident.matches("le"));
    assert!(!ident.matches("lets"));

    let ahead = single(Rule::sequence([Rule::literal("ab").lookahead(), Rule::set(SetName::Letter).one_or_more()]));
    assert!(ahead.matches("abc"));
    assert!(!ahead.matches("ba"));
}

#[test]
fn failures_inside_predicates_are_not_diagnostics() {
    // the predicate gets as far as 2 before failing; the reported failure is at 1
    let probe = Rule::sequence([Rule::literal("a"), Rule::literal("b"), Rule::literal("x")]);
    let g = single(Rule::sequence([probe.not(), Rule::literal("a"), Rule::literal("c")]));
    let err = g.parse("abq").unwrap_err();
    assert_eq!(err.span(), Span::at(1));
    assert_eq!(err.message(), r#"Expected "c""#);
}

#[test]
fn character_ranges() {
    let g = single(Rule::set(CharacterSet::Range('a', 'f')).one_or_more());
    assert!(g.matches("cafe"));
    assert!(!g.matches("cage"));
}

#[test]
fn offsets_count_scalars() {
    let ctx = Context::default();
    let mut r = Resolver::new();
    r.rule("word", Rule::pattern(ctx.pattern(r"\w+").unwrap())).unwrap();
    r.rule("space", Rule::set(SetName::Whitespace).one_or_more().void()).unwrap();
    let g = r.finish(&[]).unwrap();
    assert_eq!(tokens(&g, "héllo wörld"), vec![t("word", "héllo", 0), t("word", "wörld", 6)]);

    let tree = g.parse("héllo").unwrap();
    assert_eq!(tree.top().unwrap().span, Span::new(0, 5));
}

#[test]
fn token_mode_skips_matches_of_nothing() {
    let mut r = Resolver::new();
    r.rule("number", Rule::set(SetName::DecimalDigit).zero_or_more()).unwrap();
    r.rule("word", Rule::set(SetName::Letter).one_or_more()).unwrap();
    let g = r.finish(&[]).unwrap();
    assert_eq!(tokens(&g, "ab12"), vec![t("word", "ab", 0), t("number", "12", 2)]);
}

#[test]
fn token_mode_reports_unmatched_input() {
    let mut r = Resolver::new();
    r.rule("number", Rule::set(SetName::DecimalDigit).one_or_more()).unwrap();
    r.rule("word", Rule::set(SetName::Letter).one_or_more()).unwrap();
    let g = r.finish(&[]).unwrap();
    let err = g.scan("ab!").unwrap_err();
    assert!(matches!(err, LanguageError::Parsing { .. }));
    assert_eq!(err.to_string(), "Expected .decimalDigit from 2 to 2");
}

#[test]
fn error_annotation_replaces_failure() {
    let g = single(Rule::sequence([
        Rule::literal("\""),
        Rule::set(SetName::Letter).zero_or_more(),
        Rule::literal("\"").error("Missing terminating quote"),
    ]));
    let err = g.parse("\"abc").unwrap_err();
    assert!(err.is_semantic());
    assert_eq!(err.to_string(), "Missing terminating quote from 4 to 4");
}

#[test]
fn semantic_error_survives_later_alternatives() {
    let string = Rule::sequence([
        Rule::literal("\""),
        Rule::set(SetName::Letter).zero_or_more(),
        Rule::literal("\"").error("Missing terminating quote"),
    ]);
    let g = single(Rule::one_of([string, Rule::literal("x")]));
    let err = g.parse("\"abc").unwrap_err();
    assert_eq!(err.message(), "Missing terminating quote");
}

#[test]
fn deeper_failure_outranks_error_annotation() {
    let g = single(Rule::sequence([Rule::literal("("), Rule::literal("x"), Rule::literal(")")]).error("Bad group"));
    let err = g.parse("(x").unwrap_err();
    assert_eq!(err.span(), Span::at(2));
    assert_eq!(err.message(), r#"Expected ")""#);

    let err = g.parse("").unwrap_err();
    assert!(err.is_semantic());
    assert_eq!(err.to_string(), "Bad group from 0 to 0");
}

#[test]
fn left_recursion_is_reported() {
    let mut r = Resolver::new();
    let a = r.reference("a");
    r.rule("a", Rule::sequence([a, Rule::literal("x")])).unwrap();
    let g = r.finish(&[]).unwrap();
    let err = g.parse("xx").unwrap_err();
    assert!(matches!(err, LanguageError::Scanning { .. }));
    assert_eq!(err.message(), "Left recursion in rule `a`");
}

#[test]
fn left_recursive_alternative_falls_through() {
    let mut r = Resolver::new();
    let expr = r.reference("expr");
    r.rule("expr", Rule::one_of([
        Rule::sequence([expr, Rule::literal("+"), Rule::literal("1")]),
        Rule::literal("1"),
    ])).unwrap();
    let g = r.finish(&[]).unwrap();
    assert!(g.matches("1"));
    assert_eq!(g.parse("1+1").unwrap_err().to_string(), "Unexpected input from 1 to 3");
}

#[test]
fn rule_defined_as_itself() {
    let mut r = Resolver::new();
    let b = r.reference("b");
    let a = r.reference("a");
    r.rule("a", b).unwrap();
    r.rule("b", a).unwrap();
    let g = r.finish(&["a"]).unwrap();
    let err = g.parse("").unwrap_err();
    assert!(matches!(err, LanguageError::Scanning { .. }));
    assert_eq!(err.message(), "Rule `a` is defined as itself");
}

#[test]
fn empty_matches_produce_nothing_unless_pinned() {
    for (pinned, expected) in [(false, "root(list\"[]\")"), (true, "root(list(items\"\"))")] {
        let mut r = Resolver::new();
        let items = r.reference("items");
        r.rule("list", Rule::sequence([Rule::literal("["), items, Rule::literal("]")])).unwrap();
        let letters = Rule::set(SetName::Letter).zero_or_more();
        r.rule("items", if pinned { letters.pinned() } else { letters }).unwrap();
        let g = r.finish(&["list"]).unwrap();
        assert_eq!(g.parse("[]").unwrap().root.to_string(), expected);
    }
}

#[test]
fn token_annotation_relabels() {
    let g = single(Rule::sequence([
        Rule::set(SetName::Letter).one_or_more().token("name"),
        Rule::literal("=").void(),
        Rule::set(SetName::DecimalDigit).one_or_more().labelled("value"),
    ]));
    assert_eq!(g.parse("x=1").unwrap().root.to_string(), r#"root(start(name"x" value"1"))"#);
}

#[test]
fn transient_keeps_children() {
    let mut r = Resolver::new();
    let digit = Rule::set(SetName::DecimalDigit).labelled("digit");
    r.rule("digits", Rule::sequence([digit.clone(), digit]).transient()).unwrap();
    let g = r.finish(&[]).unwrap();
    assert_eq!(g.parse("12").unwrap().root.to_string(), r#"root(digit"1" digit"2")"#);
}

#[test]
fn token_depths() {
    let g = single(Rule::sequence([
        Rule::sequence([Rule::set(SetName::Letter).labelled("letter")]).labelled("word"),
        Rule::set(SetName::DecimalDigit).labelled("digit"),
    ]));
    let depths: Vec<(String, usize)> = g.scan("a1").unwrap().into_iter().map(|t| (t.label.to_string(), t.depth)).collect();
    assert_eq!(depths, vec![("start".to_string(), 0), ("word".to_string(), 1), ("letter".to_string(), 2), ("digit".to_string(), 1)]);
}

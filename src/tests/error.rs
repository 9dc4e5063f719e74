use super::*;

fn caret(prefix: &str, column: usize) -> String {
    " ".repeat(prefix.chars().count() + column) + "^"
}

#[test]
fn formatted_points_at_the_column() {
    let source = "let x = ?";
    let err = LanguageError::parsing(Span::at(8), "Expected expression");
    let prefix = "Expected expression at line 1, column 9: ";
    assert_eq!(err.formatted(source), format!("{prefix}let x = ?\n{}", caret(prefix, 8)));
}

#[test]
fn formatted_later_line() {
    let source = "first\nsecond line\nthird";
    let err = LanguageError::parsing(Span::new(6, 7), "Unexpected input");
    let prefix = "Unexpected input at line 2, column 1: ";
    assert_eq!(err.formatted(source), format!("{prefix}second line\n{}", caret(prefix, 0)));
}

#[test]
fn formatted_at_end_of_input() {
    let err = LanguageError::semantic(Span::at(3), "Missing terminating quote");
    let prefix = "Missing terminating quote at line 1, column 3: ";
    assert_eq!(err.formatted("\"ab"), format!("{prefix}\"ab\n{}", caret(prefix, 2)));
}

#[test]
fn formatted_multibyte() {
    let err = LanguageError::parsing(Span::at(2), "Oops");
    let prefix = "Oops at line 1, column 3: ";
    assert_eq!(err.formatted("éé!"), format!("{prefix}éé!\n{}", caret(prefix, 2)));
}

#[test]
fn display() {
    expect!["Missing terminating quote from 4 to 4"]
        .assert_eq(&LanguageError::semantic(Span::at(4), "Missing terminating quote").to_string());
    expect!["Rule `b` is not reachable from `a` from 8 to 9"]
        .assert_eq(&LanguageError::warning(Span::new(8, 9), "Rule `b` is not reachable from `a`").to_string());
}

#[test]
fn ranking() {
    let near = LanguageError::parsing(Span::at(2), "near");
    let far = LanguageError::parsing(Span::at(5), "far");
    let authored = LanguageError::semantic(Span::at(2), "authored");
    assert!(far.outranks(&near));
    assert!(!near.outranks(&far));
    assert!(far.outranks(&authored));
    assert!(authored.outranks(&near));
    assert!(!near.outranks(&authored));
    assert!(!near.outranks(&near.clone()));
    let enclosing = LanguageError::semantic(Span::new(2, 4), "enclosing");
    assert!(enclosing.outranks(&authored));
}

#[test]
fn equality_ignores_kind() {
    let parsing = LanguageError::parsing(Span::at(1), "x");
    let semantic = LanguageError::semantic(Span::at(1), "x");
    assert_eq!(parsing, semantic);
    assert_ne!(parsing, LanguageError::parsing(Span::at(2), "x"));
}

#[test]
fn grammar_errors_become_semantic() {
    let err: LanguageError = GrammarError::Unbound("x".to_string()).into();
    assert!(err.is_semantic());
    assert_eq!(err.message(), "rule `x` was referenced but never defined");
    assert_eq!(err.referencing(), None);
}

#[test]
fn errors_render_one_per_line() {
    let errors = vec![
        LanguageError::semantic(Span::at(0), "first"),
        LanguageError::parsing(Span::new(1, 2), "second"),
    ];
    expect![[r#"
        first from 0 to 0
        second from 1 to 2
    "#]].assert_eq(&errors.rendered());
}

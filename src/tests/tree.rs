// This is actually defined at `crate::node::tree::tests_for_tree`

use crate::node::tree::*;
use crate::tests::*;
use crate::{Annotation, AnnotationValue, Rendered};

use expect_test::expect;

const KEY_VALUES: &str = r#"
pairs = pair (@void ";" pair)*
pair = key @void ":" value
key = .letter+
~value = number | word
number = .decimalDigit+
word = .letter+
"#;

#[test]
fn root_spans_the_whole_input() {
    let g = compiled(KEY_VALUES);
    let tree = g.parse("a:1;b:c").unwrap();
    assert_eq!(tree.root.label, "root");
    assert_eq!(tree.root.span.end, 7);
    assert_eq!(tree.root.matched, "a:1;b:c");
    expect![[r#"
        root
          pairs
            pair
              key "a"
              number "1"
            pair
              key "b"
              word "c"
    "#]].assert_eq(&tree.rendered());
}

#[test]
fn custom_root_label() {
    let g = compiled(KEY_VALUES);
    let tree = AbstractSyntaxTreeConstructor::new(&g).with_root_label("document").build("a:1").unwrap();
    assert_eq!(tree.root.label, "document");
    assert_eq!(tree.top().unwrap().label, "pairs");
}

#[test]
fn trailing_input_is_an_error() {
    let g = compiled(KEY_VALUES);
    let err = g.parse("a:1;").unwrap_err();
    assert_eq!(err.span().start, 4);
    assert!(!err.is_warning());
}

#[test]
fn empty_input_needs_a_match() {
    let g = compiled(KEY_VALUES);
    let err = g.parse("").unwrap_err();
    assert_eq!(err.to_string(), "Expected .letter from 0 to 0");
}

#[test]
fn preorder_and_find() {
    let g = compiled(KEY_VALUES);
    let tree = g.parse("a:1;b:c").unwrap();
    let labels: Vec<&str> = tree.root.preorder().iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["root", "pairs", "pair", "key", "number", "pair", "key", "word"]);
    assert_eq!(tree.root.find("word").unwrap().matched, "c");
    let pairs = tree.top().unwrap();
    assert_eq!(pairs.children_labelled("pair").count(), 2);
    assert!(pairs.child("key").is_none());
}

#[test]
fn custom_annotations_reach_the_tree() {
    let g = compiled("list = @kind(\"digit\") digit digit\ndigit = .decimalDigit\n");
    let tree = g.parse("12").unwrap();
    let digit = tree.root.find("digit").unwrap();
    let kind = Annotation::Custom("kind".to_string());
    assert_eq!(digit.annotations.get(&kind), Some(&AnnotationValue::String("digit".to_string())));
    // only custom annotations are kept
    assert_eq!(tree.top().unwrap().annotations.len(), 0);
}

#[test]
fn transient_entry_decodes_the_root() {
    let g = compiled("~items = item+\nitem = .letter\n");
    let tree = g.parse("ab").unwrap();
    assert!(tree.top().is_none());
    let items: crate::Node = tree.decode().unwrap();
    assert_eq!(items.label, "root");
    assert_eq!(items.children.len(), 2);
}

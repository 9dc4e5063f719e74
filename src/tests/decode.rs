// This is actually defined at `crate::decode::tests_for_decode`

use crate::decode::*;
use crate::tests::*;
use crate::{DecodingError, Node, ParseIntoError, Span};

const SETTINGS: &str = r#"
setting = path @void "=" @error("Expected a value") value
~path = name (@void "." name)*
name = .letter+
value = number | flag | word
number = "-"? .decimalDigit+
flag = "on" | "off"
word = .letter+
"#;

#[derive(Clone, Debug, PartialEq)]
enum Value {
    Number(i64),
    Flag(bool),
    Word(String),
}

impl Decode for Value {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        Sum::new(node, "Value")
            .or_child("number", |n| i64::decode(n).map(Value::Number))
            .or_child("flag", |n| spelled(n, "Flag", &[("on", true), ("off", false)]).map(Value::Flag))
            .or_child("word", |n| String::decode(n).map(Value::Word))
            .end()
    }
}

impl Encode for Value {
    fn encode(&self, label: &str) -> Node {
        let child = match self {
            Value::Number(n) => n.encode("number"),
            Value::Flag(b) => (if *b { "on" } else { "off" }).to_string().encode("flag"),
            Value::Word(w) => w.encode("word"),
        };
        composite(label, vec![child])
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Setting {
    path: Vec<String>,
    value: Value,
}

impl Decode for Setting {
    fn decode(node: &Node) -> Result<Self, DecodingError> {
        let record = Record::new(node, "Setting");
        Ok(Setting { path: record.sequence("name")?, value: record.required("value")? })
    }
}

impl Encode for Setting {
    fn encode(&self, label: &str) -> Node {
        let mut children: Vec<Node> = self.path.iter().map(|p| p.encode("name")).collect();
        children.push(self.value.encode("value"));
        composite(label, children)
    }
}

#[test]
fn decode_record() {
    let g = compiled(SETTINGS);
    let setting: Setting = g.parse_into("server.port=-8080").unwrap();
    assert_eq!(setting, Setting { path: vec!["server".into(), "port".into()], value: Value::Number(-8080) });
}

#[test]
fn sum_alternatives_in_order() {
    let g = compiled(SETTINGS);
    let value = |source: &str| g.parse_into::<Setting>(source).unwrap().value;
    assert_eq!(value("a=on"), Value::Flag(true));
    assert_eq!(value("a=off"), Value::Flag(false));
    assert_eq!(value("a=12"), Value::Number(12));
    assert_eq!(value("a=hello"), Value::Word("hello".into()));
    // `flag` matches the `on` of `onward` and is not revisited
    assert!(g.parse("a=onward").is_err());
}

#[test]
fn reencoded_value_decodes_equal() {
    let g = compiled(SETTINGS);
    let setting: Setting = g.parse_into("a.b.c=off").unwrap();
    let node = setting.encode("setting");
    assert_eq!(node.matched, "abcoff");
    assert_eq!(Setting::decode(&node).unwrap(), setting);
}

#[test]
fn missing_field() {
    let node = composite("setting", vec!["a".to_string().encode("name")]);
    let err = Setting::decode(&node).unwrap_err();
    assert_eq!(err, DecodingError::ValueNotFound { field: "value".into(), type_name: "Setting" });
    assert_eq!(err.to_string(), "value not found: no `value` for Setting");
}

#[test]
fn no_alternative() {
    let node = composite("value", vec![]);
    let err = Value::decode(&node).unwrap_err();
    assert_eq!(err.to_string(), "tried to decode one of number, flag, word as Value but found none of those");
}

#[test]
fn type_mismatch() {
    let node = Node::new("number", Span::new(3, 6), "abc");
    let err = i64::decode(&node).unwrap_err();
    assert_eq!(err.to_string(), "expected i64 but found `abc` at 3..6");
    assert!(bool::decode(&Node::new("flag", Span::default(), "yes")).is_err());
}

#[test]
fn optional_and_flag_fields() {
    let node = composite("setting", vec!["a".to_string().encode("name")]);
    let record = Record::new(&node, "Setting");
    assert_eq!(record.optional::<String>("value").unwrap(), None);
    assert_eq!(record.optional::<String>("name").unwrap(), Some("a".to_string()));
    assert!(record.flag("name"));
    assert!(!record.flag("value"));
}

#[test]
fn parse_into_reports_both_kinds_of_failure() {
    let g = compiled(SETTINGS);
    match g.parse_into::<Setting>("a=") {
        Err(ParseIntoError::Language(err)) => assert_eq!(err.message(), "Expected a value"),
        other => panic!("expected a language error, got {:?}", other),
    }
    match g.parse_into::<i64>("a=1") {
        Err(ParseIntoError::Decoding(DecodingError::TypeMismatch { found, .. })) => assert_eq!(found, "a=1"),
        other => panic!("expected a decoding error, got {:?}", other),
    }
}

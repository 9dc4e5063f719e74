use super::*;

// A quantifier on one rule must not leak into the rule that follows it.
#[test]
fn quantifier_leak() {
    let g = compiled_with("number  = .decimalDigit*\n keyword = \"import\" | \"wibble\"", &Context::default());
    assert_eq!(g.top_level().len(), 2);
    assert_eq!(g.describe("number").unwrap(), "number = .decimalDigit*");
    assert_eq!(g.describe("keyword").unwrap(), r#"keyword = "import" | "wibble""#);
}

// An inlined identifier keeps the `@void` of the rule it names.
#[test]
fn inlined_identifier_keeps_void() {
    let grammar = "@void inlined = \"/\"\nexpr = inlined !inlined+ inlined";
    let g = compiled_with(grammar, &Context::default().with_optimization(InlineIdentifiers));
    assert_eq!(g.describe("expr").unwrap(), r#"expr = @void "/" (!inlined)+ @void "/""#);
}

// Folding a choice of a character set and a single character keeps both.
#[test]
fn character_set_omission() {
    let mut g = compiled_with("variableStart = .letter | \"_\"", &Context::default());
    assert_eq!(g.top_level().len(), 1);
    assert_eq!(g.describe("variableStart").unwrap(), r#"variableStart = .letter | "_""#);
    Context::default().with_optimization(FoldCharacterSetChoices).optimize(&mut g);
    assert_eq!(g.describe("variableStart").unwrap(), r#"variableStart = (.letter|"_")"#);
}

// Multi-character literals are never folded into a character set.
#[test]
fn bad_folding() {
    let mut g = compiled_with("operators = \":=\" | \";\"", &Context::default());
    assert_eq!(g.top_level().len(), 1);
    assert_eq!(g.describe("operators").unwrap(), r#"operators = ":=" | ";""#);
    Context::default().with_optimization(FoldCharacterSetChoices).optimize(&mut g);
    assert_eq!(g.describe("operators").unwrap(), r#"operators = ":=" | ";""#);
}

// Overriding the token of an identifier gives a copy of the rule under the new
// name, not a rule wrapping the original.
#[test]
fn token_override() {
    let source = r#"letter          = .letter
doubleLetter    = letter "+" letter
phrase          = doubleLetter .whitespace @token("doubleLetter2") doubleLetter"#;
    let g = compiled_with(source, &Context::default());
    assert_eq!(g.describe_expression("doubleLetter").unwrap(), g.describe_expression("doubleLetter2").unwrap());
}

// The same, scanned as a token stream.
#[test]
fn quantifier_stays_with_its_rule_in_token_mode() {
    let g = compiled("number = .decimalDigit*\nkeyword = \"import\" | \"wibble\"\n");
    assert_eq!(g.describe("number").unwrap(), "number = .decimalDigit*");
    assert_eq!(g.describe("keyword").unwrap(), r#"keyword = "import" | "wibble""#);
    // in token mode `number` matches nothing here, so `keyword` gets its turn
    assert_eq!(tokens(&g, "import"), vec![t("keyword", "import", 0)]);
}

#[test]
fn inlining_under_negation_with_every_pass() {
    let g = compiled("expr = inlined !inlined+ inlined\n@void inlined = \"/\"\n");
    assert_eq!(g.describe_expression("expr").unwrap(), r#"@void "/" (!inlined)+ @void "/""#);
}

#[test]
fn folded_choice_keeps_every_alternative() {
    let g = compiled("variableStart = .letter | \"_\"\n");
    assert_eq!(g.describe("variableStart").unwrap(), r#"variableStart = (.letter|"_")"#);
    assert!(g.matches("x"));
    assert!(g.matches("_"));
}

#[test]
fn multi_character_alternatives_are_not_folded() {
    let g = compiled("operators = \":=\" | \";\"\n");
    assert_eq!(g.describe("operators").unwrap(), r#"operators = ":=" | ";""#);
    assert!(g.matches(":="));
    assert!(!g.matches(":"));
}

// `@token("x") y` produces `y`'s match under the label `x`.
#[test]
fn token_override_of_a_terminal() {
    let g = compiled("word = @token(\"initial\") letter letter*\nletter = .letter\n");
    assert_eq!(g.describe_expression("initial").unwrap(), g.describe_expression("letter").unwrap());
    assert_eq!(g.describe("initial").unwrap(), "initial = .letter");
    assert_eq!(g.parse("abc").unwrap().root.to_string(), r#"root(word(initial"a" letter"b" letter"c"))"#);
}

#[test]
fn empty_input_fails() {
    let g = compiled("items = item+\nitem = .letter\n");
    assert!(g.parse("").is_err());
    assert!(!g.matches(""));
}

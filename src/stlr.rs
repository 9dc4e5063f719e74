//! STLR, the grammar notation, applied to itself.
//!
//! [`grammar`] builds the STLR grammar with the rule algebra; parsing a grammar
//! written in STLR with it and decoding the tree gives the [`ast`]; [`compile`]
//! turns that into a [`Grammar`](crate::Grammar).

pub mod ast;
mod compile;
mod grammar;

pub use compile::{compile, parse, Compiled};
pub use grammar::grammar;

/// The STLR grammar, in STLR.
pub const STLR_SOURCE: &str = r##"// STLR, in STLR
grammar = modules rules

@void whitespace = /[[:space:]]+|\/\*(?:.|\r?\n)*?\*\/|\/\/.*(?:\r?\n|$)/
@void ows = whitespace*

quantifier = "*" | "+" | "?"
negated = "!"
transient = "~"
void = "-"
lookahead = ">>"

terminalBody = /(\\.|[^"\\\n])+/
@pin stringBody = /(\\.|[^"\\\n])*/
string = @void "\"" stringBody @error("Missing terminating quote") @void "\""
terminalString = @void "\"" @error("Terminals must have at least one character") terminalBody @error("Missing terminating quote") @void "\""

characterSetName = "letter" | "uppercaseLetter" | "lowercaseLetter" | "alphaNumeric" | "decimalDigit" | "whitespaceOrNewline" | "whitespace" | "newline" | "backslash"
characterSet = @void "." @error("Unknown character set") characterSetName
@void rangeOperator = ".." @error("Expected ... in character range") "."
characterRange = terminalString rangeOperator @error("Range must be terminated") terminalString

number = ("-" | "+")? .decimalDigit+
boolean = "true" | "false"
literal = string | number | boolean

annotation = @void "@" @error("Expected an annotation label") label (@void "(" @error("A value must be specified or the () omitted") literal @error("Missing ')'") @void ")")?
annotations = (annotation ows)+
customLabel = (.letter | "_") (.letter | "_" | .decimalDigit)*
definedLabel = ("token" | "error" | "void" | "transient" | "pin") !(.letter | "_" | .decimalDigit)
label = definedLabel | customLabel

regexBody = /(\\.|[^\\\/\n])+/
regex = @void "/" !"*" !"/" regexBody @error("Missing terminating '/'") @void "/"
terminal = characterSet | characterRange | terminalString | regex

group = @void "(" ows expression ows @error("Expected ')'") @void ")"
identifier = /[[:alpha:]]\w*|_\w*/
element = annotations? (lookahead | transient | void)? negated? (group | terminal | (identifier !(ows "="))) quantifier?

assignmentOperators = "=" | "+=" | "|="
@void or = ows "|" ows
@void then = (ows "+" ows) | whitespace+
choice = element (or @error("Expected terminal, identifier, or group") element)+
notNewRule = !(annotations? (transient | void)? identifier ows assignmentOperators)
sequence = element (then notNewRule @error("Expected terminal, identifier, or group") element)+
expression = choice | sequence | element

~lhs = ows annotations? transient? void? identifier ows assignmentOperators
rule = lhs ows @error("Expected expression") expression ows

moduleName = (.letter | "_") (.letter | "_" | .decimalDigit)*
moduleImport = ows "import" .whitespace+ moduleName whitespace+
modules = moduleImport*
@error("Expected at least one rule") rules = rule+
"##;

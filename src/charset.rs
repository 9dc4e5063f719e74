//! Character-set predicates for single-character terminals.

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum SetName {
    Letter,
    UppercaseLetter,
    LowercaseLetter,
    AlphaNumeric,
    DecimalDigit,
    WhitespaceOrNewline,
    Whitespace,
    Newline,
    Backslash,
}

impl SetName {
    /// Ordered so that no name is shadowed by a prefix of itself.
    pub const ALL: [SetName; 9] = [
        SetName::Letter,
        SetName::UppercaseLetter,
        SetName::LowercaseLetter,
        SetName::AlphaNumeric,
        SetName::DecimalDigit,
        SetName::WhitespaceOrNewline,
        SetName::Whitespace,
        SetName::Newline,
        SetName::Backslash,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SetName::Letter => "letter",
            SetName::UppercaseLetter => "uppercaseLetter",
            SetName::LowercaseLetter => "lowercaseLetter",
            SetName::AlphaNumeric => "alphaNumeric",
            SetName::DecimalDigit => "decimalDigit",
            SetName::WhitespaceOrNewline => "whitespaceOrNewline",
            SetName::Whitespace => "whitespace",
            SetName::Newline => "newline",
            SetName::Backslash => "backslash",
        }
    }

    pub fn from_name(name: &str) -> Option<SetName> {
        SetName::ALL.into_iter().find(|s| s.name() == name)
    }

    fn contains(self, c: char) -> bool {
        match self {
            SetName::Letter => c.is_alphabetic(),
            SetName::UppercaseLetter => c.is_uppercase(),
            SetName::LowercaseLetter => c.is_lowercase(),
            SetName::AlphaNumeric => c.is_alphanumeric(),
            SetName::DecimalDigit => c.is_ascii_digit(),
            SetName::WhitespaceOrNewline => c.is_whitespace(),
            SetName::Whitespace => c.is_whitespace() && !is_newline(c),
            SetName::Newline => is_newline(c),
            SetName::Backslash => c == '\\',
        }
    }
}

fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum CharacterSet {
    Named(SetName),
    Chars(Vec<char>),
    /// Inclusive at both ends.
    Range(char, char),
    Union(Vec<CharacterSet>),
}

impl From<SetName> for CharacterSet { fn from(s: SetName) -> Self { CharacterSet::Named(s) } }
impl From<char> for CharacterSet { fn from(c: char) -> Self { CharacterSet::Chars(vec![c]) } }
impl From<&str> for CharacterSet { fn from(s: &str) -> Self { CharacterSet::Chars(s.chars().collect()) } }

impl CharacterSet {
    pub fn contains(&self, c: char) -> bool {
        match self {
            CharacterSet::Named(name) => name.contains(c),
            CharacterSet::Chars(cs) => cs.contains(&c),
            CharacterSet::Range(lo, hi) => (*lo..=*hi).contains(&c),
            CharacterSet::Union(sets) => sets.iter().any(|s| s.contains(c)),
        }
    }

    /// Joins the two sets, keeping every member of both.
    pub fn union(self, other: CharacterSet) -> CharacterSet {
        match self {
            CharacterSet::Union(mut sets) => { sets.push(other); CharacterSet::Union(sets) }
            set => CharacterSet::Union(vec![set, other]),
        }
    }
}

impl std::fmt::Display for CharacterSet {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CharacterSet::Named(name) => write!(w, ".{}", name.name()),
            CharacterSet::Chars(cs) if cs.len() == 1 => write!(w, "\"{}\"", escaped(&cs[0].to_string())),
            CharacterSet::Chars(cs) => {
                let alternatives: Vec<String> = cs.iter().map(|c| format!("\"{}\"", escaped(&c.to_string()))).collect();
                write!(w, "({})", alternatives.join("|"))
            }
            CharacterSet::Range(lo, hi) => {
                write!(w, "\"{}\"...\"{}\"", escaped(&lo.to_string()), escaped(&hi.to_string()))
            }
            CharacterSet::Union(sets) => {
                let members: Vec<String> = sets.iter().map(|s| s.to_string()).collect();
                write!(w, "({})", members.join("|"))
            }
        }
    }
}

/// The inverse of `crate::util::normalize_escapes`.
pub(crate) fn escaped(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

use derive_more::{AsRef, Display, From};
use linear_map::LinearMap;

/// The name of the syntactic element a rule produces.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Debug, Display, From, AsRef)]
pub struct Label(pub(crate) String);

impl From<&str> for Label { fn from(s: &str) -> Self { Label(s.to_string()) } }

impl Label {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl PartialEq<str> for Label { fn eq(&self, other: &str) -> bool { self.0 == other } }
impl PartialEq<&str> for Label { fn eq(&self, other: &&str) -> bool { self.0 == *other } }

#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub enum Annotation {
    /// Overrides the label of the produced node.
    Token,
    /// Replaces a failure of the rule with the given message.
    Error,
    /// Matches but never produces a node.
    Void,
    /// Produces the children of the rule but not the rule's own node.
    Transient,
    /// Produces a node even when the rule matched nothing.
    Pinned,
    Custom(String),
}

impl Annotation {
    pub fn from_name(name: &str) -> Annotation {
        match name {
            "token" => Annotation::Token,
            "error" => Annotation::Error,
            "void" => Annotation::Void,
            "transient" => Annotation::Transient,
            "pin" => Annotation::Pinned,
            other => Annotation::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Annotation::Token => "token",
            Annotation::Error => "error",
            Annotation::Void => "void",
            Annotation::Transient => "transient",
            Annotation::Pinned => "pin",
            Annotation::Custom(name) => name,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum AnnotationValue {
    Set,
    String(String),
    Int(i64),
    Bool(bool),
    Label(Label),
}

impl From<&str> for AnnotationValue { fn from(s: &str) -> Self { AnnotationValue::String(s.to_string()) } }
impl From<String> for AnnotationValue { fn from(s: String) -> Self { AnnotationValue::String(s) } }
impl From<i64> for AnnotationValue { fn from(n: i64) -> Self { AnnotationValue::Int(n) } }
impl From<bool> for AnnotationValue { fn from(b: bool) -> Self { AnnotationValue::Bool(b) } }
impl From<Label> for AnnotationValue { fn from(l: Label) -> Self { AnnotationValue::Label(l) } }

impl AnnotationValue {
    fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            AnnotationValue::Label(l) => Some(l.as_str()),
            _ => None,
        }
    }
}

/// The annotations attached to one rule invocation. Insertion order is kept,
/// which is also the order they are rendered in.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Annotations(LinearMap<Annotation, AnnotationValue>);

impl Annotations {
    pub fn new() -> Self { Annotations(LinearMap::new()) }

    pub fn with(mut self, key: Annotation, value: impl Into<AnnotationValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    pub fn set(self, key: Annotation) -> Self {
        self.with(key, AnnotationValue::Set)
    }

    pub fn insert(&mut self, key: Annotation, value: AnnotationValue) -> Option<AnnotationValue> {
        self.0.insert(key, value)
    }

    pub fn remove(&mut self, key: &Annotation) -> Option<AnnotationValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &Annotation) -> Option<&AnnotationValue> { self.0.get(key) }
    pub fn contains(&self, key: &Annotation) -> bool { self.0.contains_key(key) }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }

    pub fn iter(&self) -> impl Iterator<Item=(&Annotation, &AnnotationValue)> {
        self.0.iter()
    }

    /// Every annotation of `outer` replaces the one with the same key here.
    pub fn merged(&self, outer: &Annotations) -> Annotations {
        let mut merged = self.clone();
        for (k, v) in outer.iter() {
            merged.insert(k.clone(), v.clone());
        }
        merged
    }

    pub fn token(&self) -> Option<&str> { self.get(&Annotation::Token).and_then(|v| v.as_str()) }
    pub fn error(&self) -> Option<&str> { self.get(&Annotation::Error).and_then(|v| v.as_str()) }
    pub fn is_void(&self) -> bool { self.contains(&Annotation::Void) }
    pub fn is_transient(&self) -> bool { self.contains(&Annotation::Transient) }
    pub fn is_pinned(&self) -> bool { self.contains(&Annotation::Pinned) }
}

impl FromIterator<(Annotation, AnnotationValue)> for Annotations {
    fn from_iter<I: IntoIterator<Item=(Annotation, AnnotationValue)>>(iter: I) -> Self {
        let mut a = Annotations::new();
        for (k, v) in iter { a.insert(k, v); }
        a
    }
}

/// What a rule invocation does with its match: the label it produces (or
/// `None` for a rule that is transparent to the tree) and its annotations.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Behaviour {
    pub label: Option<Label>,
    pub annotations: Annotations,
}

impl Behaviour {
    pub fn transparent() -> Self { Behaviour::default() }

    pub fn labelled(label: impl Into<Label>) -> Self {
        Behaviour { label: Some(label.into()), annotations: Annotations::new() }
    }

    /// The label of a produced node: an explicit `@token` wins over the label
    /// the rule was built with.
    pub fn token(&self) -> Option<Label> {
        match self.annotations.token() {
            Some(token) => Some(token.into()),
            None => self.label.clone(),
        }
    }

    /// `outer` applied on top of `self`, as when a reference to a rule carries
    /// its own label or annotations.
    pub fn overlay(&self, outer: &Behaviour) -> Behaviour {
        Behaviour {
            label: outer.label.clone().or_else(|| self.label.clone()),
            annotations: self.annotations.merged(&outer.annotations),
        }
    }

    pub fn is_plain(&self) -> bool { self.label.is_none() && self.annotations.is_empty() }
}

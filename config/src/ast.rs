use std::ops::Range;

pub type Span = Range<usize>;

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub items: Vec<Spanned<Item>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `on init { ... }`
    Init(Vec<Spanned<Setting>>),
    /// `line <id> { ... }`
    Line(LineDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub path: Vec<Spanned<String>>,
    pub value: Spanned<Value>,
}

impl Setting {
    /// Dotted path, e.g. `render.effect.shout`.
    pub fn dotted(&self) -> String {
        self.path
            .iter()
            .map(|part| part.node.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn path_span(&self) -> Span {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => first.span.start..last.span.end,
            _ => self.value.span.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineDecl {
    pub id: Spanned<String>,
    pub atoms: Vec<Spanned<AtomDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtomDecl {
    /// `"text" (name: value, ...)`
    Word {
        text: Spanned<String>,
        props: Vec<Spanned<Prop>>,
    },
    /// `pause`
    Pause,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: Spanned<String>,
    pub value: Spanned<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
    Ident(String),
}

impl Value {
    /// The text of a string or bare identifier.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Ident(s) => Some(s),
            Value::Number(_) | Value::Bool(_) => None,
        }
    }
}

//! Authored line data: atoms, their pacing and articulation, and the line that carries them.
//!
//! Serialized names follow the `SCREAMING-KEBAB-CASE` vocabulary epistles are stored with,
//! so a line looks like:
//!
//! ```json
//! { "lineId": "greeting", "line": [
//!     { "type": "WORD", "value": "Hi", "pace": "NORMAL", "articulation": "PAIR" },
//!     { "type": "PAUSE" }
//! ] }
//! ```

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{fmt, str::FromStr};

/// Kind of an authored unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum AtomType {
    #[default]
    Word,
    /// A fixed dramatic beat. Compiles to an empty operation.
    Pause,
}

/// How quickly an atom's fragments are revealed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Pace {
    XSlow,
    Slow,
    #[default]
    Normal,
    Fast,
    XFast,
}

impl Pace {
    pub const ALL: [Pace; 5] = [
        Pace::XSlow,
        Pace::Slow,
        Pace::Normal,
        Pace::Fast,
        Pace::XFast,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Pace::XSlow => "X-SLOW",
            Pace::Slow => "SLOW",
            Pace::Normal => "NORMAL",
            Pace::Fast => "FAST",
            Pace::XFast => "X-FAST",
        }
    }
}

/// How a word is cut into fragments for reveal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Articulation {
    /// The whole word at once.
    Word,
    /// Two letters at a time.
    #[default]
    Pair,
    /// Letter by letter.
    Letter,
}

impl Articulation {
    pub const ALL: [Articulation; 3] = [Articulation::Letter, Articulation::Pair, Articulation::Word];

    pub fn as_str(self) -> &'static str {
        match self {
            Articulation::Word => "WORD",
            Articulation::Pair => "PAIR",
            Articulation::Letter => "LETTER",
        }
    }
}

/// Error returned when a pace or articulation name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.name)
    }
}

impl std::error::Error for UnknownName {}

/// Normalizes `x_slow`, `x-slow` and `X-SLOW` to the same key.
fn normalize(name: &str) -> String {
    name.trim().replace('_', "-").to_ascii_uppercase()
}

impl FromStr for Pace {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Pace::ALL
            .into_iter()
            .find(|pace| pace.as_str() == key)
            .ok_or_else(|| UnknownName {
                kind: "pace",
                name: s.to_string(),
            })
    }
}

impl FromStr for Articulation {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Articulation::ALL
            .into_iter()
            .find(|articulation| articulation.as_str() == key)
            .ok_or_else(|| UnknownName {
                kind: "articulation",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Articulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form visual effect tag. `NONE` means no effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Effect(SmolStr);

impl Effect {
    pub const NONE: &'static str = "NONE";

    pub fn none() -> Self {
        Self(SmolStr::new_static(Self::NONE))
    }

    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(SmolStr::new(tag.as_ref()))
    }

    pub fn is_none(&self) -> bool {
        self.0 == Self::NONE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Effect {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Effect {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// One authored unit of a line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAtom {
    #[serde(rename = "type")]
    pub kind: AtomType,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<Pace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articulation: Option<Articulation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
}

impl LineAtom {
    pub fn word(value: impl Into<String>) -> Self {
        Self {
            kind: AtomType::Word,
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn pause() -> Self {
        Self {
            kind: AtomType::Pause,
            ..Default::default()
        }
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = Some(pace);
        self
    }

    pub fn with_articulation(mut self, articulation: Articulation) -> Self {
        self.articulation = Some(articulation);
        self
    }

    pub fn with_effect(mut self, effect: impl Into<Effect>) -> Self {
        self.effect = Some(effect.into());
        self
    }

    pub fn is_word(&self) -> bool {
        self.kind == AtomType::Word
    }

    /// Pace used for timing; absent means [`Pace::Normal`].
    pub fn effective_pace(&self) -> Pace {
        self.pace.unwrap_or_default()
    }

    /// Articulation used for segmentation; absent means [`Articulation::Pair`].
    pub fn effective_articulation(&self) -> Articulation {
        self.articulation.unwrap_or_default()
    }

    pub fn effective_effect(&self) -> Effect {
        self.effect.clone().unwrap_or_default()
    }
}

/// A line of an epistle as supplied by the document collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpistleLine {
    pub line_id: String,
    pub line: Vec<LineAtom>,
}

impl EpistleLine {
    pub fn new(line_id: impl Into<String>, line: Vec<LineAtom>) -> Self {
        Self {
            line_id: line_id.into(),
            line,
        }
    }

    /// The words of the line joined by single spaces; pauses contribute nothing.
    pub fn phrase(&self) -> String {
        self.line
            .iter()
            .filter(|atom| atom.is_word())
            .map(|atom| atom.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

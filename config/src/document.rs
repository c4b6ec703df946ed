//! Lowering of a parsed [`Script`] into lines and player settings.

use crate::{
    ast::{AtomDecl, Item, LineDecl, Prop, Script, Setting, Spanned, Value},
    error::{LoadError, ParseError},
};
use epistle_core::{Articulation, Effect, EpistleLine, LineAtom, Pace};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Grey,
}

impl Colour {
    const ALL: [(Colour, &'static str); 9] = [
        (Colour::Black, "black"),
        (Colour::Red, "red"),
        (Colour::Green, "green"),
        (Colour::Yellow, "yellow"),
        (Colour::Blue, "blue"),
        (Colour::Magenta, "magenta"),
        (Colour::Cyan, "cyan"),
        (Colour::White, "white"),
        (Colour::Grey, "grey"),
    ];
}

/// How the player draws fragments carrying a given effect tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectStyle {
    Bold,
    Dim,
    Italic,
    Underline,
    Reverse,
    Colour(Colour),
}

impl FromStr for EffectStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let style = match name.as_str() {
            "bold" => EffectStyle::Bold,
            "dim" => EffectStyle::Dim,
            "italic" => EffectStyle::Italic,
            "underline" => EffectStyle::Underline,
            "reverse" => EffectStyle::Reverse,
            "gray" => EffectStyle::Colour(Colour::Grey),
            _ => Colour::ALL
                .iter()
                .find(|(_, colour_name)| *colour_name == name)
                .map(|(colour, _)| EffectStyle::Colour(*colour))
                .ok_or_else(|| format!("unknown style '{s}'"))?,
        };
        Ok(style)
    }
}

impl fmt::Display for EffectStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectStyle::Bold => f.write_str("bold"),
            EffectStyle::Dim => f.write_str("dim"),
            EffectStyle::Italic => f.write_str("italic"),
            EffectStyle::Underline => f.write_str("underline"),
            EffectStyle::Reverse => f.write_str("reverse"),
            EffectStyle::Colour(colour) => {
                let name = Colour::ALL
                    .iter()
                    .find(|(c, _)| *c == *colour)
                    .map_or("?", |(_, name)| *name);
                f.write_str(name)
            },
        }
    }
}

/// Player settings from the `on init` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Draw a cursor after the revealed text while a line plays.
    pub cursor: bool,
    pub effect_styles: BTreeMap<String, EffectStyle>,
    /// Line played when none is named on the command line.
    pub line: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cursor: true,
            effect_styles: BTreeMap::new(),
            line: None,
        }
    }
}

impl Settings {
    pub fn style_for(&self, effect: &Effect) -> Option<EffectStyle> {
        self.effect_styles.get(effect.as_str()).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub settings: Settings,
    pub lines: Vec<EpistleLine>,
}

impl Document {
    pub fn line(&self, id: &str) -> Option<&EpistleLine> {
        self.lines.iter().find(|line| line.line_id == id)
    }

    /// `play.line` if set, otherwise the first line.
    pub fn default_line(&self) -> Option<&EpistleLine> {
        match &self.settings.line {
            Some(id) => self.line(id),
            None => self.lines.first(),
        }
    }
}

/// Parses and validates `source`, reporting every problem found.
pub fn load(source: &str) -> Result<Document, LoadError> {
    let (script, mut errors) = crate::parse(source);
    let document = script.map(|script| lower(&script, &mut errors));

    match document {
        Some(document) if errors.is_empty() => {
            tracing::debug!(
                lines = document.lines.len(),
                styles = document.settings.effect_styles.len(),
                "loaded script"
            );
            Ok(document)
        },
        _ => Err(LoadError { errors }),
    }
}

fn lower(script: &Script, errors: &mut Vec<ParseError>) -> Document {
    let mut document = Document::default();
    let mut line_ids = BTreeSet::new();
    let mut default_line = None;

    for item in &script.items {
        match &item.node {
            Item::Init(settings) => {
                for setting in settings {
                    if let Some(line) = apply_setting(&mut document.settings, &setting.node, errors)
                    {
                        default_line = Some(line);
                    }
                }
            },
            Item::Line(decl) => {
                if line_ids.contains(&decl.id.node) {
                    errors.push(
                        ParseError::new(
                            decl.id.span.clone(),
                            format!("duplicate line '{}'", decl.id.node),
                        )
                        .with_label("already declared above"),
                    );
                    continue;
                }
                line_ids.insert(decl.id.node.clone());
                document.lines.push(lower_line(decl, errors));
            },
        }
    }

    if let Some(line) = default_line {
        if !line_ids.contains(&line.node) {
            errors.push(ParseError::new(
                line.span,
                format!("no line named '{}'", line.node),
            ));
        }
    }

    document
}

/// Applies one setting, returning the `play.line` value so it can be checked once every line
/// is known.
fn apply_setting(
    settings: &mut Settings,
    setting: &Setting,
    errors: &mut Vec<ParseError>,
) -> Option<Spanned<String>> {
    let path: Vec<&str> = setting.path.iter().map(|p| p.node.as_str()).collect();
    let value = &setting.value;

    match path.as_slice() {
        ["render", "cursor"] => match value.node {
            Value::Bool(cursor) => settings.cursor = cursor,
            _ => errors.push(ParseError::new(
                value.span.clone(),
                "expected true or false",
            )),
        },
        ["render", "effect", tag] => match value.node.as_name().map(EffectStyle::from_str) {
            Some(Ok(style)) => {
                settings.effect_styles.insert(tag.to_string(), style);
            },
            Some(Err(message)) => errors.push(
                ParseError::new(value.span.clone(), message)
                    .with_label("bold, dim, italic, underline, reverse or a colour"),
            ),
            None => errors.push(ParseError::new(value.span.clone(), "expected a style name")),
        },
        ["play", "line"] => match value.node.as_name() {
            Some(line) => {
                settings.line = Some(line.to_string());
                return Some(Spanned::new(line.to_string(), value.span.clone()));
            },
            None => errors.push(ParseError::new(value.span.clone(), "expected a line id")),
        },
        _ => errors.push(ParseError::new(
            setting.path_span(),
            format!("unknown setting '{}'", setting.dotted()),
        )),
    }
    None
}

fn lower_line(decl: &LineDecl, errors: &mut Vec<ParseError>) -> EpistleLine {
    let atoms = decl
        .atoms
        .iter()
        .filter_map(|atom| match &atom.node {
            AtomDecl::Pause => Some(LineAtom::pause()),
            AtomDecl::Word { text, props } => lower_word(text, props, errors),
        })
        .collect();
    EpistleLine::new(decl.id.node.clone(), atoms)
}

fn lower_word(
    text: &Spanned<String>,
    props: &[Spanned<Prop>],
    errors: &mut Vec<ParseError>,
) -> Option<LineAtom> {
    let mut ok = true;
    if text.node.trim().is_empty() {
        errors.push(ParseError::new(text.span.clone(), "word is empty"));
        ok = false;
    }

    let mut atom = LineAtom::word(text.node.clone());
    let mut seen: Vec<&str> = Vec::new();
    for prop in props {
        let Prop { name, value } = &prop.node;
        if seen.contains(&name.node.as_str()) {
            errors.push(ParseError::new(
                name.span.clone(),
                format!("'{}' given twice", name.node),
            ));
            ok = false;
            continue;
        }
        seen.push(&name.node);

        let Some(raw) = value.node.as_name() else {
            errors.push(ParseError::new(value.span.clone(), "expected a name"));
            ok = false;
            continue;
        };
        let applied = match name.node.as_str() {
            "pace" => raw.parse::<Pace>().map(|pace| atom.pace = Some(pace)),
            "articulation" => raw
                .parse::<Articulation>()
                .map(|articulation| atom.articulation = Some(articulation)),
            "effect" => {
                atom.effect = Some(Effect::new(raw));
                Ok(())
            },
            other => {
                errors.push(
                    ParseError::new(name.span.clone(), format!("unknown property '{other}'"))
                        .with_label("expected pace, articulation or effect"),
                );
                ok = false;
                continue;
            },
        };
        if let Err(unknown) = applied {
            errors.push(ParseError::new(value.span.clone(), unknown.to_string()));
            ok = false;
        }
    }

    ok.then_some(atom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(source: &str) -> Vec<String> {
        load(source)
            .unwrap_err()
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect()
    }

    #[test]
    fn lowers_lines_and_settings() {
        let document = load(
            r#"
            on init {
                render.cursor = false;
                render.effect.shout = "bold";
                render.effect.hush = grey;
                play.line = farewell;
            }
            line greeting {
                "Hi" (pace: normal, articulation: pair);
                "a" (pace: fast, articulation: word, effect: shout);
            }
            line farewell {
                "Bye" (pace: "X-SLOW");
                pause;
                "now";
            }
            "#,
        )
        .unwrap();

        assert!(!document.settings.cursor);
        assert_eq!(
            document.settings.style_for(&Effect::new("shout")),
            Some(EffectStyle::Bold)
        );
        assert_eq!(
            document.settings.style_for(&Effect::new("hush")),
            Some(EffectStyle::Colour(Colour::Grey))
        );
        assert_eq!(document.lines.len(), 2);
        assert_eq!(
            document.lines[0].line[1],
            LineAtom::word("a")
                .with_pace(Pace::Fast)
                .with_articulation(Articulation::Word)
                .with_effect("shout")
        );
        assert_eq!(document.default_line().map(|l| l.line_id.as_str()), Some("farewell"));
        assert_eq!(document.lines[1].line[1], LineAtom::pause());
        assert_eq!(document.lines[1].line[0].pace, Some(Pace::XSlow));
    }

    #[test]
    fn default_line_is_the_first() {
        let document = load(r#"line a { "x"; } line b { "y"; }"#).unwrap();
        assert_eq!(document.default_line().map(|l| l.line_id.as_str()), Some("a"));
        assert!(document.line("b").is_some());
        assert!(document.settings.cursor);
    }

    #[test]
    fn unknown_names_are_reported() {
        let errors = messages(
            r#"
            line l {
                "x" (pace: glacial);
                "y" (articulation: syllable);
                "z" (volume: loud);
            }
            "#,
        );
        assert_eq!(
            errors,
            vec![
                "unknown pace 'glacial'",
                "unknown articulation 'syllable'",
                "unknown property 'volume'",
            ]
        );
    }

    #[test]
    fn empty_words_are_rejected() {
        assert_eq!(messages(r#"line l { "  "; }"#), vec!["word is empty"]);
    }

    #[test]
    fn duplicate_lines_point_at_the_second() {
        let source = r#"line a { "x"; } line a { "y"; }"#;
        let err = load(source).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        let span = err.errors[0].span.clone();
        assert_eq!(&source[span.clone()], "a");
        assert!(span.start > source.find('{').unwrap());
    }

    #[test]
    fn bad_settings_are_reported() {
        let errors = messages(
            r#"
            on init {
                render.cursor = 3;
                render.effect.x = sparkly;
                render.speed = fast;
                play.line = missing;
            }
            line present { "x"; }
            "#,
        );
        assert_eq!(
            errors,
            vec![
                "expected true or false",
                "unknown style 'sparkly'",
                "unknown setting 'render.speed'",
                "no line named 'missing'",
            ]
        );
    }

    #[test]
    fn repeated_property_is_reported() {
        assert_eq!(
            messages(r#"line l { "x" (pace: fast, pace: slow); }"#),
            vec!["'pace' given twice"]
        );
    }

    #[test]
    fn syntax_errors_fail_the_load() {
        let source = r#"line l { "x" }"#;
        let err = load(source).unwrap_err();
        assert!(!err.errors.is_empty());
        assert!(!err.report(source).is_empty());
    }
}

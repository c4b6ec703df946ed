use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::{Attribute, Color, ContentStyle, Print, PrintStyledContent},
    terminal::{Clear, ClearType},
};
use epistle_config::{Colour, EffectStyle, Settings};
use epistle_core::RenderItem;
use std::io::{self, Write};

const CURSOR: &str = "▌";

/// Draws the revealed part of a line on the current terminal line.
pub struct Renderer<W: Write> {
    out: W,
    settings: Settings,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, settings: Settings) -> Self {
        Self { out, settings }
    }

    /// Redraws the line from `items`, with the cursor when `running` and enabled.
    pub fn draw(&mut self, items: &[RenderItem<'_>], running: bool) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;

        for item in items.iter().filter(|item| item.revealed) {
            match self.settings.style_for(item.effect) {
                Some(style) => {
                    queue!(self.out, PrintStyledContent(content_style(style).apply(item.text)))?
                },
                None => queue!(self.out, Print(item.text))?,
            }
        }

        if running && self.settings.cursor {
            queue!(self.out, Print(CURSOR))?;
        }
        self.out.flush()
    }

    /// Ends the line so the shell prompt starts below it.
    pub fn finish(&mut self) -> io::Result<()> {
        queue!(self.out, Print("\n"))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn content_style(style: EffectStyle) -> ContentStyle {
    let mut content = ContentStyle::new();
    match style {
        EffectStyle::Bold => content.attributes.set(Attribute::Bold),
        EffectStyle::Dim => content.attributes.set(Attribute::Dim),
        EffectStyle::Italic => content.attributes.set(Attribute::Italic),
        EffectStyle::Underline => content.attributes.set(Attribute::Underlined),
        EffectStyle::Reverse => content.attributes.set(Attribute::Reverse),
        EffectStyle::Colour(colour) => content.foreground_color = Some(color(colour)),
    }
    content
}

fn color(colour: Colour) -> Color {
    match colour {
        Colour::Black => Color::Black,
        Colour::Red => Color::Red,
        Colour::Green => Color::Green,
        Colour::Yellow => Color::Yellow,
        Colour::Blue => Color::Blue,
        Colour::Magenta => Color::Magenta,
        Colour::Cyan => Color::Cyan,
        Colour::White => Color::White,
        Colour::Grey => Color::Grey,
    }
}

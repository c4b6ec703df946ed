//! Editing model behind the atom chips of the line editor.
//!
//! The sequence owns every slot of the line being authored, including empty placeholder
//! slots that are still being typed into. Typing a space inside a slot splits it: the slot
//! keeps the first word and a new slot is opened after it for the rest.
//!
//! Only [`AtomSequence::to_line`] produces something the compiler may see, and it drops
//! placeholders and empty words on the way.

use crate::{
    atom::{EpistleLine, LineAtom},
    director::{AtomExchange, ExchangeId},
};
use std::collections::BTreeSet;

/// What an [`AtomSequence::input`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Nothing changed.
    Ignored,
    /// The slot's value was replaced.
    Updated,
    /// The slot kept its first word and `new_id` was inserted right after it.
    Split { new_id: ExchangeId },
}

#[derive(Debug, Clone, Default)]
pub struct AtomSequence {
    line_id: String,
    exchanges: Vec<AtomExchange>,
    selected: BTreeSet<ExchangeId>,
    next_id: u64,
}

impl AtomSequence {
    pub fn new(line_id: impl Into<String>) -> Self {
        Self {
            line_id: line_id.into(),
            ..Default::default()
        }
    }

    pub fn from_line(line: EpistleLine) -> Self {
        let mut sequence = Self::new(line.line_id);
        for atom in line.line {
            let id = sequence.alloc_id();
            sequence.exchanges.push(AtomExchange::new(id, atom));
        }
        sequence
    }

    pub fn line_id(&self) -> &str {
        &self.line_id
    }

    pub fn exchanges(&self) -> &[AtomExchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn get(&self, id: ExchangeId) -> Option<&AtomExchange> {
        self.exchanges.iter().find(|exchange| exchange.id == id)
    }

    /// Opens an empty slot at the end of the line.
    pub fn push_placeholder(&mut self) -> ExchangeId {
        let id = self.alloc_id();
        self.exchanges.push(AtomExchange::placeholder(id));
        id
    }

    /// Applies raw text typed into slot `id`.
    ///
    /// Whitespace runs collapse to one space. Input equal to the current value, or a lone
    /// space, is ignored. When the text holds a space the slot keeps the first word and a
    /// new slot holding the last word is inserted after it, inheriting pace, articulation
    /// and effect. An empty last word opens a placeholder instead.
    pub fn input(&mut self, id: ExchangeId, raw: &str) -> InputOutcome {
        let Some(position) = self.position(id) else {
            tracing::warn!(%id, "input for unknown atom");
            return InputOutcome::Ignored;
        };

        let value = collapse_whitespace(raw);
        let exchange = &mut self.exchanges[position];
        let current = exchange.atom.as_ref().map_or("", |atom| atom.value.as_str());
        if value == current || value == " " {
            return InputOutcome::Ignored;
        }

        let base = exchange.atom.clone().unwrap_or_default();
        let words: Vec<&str> = value.split(' ').collect();
        exchange.atom = Some(LineAtom {
            value: words[0].to_string(),
            ..base.clone()
        });

        let [_, .., tail] = words.as_slice() else {
            return InputOutcome::Updated;
        };

        let new_id = self.alloc_id();
        let inserted = if tail.is_empty() {
            AtomExchange::placeholder(new_id)
        } else {
            AtomExchange::new(
                new_id,
                LineAtom {
                    value: tail.to_string(),
                    ..base
                },
            )
        };
        self.exchanges.insert(position + 1, inserted);
        tracing::debug!(%id, %new_id, "split atom on space");
        InputOutcome::Split { new_id }
    }

    /// Removes slot `id`, as when an emptied slot loses focus or receives a backspace.
    pub fn delete(&mut self, id: ExchangeId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        self.exchanges.remove(position);
        self.selected.remove(&id);
        true
    }

    /// Toggles selection of slot `id`, returning whether it is now selected.
    pub fn toggle_selected(&mut self, id: ExchangeId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: ExchangeId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected slots in line order.
    pub fn selected(&self) -> Vec<AtomExchange> {
        self.exchanges
            .iter()
            .filter(|exchange| self.selected.contains(&exchange.id))
            .cloned()
            .collect()
    }

    /// Writes back exchanges reported by the director, matching them by id.
    pub fn apply(&mut self, updated: Vec<AtomExchange>) {
        for exchange in updated {
            match self.position(exchange.id) {
                Some(position) => self.exchanges[position].atom = exchange.atom,
                None => tracing::warn!(id = %exchange.id, "dropping update for unknown atom"),
            }
        }
    }

    /// The authored line, without placeholders or empty words.
    pub fn to_line(&self) -> EpistleLine {
        let line = self
            .exchanges
            .iter()
            .filter_map(|exchange| exchange.atom.as_ref())
            .filter(|atom| !atom.is_word() || !atom.value.trim().is_empty())
            .cloned()
            .collect();
        EpistleLine::new(self.line_id.clone(), line)
    }

    pub fn phrase(&self) -> String {
        self.to_line().phrase()
    }

    fn position(&self, id: ExchangeId) -> Option<usize> {
        self.exchanges.iter().position(|exchange| exchange.id == id)
    }

    fn alloc_id(&mut self) -> ExchangeId {
        let id = ExchangeId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

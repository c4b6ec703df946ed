//! Bulk pace and articulation editing over a selection of atoms.
//!
//! A selection is summarized into one [`ReducedSelectionProps`]: each field is either the
//! value every selected atom shares or [`Reduced::Multiple`]. Choosing a value in the
//! summary and expanding it writes that value onto every selected atom, while fields left
//! at `Multiple` keep each atom's own setting.

use crate::{
    atom::{Articulation, LineAtom, Pace},
    error::{Error, Result},
};
use std::fmt;

/// A field summarized over several atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reduced<T> {
    /// Every atom agrees on this value.
    Concrete(T),
    /// The atoms disagree.
    Multiple,
}

impl<T: PartialEq> Reduced<T> {
    /// Folds another atom's value in. Disagreement is sticky.
    fn merge(self, other: T) -> Self {
        match self {
            Reduced::Concrete(value) if value == other => Reduced::Concrete(value),
            _ => Reduced::Multiple,
        }
    }
}

impl<T> Reduced<T> {
    pub fn concrete(self) -> Option<T> {
        match self {
            Reduced::Concrete(value) => Some(value),
            Reduced::Multiple => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Reduced<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reduced::Concrete(value) => fmt::Display::fmt(value, f),
            Reduced::Multiple => f.write_str("MULTIPLE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReducedSelectionProps {
    pub pace: Reduced<Pace>,
    pub articulation: Reduced<Articulation>,
}

/// Summarizes the pace and articulation of `atoms`.
///
/// Absent fields count as their defaults ([`Pace::Normal`], [`Articulation::Pair`]), which
/// is how the compiler plays them, so the result is the same for any ordering of atoms.
pub fn reduce(atoms: &[LineAtom]) -> Result<ReducedSelectionProps> {
    let (first, rest) = atoms.split_first().ok_or(Error::EmptySelection)?;

    let seed = ReducedSelectionProps {
        pace: Reduced::Concrete(first.effective_pace()),
        articulation: Reduced::Concrete(first.effective_articulation()),
    };

    Ok(rest.iter().fold(seed, |acc, atom| ReducedSelectionProps {
        pace: acc.pace.merge(atom.effective_pace()),
        articulation: acc.articulation.merge(atom.effective_articulation()),
    }))
}

/// Applies `chosen` to every atom, field by field.
pub fn expand(atoms: &[LineAtom], chosen: ReducedSelectionProps) -> Vec<LineAtom> {
    atoms.iter().map(|atom| expand_one(atom, chosen)).collect()
}

fn expand_one(atom: &LineAtom, chosen: ReducedSelectionProps) -> LineAtom {
    let mut atom = atom.clone();
    if let Reduced::Concrete(pace) = chosen.pace {
        atom.pace = Some(pace);
    }
    if let Reduced::Concrete(articulation) = chosen.articulation {
        atom.articulation = Some(articulation);
    }
    atom
}

/// Identifier of an exchange record, stable while the editor runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(pub u64);

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "atom-{}", self.0)
    }
}

/// An atom slot as the editor exchanges it. `None` is an empty placeholder slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomExchange {
    pub id: ExchangeId,
    pub atom: Option<LineAtom>,
}

impl AtomExchange {
    pub fn new(id: ExchangeId, atom: LineAtom) -> Self {
        Self {
            id,
            atom: Some(atom),
        }
    }

    pub fn placeholder(id: ExchangeId) -> Self {
        Self { id, atom: None }
    }
}

/// The pacing and articulation controls of the line editor.
///
/// Holds the currently selected exchanges, keeps their summary up to date and reports bulk
/// edits through `on_change` with the full, expanded exchange list.
pub struct LineDirector<F> {
    exchanges: Vec<AtomExchange>,
    reduced: Option<ReducedSelectionProps>,
    on_change: F,
}

impl<F: FnMut(Vec<AtomExchange>)> LineDirector<F> {
    pub fn new(exchanges: Vec<AtomExchange>, on_change: F) -> Self {
        let mut director = Self {
            exchanges: Vec::new(),
            reduced: None,
            on_change,
        };
        director.set_exchanges(exchanges);
        director
    }

    /// Replaces the selection and recomputes the summary.
    pub fn set_exchanges(&mut self, exchanges: Vec<AtomExchange>) {
        let atoms = real_atoms(&exchanges);
        self.reduced = reduce(&atoms).ok();
        tracing::trace!(
            selected = exchanges.len(),
            atoms = atoms.len(),
            reduced = ?self.reduced,
            "director selection changed"
        );
        self.exchanges = exchanges;
    }

    /// Controls are enabled only when at least one real atom is selected.
    pub fn enabled(&self) -> bool {
        self.reduced.is_some()
    }

    pub fn reduced(&self) -> Option<ReducedSelectionProps> {
        self.reduced
    }

    pub fn exchanges(&self) -> &[AtomExchange] {
        &self.exchanges
    }

    /// Sets the pace of every selected atom, keeping the articulation summary as is.
    pub fn set_pace(&mut self, pace: Pace) -> Result<()> {
        let current = self.reduced.ok_or(Error::EmptySelection)?;
        self.apply(ReducedSelectionProps {
            pace: Reduced::Concrete(pace),
            ..current
        });
        Ok(())
    }

    /// Sets the articulation of every selected atom, keeping the pace summary as is.
    pub fn set_articulation(&mut self, articulation: Articulation) -> Result<()> {
        let current = self.reduced.ok_or(Error::EmptySelection)?;
        self.apply(ReducedSelectionProps {
            articulation: Reduced::Concrete(articulation),
            ..current
        });
        Ok(())
    }

    fn apply(&mut self, chosen: ReducedSelectionProps) {
        let updated: Vec<AtomExchange> = self
            .exchanges
            .iter()
            .map(|exchange| AtomExchange {
                id: exchange.id,
                atom: exchange.atom.as_ref().map(|atom| expand_one(atom, chosen)),
            })
            .collect();

        tracing::debug!(
            pace = %chosen.pace,
            articulation = %chosen.articulation,
            atoms = updated.len(),
            "bulk edit"
        );
        (self.on_change)(updated.clone());
        self.set_exchanges(updated);
    }
}

fn real_atoms(exchanges: &[AtomExchange]) -> Vec<LineAtom> {
    exchanges
        .iter()
        .filter_map(|exchange| exchange.atom.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn paced(value: &str, pace: Pace) -> LineAtom {
        LineAtom::word(value).with_pace(pace)
    }

    fn exchanges(atoms: Vec<Option<LineAtom>>) -> Vec<AtomExchange> {
        atoms
            .into_iter()
            .enumerate()
            .map(|(i, atom)| AtomExchange {
                id: ExchangeId(i as u64),
                atom,
            })
            .collect()
    }

    #[test]
    fn shared_pace_is_concrete() {
        let atoms = vec![paced("a", Pace::Fast), paced("b", Pace::Fast)];
        let reduced = reduce(&atoms).unwrap();
        assert_eq!(reduced.pace, Reduced::Concrete(Pace::Fast));
    }

    #[test]
    fn one_differing_pace_collapses_to_multiple() {
        let atoms = vec![
            paced("a", Pace::Fast),
            paced("b", Pace::Fast),
            paced("c", Pace::Slow),
        ];
        let reduced = reduce(&atoms).unwrap();
        assert_eq!(reduced.pace, Reduced::Multiple);
        assert_eq!(reduced.articulation, Reduced::Concrete(Articulation::Pair));
    }

    #[test]
    fn fields_collapse_independently() {
        let atoms = vec![
            paced("a", Pace::Slow).with_articulation(Articulation::Word),
            paced("b", Pace::Slow).with_articulation(Articulation::Letter),
        ];
        let reduced = reduce(&atoms).unwrap();
        assert_eq!(reduced.pace, Reduced::Concrete(Pace::Slow));
        assert_eq!(reduced.articulation, Reduced::Multiple);
    }

    #[test]
    fn absent_fields_reduce_as_defaults() {
        let atoms = vec![LineAtom::word("a"), paced("b", Pace::Normal)];
        let reduced = reduce(&atoms).unwrap();
        assert_eq!(reduced.pace, Reduced::Concrete(Pace::Normal));
        assert_eq!(reduced.articulation, Reduced::Concrete(Articulation::Pair));
    }

    #[test]
    fn empty_selection_is_an_error() {
        assert_eq!(reduce(&[]), Err(Error::EmptySelection));
    }

    #[test]
    fn reduction_ignores_order() {
        let atoms = [
            paced("a", Pace::Fast),
            LineAtom::word("b"),
            paced("c", Pace::Fast).with_articulation(Articulation::Letter),
        ];
        let orders = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        let expected = reduce(&atoms).unwrap();
        for order in orders {
            let permuted: Vec<_> = order.iter().map(|&i| atoms[i].clone()).collect();
            assert_eq!(reduce(&permuted).unwrap(), expected, "order {order:?}");
        }
    }

    #[test]
    fn expand_multiple_keeps_each_pace() {
        let atoms = vec![paced("a", Pace::Fast), paced("b", Pace::Slow), LineAtom::word("c")];
        let chosen = ReducedSelectionProps {
            pace: Reduced::Multiple,
            articulation: Reduced::Multiple,
        };
        assert_eq!(expand(&atoms, chosen), atoms);
    }

    #[test]
    fn expand_concrete_overwrites_every_pace() {
        let atoms = vec![paced("a", Pace::Fast), paced("b", Pace::Slow), LineAtom::word("c")];
        let chosen = ReducedSelectionProps {
            pace: Reduced::Concrete(Pace::XFast),
            articulation: Reduced::Multiple,
        };
        let expanded = expand(&atoms, chosen);
        assert!(expanded.iter().all(|a| a.pace == Some(Pace::XFast)));
        assert!(expanded.iter().all(|a| a.articulation.is_none()));
    }

    #[test]
    fn expand_preserves_value_and_effect() {
        let atoms = vec![LineAtom::word("boo").with_effect("shake")];
        let chosen = ReducedSelectionProps {
            pace: Reduced::Concrete(Pace::Slow),
            articulation: Reduced::Concrete(Articulation::Letter),
        };
        let expanded = expand(&atoms, chosen);
        assert_eq!(expanded[0].value, "boo");
        assert_eq!(expanded[0].effect.as_ref().map(|e| e.as_str()), Some("shake"));
        assert_eq!(expanded[0].articulation, Some(Articulation::Letter));
    }

    #[test]
    fn director_disabled_without_real_atoms() {
        let mut director = LineDirector::new(exchanges(vec![None]), |_| {});
        assert!(!director.enabled());
        assert_eq!(director.set_pace(Pace::Fast), Err(Error::EmptySelection));
    }

    #[test]
    fn director_reports_expanded_exchanges() {
        let reported = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reported);
        let mut director = LineDirector::new(
            exchanges(vec![
                Some(paced("a", Pace::Fast).with_articulation(Articulation::Word)),
                None,
                Some(paced("b", Pace::Slow).with_articulation(Articulation::Letter)),
            ]),
            move |updated| sink.borrow_mut().push(updated),
        );
        assert_eq!(
            director.reduced(),
            Some(ReducedSelectionProps {
                pace: Reduced::Multiple,
                articulation: Reduced::Multiple,
            })
        );

        director.set_pace(Pace::XSlow).unwrap();

        let calls = reported.borrow();
        assert_eq!(calls.len(), 1);
        let updated = &calls[0];
        assert_eq!(updated.len(), 3);
        assert!(updated[1].atom.is_none());
        let a = updated[0].atom.as_ref().unwrap();
        let b = updated[2].atom.as_ref().unwrap();
        assert_eq!((a.pace, a.articulation), (Some(Pace::XSlow), Some(Articulation::Word)));
        assert_eq!((b.pace, b.articulation), (Some(Pace::XSlow), Some(Articulation::Letter)));
        assert_eq!(
            director.reduced().map(|r| r.pace),
            Some(Reduced::Concrete(Pace::XSlow))
        );
    }

    #[test]
    fn reduced_displays_sentinel() {
        assert_eq!(Reduced::Concrete(Pace::XFast).to_string(), "X-FAST");
        assert_eq!(Reduced::<Pace>::Multiple.to_string(), "MULTIPLE");
    }
}

//! Compilation of authored atoms into the timed operations playback walks through.

use crate::{
    articulation::{Segmenter, StandardSegmenter},
    atom::{AtomType, Effect, LineAtom, Pace},
    error::{Error, Result},
    pace::{PaceTable, StandardPaces},
};
use serde::Serialize;
use smol_str::SmolStr;
use std::{fmt, ops::Index, time::Duration};

/// Identity of an operation within its queue, derived from where it came from.
///
/// The trailing space of a word uses the fragment index one past its last fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OperationKey {
    pub atom: usize,
    pub fragment: usize,
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.atom, self.fragment)
    }
}

/// One step of a compiled line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOperation {
    pub key: OperationKey,
    #[serde(rename = "timeoutMs", serialize_with = "serialize_millis")]
    pub timeout: Duration,
    pub effect: Effect,
    pub body: SmolStr,
}

impl ExecutionOperation {
    pub fn is_space(&self) -> bool {
        self.body == " "
    }

    pub fn is_pause(&self) -> bool {
        self.body.is_empty()
    }
}

fn serialize_millis<S: serde::Serializer>(timeout: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(timeout.as_millis() as u64)
}

/// The ordered operations of one line. Immutable once compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExecutionQueue(Vec<ExecutionOperation>);

impl ExecutionQueue {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExecutionOperation> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionOperation> {
        self.0.iter()
    }

    pub fn operations(&self) -> &[ExecutionOperation] {
        &self.0
    }

    /// Bodies in order, mostly useful for assertions and debugging.
    pub fn bodies(&self) -> Vec<&str> {
        self.0.iter().map(|op| op.body.as_str()).collect()
    }

    /// Sum of every timeout, which is an upper bound on playback length.
    pub fn total_duration(&self) -> Duration {
        self.0.iter().map(|op| op.timeout).sum()
    }
}

impl Index<usize> for ExecutionQueue {
    type Output = ExecutionOperation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a ExecutionQueue {
    type Item = &'a ExecutionOperation;
    type IntoIter = std::slice::Iter<'a, ExecutionOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ExecutionOperation> for ExecutionQueue {
    fn from_iter<T: IntoIterator<Item = ExecutionOperation>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Turns atoms into an [`ExecutionQueue`] using a pace table and a segmenter.
#[derive(Debug, Clone, Default)]
pub struct Compiler<P = StandardPaces, S = StandardSegmenter> {
    paces: P,
    segmenter: S,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            paces: StandardPaces,
            segmenter: StandardSegmenter,
        }
    }
}

impl<P: PaceTable, S: Segmenter> Compiler<P, S> {
    pub fn with_tables(paces: P, segmenter: S) -> Self {
        Self { paces, segmenter }
    }

    pub fn compile(&self, atoms: &[LineAtom]) -> Result<ExecutionQueue> {
        let mut operations = Vec::new();
        let last = atoms.len().saturating_sub(1);

        for (index, atom) in atoms.iter().enumerate() {
            match atom.kind {
                AtomType::Word => {
                    self.compile_word(index, atom, index != last, &mut operations)?
                },
                // Pauses read as a fixed beat whatever the surrounding pace.
                AtomType::Pause => operations.push(ExecutionOperation {
                    key: OperationKey {
                        atom: index,
                        fragment: 0,
                    },
                    timeout: self.paces.timeout(Pace::XSlow),
                    effect: Effect::none(),
                    body: SmolStr::default(),
                }),
            }
        }

        tracing::debug!(
            atoms = atoms.len(),
            operations = operations.len(),
            "compiled line"
        );
        Ok(ExecutionQueue(operations))
    }

    fn compile_word(
        &self,
        index: usize,
        atom: &LineAtom,
        trailing_space: bool,
        operations: &mut Vec<ExecutionOperation>,
    ) -> Result<()> {
        if atom.value.trim().is_empty() {
            return Err(Error::InvalidAtom {
                index,
                reason: "word atom has an empty value".to_string(),
            });
        }

        let timeout = self.paces.timeout(atom.effective_pace());
        let effect = atom.effective_effect();
        let fragments = self
            .segmenter
            .segment(&atom.value, atom.effective_articulation());
        let count = fragments.len();

        operations.extend(fragments.into_iter().enumerate().map(|(fragment, body)| {
            ExecutionOperation {
                key: OperationKey {
                    atom: index,
                    fragment,
                },
                timeout,
                effect: effect.clone(),
                body: SmolStr::new(body),
            }
        }));

        if trailing_space {
            operations.push(ExecutionOperation {
                key: OperationKey {
                    atom: index,
                    fragment: count,
                },
                timeout,
                effect: Effect::none(),
                body: SmolStr::new_static(" "),
            });
        }
        Ok(())
    }
}

/// Compiles `atoms` with the standard pace table and segmentation.
pub fn compile(atoms: &[LineAtom]) -> Result<ExecutionQueue> {
    Compiler::new().compile(atoms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Articulation;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn hi_a_scenario() {
        let atoms = [
            LineAtom::word("Hi")
                .with_pace(Pace::Normal)
                .with_articulation(Articulation::Pair),
            LineAtom::word("a")
                .with_pace(Pace::Fast)
                .with_articulation(Articulation::Word),
        ];
        let queue = compile(&atoms).unwrap();

        assert_eq!(queue.bodies(), vec!["Hi", " ", "a"]);
        let timeouts: Vec<_> = queue.iter().map(|op| op.timeout).collect();
        assert_eq!(timeouts, vec![ms(250), ms(250), ms(125)]);
        assert!(queue[1].effect.is_none());
    }

    #[test]
    fn empty_line_compiles_to_empty_queue() {
        let queue = compile(&[]).unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.total_duration(), Duration::ZERO);
    }

    #[test]
    fn empty_word_is_rejected() {
        let atoms = [LineAtom::word("ok"), LineAtom::word("")];
        let err = compile(&atoms).unwrap_err();
        assert!(matches!(err, Error::InvalidAtom { index: 1, .. }));
    }

    #[test]
    fn blank_word_is_rejected() {
        let err = compile(&[LineAtom::word("  ")]).unwrap_err();
        assert!(matches!(err, Error::InvalidAtom { index: 0, .. }));
    }

    #[test]
    fn pause_is_fixed_x_slow_regardless_of_pace() {
        let atoms = [
            LineAtom::word("wait").with_pace(Pace::XFast),
            LineAtom::pause().with_pace(Pace::XFast).with_effect("shake"),
            LineAtom::word("now").with_pace(Pace::XFast),
        ];
        let queue = compile(&atoms).unwrap();

        assert_eq!(queue.bodies(), vec!["wa", "it", " ", "", "no", "w"]);
        let pause = &queue[3];
        assert!(pause.is_pause());
        assert_eq!(pause.timeout, ms(1000));
        assert!(pause.effect.is_none());
    }

    #[test]
    fn last_word_has_no_trailing_space() {
        let queue = compile(&[LineAtom::word("end")]).unwrap();
        assert_eq!(queue.bodies(), vec!["en", "d"]);
    }

    #[test]
    fn fragments_carry_effect_and_pace() {
        let atoms = [LineAtom::word("boo")
            .with_pace(Pace::Slow)
            .with_articulation(Articulation::Letter)
            .with_effect("shake")];
        let queue = compile(&atoms).unwrap();

        assert_eq!(queue.len(), 3);
        for op in &queue {
            assert_eq!(op.effect, Effect::new("shake"));
            assert_eq!(op.timeout, ms(500));
        }
    }

    #[test]
    fn keys_are_unique_and_positional() {
        let atoms = [LineAtom::word("ab"), LineAtom::pause(), LineAtom::word("cde")];
        let queue = compile(&atoms).unwrap();
        let keys: Vec<_> = queue.iter().map(|op| op.key.to_string()).collect();
        assert_eq!(keys, vec!["0.0", "0.1", "1.0", "2.0", "2.1"]);
    }

    #[test]
    fn custom_pace_table() {
        struct Instant;
        impl PaceTable for Instant {
            fn timeout(&self, _: Pace) -> Duration {
                Duration::ZERO
            }
        }

        let compiler = Compiler::with_tables(Instant, StandardSegmenter);
        let queue = compiler
            .compile(&[LineAtom::word("go"), LineAtom::pause()])
            .unwrap();
        assert!(queue.iter().all(|op| op.timeout.is_zero()));
    }

    #[test]
    fn serializes_timeouts_as_millis() {
        let queue = compile(&[LineAtom::word("a").with_pace(Pace::XFast)]).unwrap();
        let json = serde_json::to_value(&queue).unwrap();
        assert_eq!(json[0]["timeoutMs"], 50);
        assert_eq!(json[0]["body"], "a");
        assert_eq!(json[0]["effect"], "NONE");
    }
}

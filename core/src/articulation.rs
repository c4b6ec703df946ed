//! Word segmentation for reveal.
//!
//! Fragments are cut on extended grapheme clusters, so a "letter" is what a reader sees as
//! one character (`"é"` written with a combining accent is still one letter). Whitespace
//! never appears inside a letter or pair fragment.

use crate::atom::Articulation;
use unicode_segmentation::UnicodeSegmentation;

/// Cuts a word into the fragments revealed one operation at a time.
///
/// Implementations must return fragments in source order and never return an empty
/// fragment. Concatenating the fragments of a word without whitespace must give the word.
pub trait Segmenter {
    fn segment<'a>(&self, word: &'a str, articulation: Articulation) -> Vec<&'a str>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardSegmenter;

impl Segmenter for StandardSegmenter {
    fn segment<'a>(&self, word: &'a str, articulation: Articulation) -> Vec<&'a str> {
        if word.graphemes(true).nth(1).is_none() {
            return if word.is_empty() { Vec::new() } else { vec![word] };
        }

        match articulation {
            Articulation::Word => vec![word],
            Articulation::Letter => runs(word).flat_map(|run| run.graphemes(true)).collect(),
            Articulation::Pair => runs(word).flat_map(pairs).collect(),
        }
    }
}

impl<T: Segmenter + ?Sized> Segmenter for &T {
    fn segment<'a>(&self, word: &'a str, articulation: Articulation) -> Vec<&'a str> {
        (**self).segment(word, articulation)
    }
}

/// Maximal runs of non-whitespace text.
fn runs(word: &str) -> impl Iterator<Item = &str> {
    word.split(char::is_whitespace).filter(|run| !run.is_empty())
}

/// Two graphemes at a time; an odd trailing grapheme stands alone.
fn pairs(run: &str) -> Vec<&str> {
    let starts: Vec<usize> = run.grapheme_indices(true).map(|(offset, _)| offset).collect();

    (0..starts.len())
        .step_by(2)
        .map(|i| {
            let end = starts.get(i + 2).copied().unwrap_or(run.len());
            &run[starts[i]..end]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(word: &str, articulation: Articulation) -> Vec<&str> {
        StandardSegmenter.segment(word, articulation)
    }

    #[test]
    fn pair_even_word() {
        assert_eq!(seg("word", Articulation::Pair), vec!["wo", "rd"]);
    }

    #[test]
    fn pair_odd_word_keeps_trailing_letter() {
        assert_eq!(seg("hello", Articulation::Pair), vec!["he", "ll", "o"]);
        assert_eq!(seg("abc", Articulation::Pair), vec!["ab", "c"]);
    }

    #[test]
    fn letter_splits_every_grapheme() {
        assert_eq!(seg("abc", Articulation::Letter), vec!["a", "b", "c"]);
    }

    #[test]
    fn word_is_one_fragment() {
        assert_eq!(seg("whole", Articulation::Word), vec!["whole"]);
    }

    #[test]
    fn single_letter_word_is_one_fragment_in_every_mode() {
        for articulation in Articulation::ALL {
            assert_eq!(seg("a", articulation), vec!["a"]);
        }
    }

    #[test]
    fn combining_marks_stay_with_their_letter() {
        let word = "e\u{301}te\u{301}";
        assert_eq!(
            seg(word, Articulation::Letter),
            vec!["e\u{301}", "t", "e\u{301}"]
        );
        assert_eq!(seg(word, Articulation::Pair), vec!["e\u{301}t", "e\u{301}"]);
        assert_eq!(seg("e\u{301}", Articulation::Letter), vec!["e\u{301}"]);
    }

    #[test]
    fn whitespace_never_lands_in_a_fragment() {
        assert_eq!(seg("ab cde", Articulation::Pair), vec!["ab", "cd", "e"]);
        assert_eq!(seg("a b", Articulation::Letter), vec!["a", "b"]);
    }
}

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum Error {
    /// A word atom that cannot be segmented reached the compiler.
    #[snafu(display("Invalid atom at index {index}: {reason}"))]
    InvalidAtom { index: usize, reason: String },

    /// Selection reduction was asked to summarize zero atoms.
    #[snafu(display("Cannot reduce an empty atom selection"))]
    EmptySelection,
}

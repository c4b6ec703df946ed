/// The line execution engine behind epistles: compiling authored atoms into timed operations,
/// playing those operations back on an injected scheduler, and bulk editing the pace and
/// articulation of selected atoms. Ie everything but rendering and the document store.
pub mod articulation;
pub mod atom;
pub mod director;
pub mod error;
pub mod pace;
pub mod playback;
pub mod queue;
pub mod scheduler;
pub mod sequence;

pub use articulation::{Segmenter, StandardSegmenter};
pub use atom::{Articulation, AtomType, Effect, EpistleLine, LineAtom, Pace, UnknownName};
pub use director::{
    expand, reduce, AtomExchange, ExchangeId, LineDirector, Reduced, ReducedSelectionProps,
};
pub use error::{Error, Result};
pub use pace::{PaceTable, StandardPaces};
pub use playback::{PlaybackDriver, PlaybackState, PlaybackStatus, RenderItem};
pub use queue::{compile, Compiler, ExecutionOperation, ExecutionQueue, OperationKey};
pub use scheduler::{Scheduler, TimerHandle, Wake};
pub use sequence::{AtomSequence, InputOutcome};

use crate::atom::Pace;
use std::time::Duration;

/// Lookup from [`Pace`] to how long an operation stays on screen before playback advances.
pub trait PaceTable {
    fn timeout(&self, pace: Pace) -> Duration;
}

/// The fixed timing every epistle is played with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardPaces;

impl StandardPaces {
    pub const fn millis(pace: Pace) -> u64 {
        match pace {
            Pace::XSlow => 1000,
            Pace::Slow => 500,
            Pace::Normal => 250,
            Pace::Fast => 125,
            Pace::XFast => 50,
        }
    }
}

impl PaceTable for StandardPaces {
    fn timeout(&self, pace: Pace) -> Duration {
        Duration::from_millis(Self::millis(pace))
    }
}

impl<T: PaceTable + ?Sized> PaceTable for &T {
    fn timeout(&self, pace: Pace) -> Duration {
        (**self).timeout(pace)
    }
}

//! Per-game settings handed to the coordinator.

use std::time::Duration;

use gambit_types::Side;

pub const DEFAULT_SEARCH_DEPTH: u32 = 10;

/// Upper bounds for each kind of engine round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTimeouts {
    accept: Duration,
    search: Duration,
    probe: Duration,
}

impl Default for TurnTimeouts {
    fn default() -> Self {
        Self {
            accept: Duration::from_millis(3_000),
            search: Duration::from_millis(10_000),
            probe: Duration::from_millis(1_500),
        }
    }
}

impl TurnTimeouts {
    #[must_use]
    pub const fn new(accept: Duration, search: Duration, probe: Duration) -> Self {
        Self {
            accept,
            search,
            probe,
        }
    }

    /// Position acknowledgement (`isready` → `readyok`).
    #[must_use]
    pub const fn accept(self) -> Duration {
        self.accept
    }

    /// The engine's own move search.
    #[must_use]
    pub const fn search(self) -> Duration {
        self.search
    }

    /// The depth-1 end-of-game probe.
    #[must_use]
    pub const fn probe(self) -> Duration {
        self.probe
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    human_side: Side,
    depth: u32,
    timeouts: TurnTimeouts,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            human_side: Side::White,
            depth: DEFAULT_SEARCH_DEPTH,
            timeouts: TurnTimeouts::default(),
        }
    }
}

impl GameSettings {
    #[must_use]
    pub const fn with_human_side(mut self, side: Side) -> Self {
        self.human_side = side;
        self
    }

    /// Search depth for the engine's moves. Zero is raised to one.
    #[must_use]
    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = if depth == 0 { 1 } else { depth };
        self
    }

    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: TurnTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    #[must_use]
    pub const fn human_side(self) -> Side {
        self.human_side
    }

    #[must_use]
    pub const fn engine_side(self) -> Side {
        self.human_side.opposite()
    }

    #[must_use]
    pub const fn depth(self) -> u32 {
        self.depth
    }

    #[must_use]
    pub const fn timeouts(self) -> TurnTimeouts {
        self.timeouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = GameSettings::default();
        assert_eq!(settings.human_side(), Side::White);
        assert_eq!(settings.engine_side(), Side::Black);
        assert_eq!(settings.depth(), 10);
        assert_eq!(settings.timeouts().probe(), Duration::from_millis(1_500));
    }

    #[test]
    fn zero_depth_is_clamped() {
        assert_eq!(GameSettings::default().with_depth(0).depth(), 1);
    }
}

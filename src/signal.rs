//! Signal-level vocabulary shared by the decoder and the edge sources.

/// One of the two encoder channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    A,
    B,
}

/// Settled logic level of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    /// `true` is [`Level::High`], matching `InputPin::is_high()`.
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Direction of a single-channel edge, named by the level it moves *to*.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    Rising,
    Falling,
}

impl Transition {
    /// The level the channel settles at after this transition.
    pub fn level(self) -> Level {
        match self {
            Transition::Rising => Level::High,
            Transition::Falling => Level::Low,
        }
    }

    /// The transition that ends at `level`.
    pub fn to(level: Level) -> Self {
        match level {
            Level::High => Transition::Rising,
            Level::Low => Transition::Falling,
        }
    }
}

/// A validated edge on one of the decoder's two channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    pub channel: Channel,
    pub transition: Transition,
}

impl EdgeEvent {
    pub const fn new(channel: Channel, transition: Transition) -> Self {
        Self {
            channel,
            transition,
        }
    }
}

/// Rotation direction of one tick.
///
/// Clockwise is the sequence in which A leads B:
///
/// ```text
///  --> clockwise -->
///
///     +---+   +---+   +---+   +-
///  a  |   |   |   |   |   |   |
///    -+   +---+   +---+   +---+
///
///       +---+   +---+   +---
///  b    |   |   |   |   |
///    ---+   +---+   +---+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// `+1` for clockwise, `-1` for counterclockwise.
    pub fn increment(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

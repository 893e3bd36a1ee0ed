//! Quadrature decoding state machine.
//!
//! [`QuadratureDecoder`] converts an ordered stream of single-channel
//! edges into ±1 ticks. Each edge moves the two-bit `(A, B)` state by one
//! Gray-code step, so the step direction follows from which channel moved,
//! where it moved to, and the level the *other* channel is holding:
//!
//! ```text
//! clockwise:         00 -> 10 -> 11 -> 01 -> 00   (A leads B)
//! counterclockwise:  00 -> 01 -> 11 -> 10 -> 00   (B leads A)
//! ```

use core::fmt;

use crate::signal::{Channel, Direction, EdgeEvent, Level, Transition};

/// Step direction for `event` given the level held by the other channel.
///
/// Total over its domain: only one channel changes per event, so every
/// combination is a valid Gray-code step.
fn step_direction(event: EdgeEvent, other: Level) -> Direction {
    use Channel::{A, B};
    use Direction::{Clockwise, CounterClockwise};
    use Level::{High, Low};
    use Transition::{Falling, Rising};

    match (event.channel, event.transition, other) {
        (A, Rising, High) => CounterClockwise,
        (A, Rising, Low) => Clockwise,
        (A, Falling, High) => Clockwise,
        (A, Falling, Low) => CounterClockwise,
        (B, Rising, High) => Clockwise,
        (B, Rising, Low) => CounterClockwise,
        (B, Falling, High) => CounterClockwise,
        (B, Falling, Low) => Clockwise,
    }
}

fn ignore_tick(_: Direction) {}

/// Two-channel quadrature decoder with a running tick count.
///
/// The decoder owns exactly three pieces of state: the last level of each
/// channel and the count. A tick hook `H` is called once per processed
/// event; by default it does nothing.
///
/// # Example
///
/// ```
/// use quadrature_decoder::{Channel, EdgeEvent, Level, QuadratureDecoder, Transition};
///
/// let mut decoder = QuadratureDecoder::new(Level::Low, Level::Low);
/// decoder.process(EdgeEvent::new(Channel::A, Transition::Rising));
/// assert_eq!(decoder.count(), 1);
/// ```
pub struct QuadratureDecoder<H = fn(Direction)> {
    last_a: Level,
    last_b: Level,
    count: i32,
    on_tick: H,
}

impl QuadratureDecoder {
    /// Create a decoder seeded with the channels' physical levels.
    ///
    /// The levels must be read from the hardware; assuming a power-on
    /// state makes the first tick's direction a guess.
    pub fn new(a: Level, b: Level) -> Self {
        Self {
            last_a: a,
            last_b: b,
            count: 0,
            on_tick: ignore_tick,
        }
    }
}

impl<H> QuadratureDecoder<H>
where
    H: FnMut(Direction),
{
    /// Start counting from `count` instead of zero.
    pub fn with_count(mut self, count: i32) -> Self {
        self.count = count;
        self
    }

    /// Replace the tick hook.
    ///
    /// The hook runs after the count has been updated, once per processed
    /// event, with the direction of that tick.
    pub fn on_tick<G>(self, hook: G) -> QuadratureDecoder<G>
    where
        G: FnMut(Direction),
    {
        QuadratureDecoder {
            last_a: self.last_a,
            last_b: self.last_b,
            count: self.count,
            on_tick: hook,
        }
    }

    /// Apply one edge and return the direction of the resulting tick.
    ///
    /// The direction is computed from the other channel's stored level
    /// before this channel's stored level is updated.
    pub fn process(&mut self, event: EdgeEvent) -> Direction {
        let other = match event.channel {
            Channel::A => self.last_b,
            Channel::B => self.last_a,
        };
        let direction = step_direction(event, other);

        self.count = self.count.wrapping_add(direction.increment());

        match event.channel {
            Channel::A => self.last_a = event.transition.level(),
            Channel::B => self.last_b = event.transition.level(),
        }

        (self.on_tick)(direction);
        direction
    }

    /// Accumulated tick count.
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Overwrite the count (e.g. to re-zero). Channel levels are untouched.
    pub fn set_count(&mut self, count: i32) {
        self.count = count;
    }

    /// Last observed `(A, B)` levels.
    pub fn levels(&self) -> (Level, Level) {
        (self.last_a, self.last_b)
    }
}

impl<H> fmt::Debug for QuadratureDecoder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadratureDecoder")
            .field("last_a", &self.last_a)
            .field("last_b", &self.last_b)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

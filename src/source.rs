//! The hardware boundary: where edges come from.
//!
//! An [`EdgeSource`] owns the physical lines. It answers two questions:
//! what level is a line at right now (asked once per line at startup), and
//! which edges have happened since the last call (asked repeatedly, with a
//! [`WaitPolicy`] deciding how long to block).

use embassy_time::Duration;
use heapless::Vec;

use crate::config::MAX_EVENTS;
use crate::signal::{Level, Transition};

/// How long [`EdgeSource::read_edges`] may block before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Return whatever is already pending, possibly nothing.
    Immediate,
    /// Block until at least one edge is available.
    Forever,
    /// Block for at most the given duration.
    Within(Duration),
}

impl WaitPolicy {
    /// Build a policy from a signed microsecond timeout: negative waits
    /// forever, zero does not wait, positive waits up to that long.
    pub fn from_timeout_us(timeout_us: i64) -> Self {
        match timeout_us {
            t if t < 0 => WaitPolicy::Forever,
            0 => WaitPolicy::Immediate,
            t => WaitPolicy::Within(Duration::from_micros(t as u64)),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for WaitPolicy {
    fn format(&self, f: defmt::Formatter) {
        match self {
            WaitPolicy::Immediate => defmt::write!(f, "Immediate"),
            WaitPolicy::Forever => defmt::write!(f, "Forever"),
            WaitPolicy::Within(d) => defmt::write!(f, "Within({=u64}us)", d.as_micros()),
        }
    }
}

/// Edge type as reported by the hardware, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeKind {
    Rising,
    Falling,
    /// Anything the hardware reports that is not unambiguously a rising
    /// or falling edge.
    Other,
}

impl EdgeKind {
    pub fn transition(self) -> Option<Transition> {
        match self {
            EdgeKind::Rising => Some(Transition::Rising),
            EdgeKind::Falling => Some(Transition::Falling),
            EdgeKind::Other => None,
        }
    }
}

impl From<Transition> for EdgeKind {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Rising => EdgeKind::Rising,
            Transition::Falling => EdgeKind::Falling,
        }
    }
}

/// An unvalidated edge tagged with the source's own line handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawEdge<L> {
    pub line: L,
    pub kind: EdgeKind,
}

impl<L> RawEdge<L> {
    pub const fn new(line: L, kind: EdgeKind) -> Self {
        Self { line, kind }
    }
}

/// One batch of edges, in detection order.
pub type EdgeBatch<L> = Vec<RawEdge<L>, MAX_EVENTS>;

/// A supplier of ordered edge events for two digital lines.
///
/// Implementations must deliver edges in the exact order they were
/// detected, including the interleaving between lines; the decoder has no
/// reordering buffer.
pub trait EdgeSource {
    /// Collaborator-specific line handle (e.g. a GPIO number).
    type Line: Copy + PartialEq;

    /// Hardware error type.
    type Error;

    /// Read the current level of `line`.
    #[allow(async_fn_in_trait)]
    async fn level(&mut self, line: Self::Line) -> Result<Level, Self::Error>;

    /// Append the edges detected since the previous call to `batch`,
    /// blocking according to `wait`.
    ///
    /// Returning with nothing appended is not an error: it is the normal
    /// outcome of [`WaitPolicy::Immediate`] and of an expired
    /// [`WaitPolicy::Within`].
    #[allow(async_fn_in_trait)]
    async fn read_edges(
        &mut self,
        wait: WaitPolicy,
        batch: &mut EdgeBatch<Self::Line>,
    ) -> Result<(), Self::Error>;
}

//! Validation of raw edges before they reach the decoder.
//!
//! Edges on a line the decoder does not own, or edges whose type is not
//! clearly rising or falling, are rejected here. Rejection is a normal,
//! discardable outcome: callers count or log it and carry on.

use core::fmt;

use crate::signal::{Channel, EdgeEvent};
use crate::source::RawEdge;

/// Reason a raw edge was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejected {
    /// The edge came from a line that is neither channel A nor B.
    UnknownLine,
    /// The hardware did not report a plain rising or falling edge.
    AmbiguousTransition,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejected::UnknownLine => write!(f, "edge on a line not owned by this encoder"),
            Rejected::AmbiguousTransition => write!(f, "edge is neither rising nor falling"),
        }
    }
}

/// Assignment of source lines to encoder channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMap<L> {
    pub a: L,
    pub b: L,
}

impl<L> ChannelMap<L>
where
    L: Copy + PartialEq,
{
    pub const fn new(a: L, b: L) -> Self {
        Self { a, b }
    }

    /// The channel `line` is wired to, if any.
    pub fn channel(&self, line: L) -> Option<Channel> {
        if line == self.a {
            Some(Channel::A)
        } else if line == self.b {
            Some(Channel::B)
        } else {
            None
        }
    }

    /// Turn a raw edge into a decoder event, or say why it is unusable.
    pub fn classify(&self, edge: &RawEdge<L>) -> Result<EdgeEvent, Rejected> {
        let channel = self.channel(edge.line).ok_or(Rejected::UnknownLine)?;
        let transition = edge.kind.transition().ok_or(Rejected::AmbiguousTransition)?;
        Ok(EdgeEvent::new(channel, transition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Transition;
    use crate::source::EdgeKind;

    const MAP: ChannelMap<u8> = ChannelMap::new(23, 24);

    #[test]
    fn classifies_owned_lines() {
        assert_eq!(
            MAP.classify(&RawEdge::new(23, EdgeKind::Rising)),
            Ok(EdgeEvent::new(Channel::A, Transition::Rising))
        );
        assert_eq!(
            MAP.classify(&RawEdge::new(24, EdgeKind::Falling)),
            Ok(EdgeEvent::new(Channel::B, Transition::Falling))
        );
    }

    #[test]
    fn rejects_foreign_line() {
        assert_eq!(
            MAP.classify(&RawEdge::new(25, EdgeKind::Rising)),
            Err(Rejected::UnknownLine)
        );
    }

    #[test]
    fn rejects_ambiguous_edge() {
        assert_eq!(
            MAP.classify(&RawEdge::new(23, EdgeKind::Other)),
            Err(Rejected::AmbiguousTransition)
        );
    }

    #[test]
    fn unknown_line_wins_over_ambiguous_kind() {
        assert_eq!(
            MAP.classify(&RawEdge::new(7, EdgeKind::Other)),
            Err(Rejected::UnknownLine)
        );
    }
}

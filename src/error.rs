//! Error types for the encoder session.

use core::fmt;

/// Errors that end an [`Encoder`](crate::Encoder) session.
///
/// Both variants wrap the edge source's own error. Discarded edges are not
/// errors; see [`Rejected`](crate::Rejected).
#[derive(Debug)]
pub enum EncoderError<E> {
    /// Reading the initial channel levels failed; no decoder was built.
    Acquire(E),

    /// Reading a batch of edges failed. Edges may have been lost, so the
    /// count can no longer be trusted.
    Read(E),
}

impl<E> EncoderError<E> {
    /// The underlying source error.
    pub fn into_inner(self) -> E {
        match self {
            EncoderError::Acquire(e) | EncoderError::Read(e) => e,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for EncoderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncoderError::Acquire(e) => write!(f, "Failed to read initial levels: {:?}", e),
            EncoderError::Read(e) => write!(f, "Failed to read edges: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for EncoderError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncoderError::Acquire(e) => defmt::write!(f, "Failed to read initial levels: {}", e),
            EncoderError::Read(e) => defmt::write!(f, "Failed to read edges: {}", e),
        }
    }
}

/// Errors from [`GpioEdgeSource`](crate::GpioEdgeSource).
#[derive(Debug)]
pub enum GpioError<E> {
    /// Underlying pin error.
    Pin(E),

    /// A level was requested for a line number this source does not own.
    UnknownLine(u8),

    /// The caller's batch had no room for the edges just sampled. Nothing
    /// was appended; the edges are reported again once the batch has room.
    BatchFull,
}

// Allow ergonomic `?` propagation from raw pin errors.
impl<E> From<E> for GpioError<E> {
    fn from(error: E) -> Self {
        GpioError::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for GpioError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GpioError::Pin(e) => write!(f, "GPIO error: {:?}", e),
            GpioError::UnknownLine(line) => write!(f, "Line {} is not owned by this source", line),
            GpioError::BatchFull => write!(f, "Edge batch full"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for GpioError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            GpioError::Pin(e) => defmt::write!(f, "GPIO error: {}", e),
            GpioError::UnknownLine(line) => defmt::write!(f, "Unknown line {}", line),
            GpioError::BatchFull => defmt::write!(f, "Edge batch full"),
        }
    }
}

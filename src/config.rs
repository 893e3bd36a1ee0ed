//! Tuning constants and GPIO adapter configuration.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Capacity of an [`EdgeBatch`](crate::EdgeBatch): the most edges a single
/// [`EdgeSource::read_edges`](crate::EdgeSource::read_edges) call may return.
pub const MAX_EVENTS: usize = 32;

/// Default settle time after an edge before the pins are sampled.
///
/// The reference encoder bounces for up to 2 ms.
pub const DEFAULT_DEBOUNCE_US: u64 = 2000;

/// Detents per revolution of the reference encoder (informational only).
pub const PULSES_PER_REV: u32 = 24;

// ---------------------------------------------------------------------------
// GPIO adapter configuration
// ---------------------------------------------------------------------------

/// Configuration for [`GpioEdgeSource`](crate::GpioEdgeSource).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioConfig {
    /// Microseconds to wait after an edge before sampling both pins.
    /// Zero samples immediately.
    pub debounce_us: u64,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            debounce_us: DEFAULT_DEBOUNCE_US,
        }
    }
}

impl GpioConfig {
    /// Configuration with no settle delay, for sources that debounce in
    /// hardware.
    pub const fn without_debounce() -> Self {
        Self { debounce_us: 0 }
    }
}

//! [`EdgeSource`] over two async GPIO input pins.
//!
//! The pins only report *that* an edge happened, so the source keeps the
//! last level it sampled from each pin and turns level differences into
//! edges. Every sample is compared against the previous one, which also
//! catches edges that occurred while nobody was waiting.

use embassy_futures::select::{select, Either};
use embassy_time::{with_timeout, Duration, Timer};
use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal_async::digital::Wait;
use heapless::Vec;

use crate::boundary::ChannelMap;
use crate::config::GpioConfig;
use crate::error::GpioError;
use crate::signal::{Level, Transition};
use crate::source::{EdgeBatch, EdgeSource, RawEdge, WaitPolicy};

/// Edge source reading channel A and B from two GPIO inputs.
///
/// Lines are identified by the caller-chosen numbers passed to
/// [`new`](Self::new), typically the GPIO numbers of the pins. Pull-ups and
/// pin mode are the caller's business; configure the pins before handing
/// them over.
pub struct GpioEdgeSource<P> {
    pin_a: P,
    pin_b: P,
    line_a: u8,
    line_b: u8,
    last_a: Option<Level>,
    last_b: Option<Level>,
    config: GpioConfig,
}

impl<P> GpioEdgeSource<P>
where
    P: InputPin + Wait,
{
    /// Create a source over `pin_a` (line `line_a`) and `pin_b` (line `line_b`).
    pub fn new(pin_a: P, line_a: u8, pin_b: P, line_b: u8, config: GpioConfig) -> Self {
        Self {
            pin_a,
            pin_b,
            line_a,
            line_b,
            last_a: None,
            last_b: None,
            config,
        }
    }

    /// Channel map matching this source's line numbers.
    pub fn channels(&self) -> ChannelMap<u8> {
        ChannelMap::new(self.line_a, self.line_b)
    }

    /// Give the pins back as `(pin_a, pin_b)`.
    pub fn release(self) -> (P, P) {
        (self.pin_a, self.pin_b)
    }

    // -----------------------------------------------------------------------
    // Sampling
    // -----------------------------------------------------------------------

    async fn wait_for_edge(&mut self) -> Result<(), <P as ErrorType>::Error> {
        match select(self.pin_a.wait_for_any_edge(), self.pin_b.wait_for_any_edge()).await {
            Either::First(result) | Either::Second(result) => result,
        }
    }

    /// Read both pins and append an edge for each one that moved since the
    /// previous sample, A before B. Returns the number of edges appended.
    ///
    /// The first sample of a pin only records its level. If `batch` has no
    /// room for the new edges, nothing is appended and the stored levels are
    /// left as they were, so the edges are reported again on the next call.
    fn sample(
        &mut self,
        batch: &mut EdgeBatch<u8>,
    ) -> Result<usize, GpioError<<P as ErrorType>::Error>> {
        let a = Level::from(self.pin_a.is_high()?);
        let b = Level::from(self.pin_b.is_high()?);

        let moved_a = self.last_a.is_some_and(|last| last != a);
        let moved_b = self.last_b.is_some_and(|last| last != b);

        if moved_a && moved_b {
            // Both channels moved between samples; their true order is lost.
            #[cfg(feature = "defmt")]
            defmt::warn!("Coalesced edges on lines {} and {}", self.line_a, self.line_b);
        }

        let edges: Vec<RawEdge<u8>, 2> = [(moved_a, self.line_a, a), (moved_b, self.line_b, b)]
            .into_iter()
            .filter(|&(moved, _, _)| moved)
            .map(|(_, line, level)| RawEdge::new(line, Transition::to(level).into()))
            .collect();

        batch
            .extend_from_slice(&edges)
            .map_err(|_| GpioError::BatchFull)?;

        self.last_a = Some(a);
        self.last_b = Some(b);
        Ok(edges.len())
    }

    /// Wait for a pin edge, settle, and sample; repeat until the sample
    /// shows a level change. A wake whose level bounced back is not an edge.
    async fn wait_and_sample(
        &mut self,
        batch: &mut EdgeBatch<u8>,
    ) -> Result<(), GpioError<<P as ErrorType>::Error>> {
        loop {
            self.wait_for_edge().await?;

            // Let the contacts settle before trusting the levels.
            if self.config.debounce_us > 0 {
                Timer::after(Duration::from_micros(self.config.debounce_us)).await;
            }

            if self.sample(batch)? > 0 {
                return Ok(());
            }
        }
    }
}

impl<P> EdgeSource for GpioEdgeSource<P>
where
    P: InputPin + Wait,
{
    type Line = u8;
    type Error = GpioError<<P as ErrorType>::Error>;

    async fn level(&mut self, line: u8) -> Result<Level, Self::Error> {
        if line == self.line_a {
            let level = Level::from(self.pin_a.is_high()?);
            self.last_a = Some(level);
            Ok(level)
        } else if line == self.line_b {
            let level = Level::from(self.pin_b.is_high()?);
            self.last_b = Some(level);
            Ok(level)
        } else {
            Err(GpioError::UnknownLine(line))
        }
    }

    async fn read_edges(
        &mut self,
        wait: WaitPolicy,
        batch: &mut EdgeBatch<u8>,
    ) -> Result<(), Self::Error> {
        // Edges that happened since the last call need no waiting.
        if self.sample(batch)? > 0 {
            return Ok(());
        }

        match wait {
            WaitPolicy::Immediate => Ok(()),
            WaitPolicy::Forever => self.wait_and_sample(batch).await,
            WaitPolicy::Within(timeout) => {
                match with_timeout(timeout, self.wait_and_sample(batch)).await {
                    Ok(result) => result,
                    Err(_) => Ok(()),
                }
            }
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

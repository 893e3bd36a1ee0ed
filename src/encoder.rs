//! Polling session tying an [`EdgeSource`] to a [`QuadratureDecoder`].
//!
//! [`Encoder`] owns the source for its whole lifetime. Dropping the encoder
//! (or calling [`Encoder::release`]) gives the lines back; there is no
//! separate teardown step.

use heapless::Vec;

use crate::boundary::ChannelMap;
use crate::decoder::QuadratureDecoder;
use crate::error::EncoderError;
use crate::signal::Direction;
use crate::source::{EdgeBatch, EdgeSource, WaitPolicy};

/// A quadrature encoder read through an [`EdgeSource`].
///
/// # Example
///
/// ```ignore
/// let mut encoder = Encoder::new(source, ChannelMap::new(14, 15)).await?;
///
/// // Non-blocking poll from a busy loop
/// encoder.update(WaitPolicy::Immediate).await?;
///
/// // Or sleep until the count actually moves
/// let count = encoder.wait_for_change().await?;
/// ```
pub struct Encoder<S, H = fn(Direction)>
where
    S: EdgeSource,
{
    source: S,
    channels: ChannelMap<S::Line>,
    decoder: QuadratureDecoder<H>,
    batch: EdgeBatch<S::Line>,
    discarded: u32,
    reported: i32,
}

impl<S> Encoder<S>
where
    S: EdgeSource,
{
    /// Start a session on `source`.
    ///
    /// Reads the level of channel A, then channel B, exactly once to seed
    /// the decoder. The count starts at zero.
    ///
    /// # Errors
    /// * [`EncoderError::Acquire`] if either level read fails. The source is
    ///   dropped and no decoder exists.
    pub async fn new(
        mut source: S,
        channels: ChannelMap<S::Line>,
    ) -> Result<Self, EncoderError<S::Error>> {
        let a = source
            .level(channels.a)
            .await
            .map_err(EncoderError::Acquire)?;
        let b = source
            .level(channels.b)
            .await
            .map_err(EncoderError::Acquire)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Encoder initial levels: a={}, b={}", a, b);

        Ok(Self {
            source,
            channels,
            decoder: QuadratureDecoder::new(a, b),
            batch: Vec::new(),
            discarded: 0,
            reported: 0,
        })
    }
}

impl<S, H> Encoder<S, H>
where
    S: EdgeSource,
    H: FnMut(Direction),
{
    /// Start counting from `count` instead of zero.
    pub fn with_count(mut self, count: i32) -> Self {
        self.set_count(count);
        self
    }

    /// Install a hook called once per tick with its direction.
    pub fn on_tick<G>(self, hook: G) -> Encoder<S, G>
    where
        G: FnMut(Direction),
    {
        Encoder {
            source: self.source,
            channels: self.channels,
            decoder: self.decoder.on_tick(hook),
            batch: self.batch,
            discarded: self.discarded,
            reported: self.reported,
        }
    }

    // -----------------------------------------------------------------------
    // Polling
    // -----------------------------------------------------------------------

    /// Pull one batch of edges from the source and decode it.
    ///
    /// Edges are fed to the decoder in the order the source returned them.
    /// Edges on foreign lines or with an ambiguous type are discarded and
    /// counted in [`discarded`](Self::discarded).
    ///
    /// # Returns
    /// The number of edges accepted by the decoder.
    ///
    /// # Errors
    /// * [`EncoderError::Read`] if the source fails. Nothing from the failed
    ///   batch is applied.
    pub async fn update(&mut self, wait: WaitPolicy) -> Result<usize, EncoderError<S::Error>> {
        self.batch.clear();
        self.source
            .read_edges(wait, &mut self.batch)
            .await
            .map_err(EncoderError::Read)?;

        let mut accepted = 0;
        for raw in self.batch.iter() {
            match self.channels.classify(raw) {
                Ok(event) => {
                    self.decoder.process(event);
                    accepted += 1;
                }
                Err(_reason) => {
                    self.discarded = self.discarded.wrapping_add(1);
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Discarded edge: {}", _reason);
                }
            }
        }

        Ok(accepted)
    }

    /// Block until the count differs from the last value returned here
    /// (or set via [`set_count`](Self::set_count)), then return it.
    ///
    /// Bursts that cancel out, such as contact bounce on a single channel,
    /// do not wake the caller.
    pub async fn wait_for_change(&mut self) -> Result<i32, EncoderError<S::Error>> {
        loop {
            self.update(WaitPolicy::Forever).await?;

            let count = self.decoder.count();
            if count != self.reported {
                self.reported = count;
                return Ok(count);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn count(&self) -> i32 {
        self.decoder.count()
    }

    /// Overwrite the count. Channel levels are untouched.
    pub fn set_count(&mut self, count: i32) {
        self.decoder.set_count(count);
        self.reported = count;
    }

    /// Number of raw edges dropped because they could not be attributed to
    /// a channel or transition.
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    pub fn decoder(&self) -> &QuadratureDecoder<H> {
        &self.decoder
    }

    /// End the session and hand the source back.
    pub fn release(self) -> S {
        self.source
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use std::collections::VecDeque;

    use embassy_futures::block_on;

    use crate::signal::Level;
    use crate::source::{EdgeKind, RawEdge};

    const LINE_A: u8 = 23;
    const LINE_B: u8 = 24;
    const CHANNELS: ChannelMap<u8> = ChannelMap::new(LINE_A, LINE_B);

    #[derive(Debug, PartialEq)]
    struct MockError;

    /// Edge source that replays scripted batches.
    struct MockSource {
        a: Level,
        b: Level,
        fail_levels: bool,
        batches: VecDeque<Result<std::vec::Vec<RawEdge<u8>>, MockError>>,
        level_reads: std::vec::Vec<u8>,
        waits: std::vec::Vec<WaitPolicy>,
    }

    impl MockSource {
        fn new(a: Level, b: Level) -> Self {
            Self {
                a,
                b,
                fail_levels: false,
                batches: VecDeque::new(),
                level_reads: std::vec::Vec::new(),
                waits: std::vec::Vec::new(),
            }
        }

        fn batch(mut self, edges: &[(u8, EdgeKind)]) -> Self {
            let edges = edges
                .iter()
                .map(|&(line, kind)| RawEdge::new(line, kind))
                .collect();
            self.batches.push_back(Ok(edges));
            self
        }

        fn failure(mut self) -> Self {
            self.batches.push_back(Err(MockError));
            self
        }
    }

    impl EdgeSource for MockSource {
        type Line = u8;
        type Error = MockError;

        async fn level(&mut self, line: u8) -> Result<Level, MockError> {
            self.level_reads.push(line);
            if self.fail_levels {
                return Err(MockError);
            }
            Ok(if line == LINE_A { self.a } else { self.b })
        }

        async fn read_edges(
            &mut self,
            wait: WaitPolicy,
            batch: &mut EdgeBatch<u8>,
        ) -> Result<(), MockError> {
            self.waits.push(wait);
            match self.batches.pop_front() {
                Some(Ok(edges)) => {
                    for edge in edges {
                        batch.push(edge).unwrap();
                    }
                    Ok(())
                }
                Some(Err(e)) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn start(source: MockSource) -> Encoder<MockSource> {
        block_on(Encoder::new(source, CHANNELS)).unwrap()
    }

    // ── Startup ──────────────────────────────────────────────────────

    #[test]
    fn reads_each_channel_once_in_order() {
        let encoder = start(MockSource::new(Level::High, Level::Low));

        assert_eq!(encoder.count(), 0);
        assert_eq!(encoder.decoder().levels(), (Level::High, Level::Low));

        let source = encoder.release();
        assert_eq!(source.level_reads, [LINE_A, LINE_B]);
        assert!(source.waits.is_empty());
    }

    #[test]
    fn acquire_failure_builds_no_decoder() {
        let mut source = MockSource::new(Level::Low, Level::Low);
        source.fail_levels = true;

        let result = block_on(Encoder::new(source, CHANNELS));
        assert!(matches!(result, Err(EncoderError::Acquire(MockError))));
    }

    // ── Polling ──────────────────────────────────────────────────────

    #[test]
    fn update_feeds_edges_in_order() {
        let source = MockSource::new(Level::Low, Level::Low).batch(&[
            (LINE_A, EdgeKind::Rising),
            (LINE_B, EdgeKind::Rising),
            (LINE_A, EdgeKind::Falling),
        ]);
        let mut encoder = start(source);

        let accepted = block_on(encoder.update(WaitPolicy::Immediate)).unwrap();

        assert_eq!(accepted, 3);
        assert_eq!(encoder.count(), 3);
        assert_eq!(encoder.decoder().levels(), (Level::Low, Level::High));
        assert_eq!(encoder.release().waits, [WaitPolicy::Immediate]);
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let mut encoder = start(MockSource::new(Level::Low, Level::High));

        let accepted = block_on(encoder.update(WaitPolicy::Immediate)).unwrap();

        assert_eq!(accepted, 0);
        assert_eq!(encoder.count(), 0);
        assert_eq!(encoder.decoder().levels(), (Level::Low, Level::High));
    }

    #[test]
    fn malformed_edges_are_discarded_and_counted() {
        let source = MockSource::new(Level::Low, Level::Low).batch(&[
            (99, EdgeKind::Rising),
            (LINE_A, EdgeKind::Other),
            (LINE_A, EdgeKind::Rising),
        ]);
        let mut encoder = start(source);

        let accepted = block_on(encoder.update(WaitPolicy::Forever)).unwrap();

        assert_eq!(accepted, 1);
        assert_eq!(encoder.discarded(), 2);
        assert_eq!(encoder.count(), 1);
    }

    #[test]
    fn read_failure_is_propagated() {
        let source = MockSource::new(Level::Low, Level::Low)
            .batch(&[(LINE_A, EdgeKind::Rising)])
            .failure();
        let mut encoder = start(source);

        block_on(encoder.update(WaitPolicy::Forever)).unwrap();
        let result = block_on(encoder.update(WaitPolicy::Forever));

        assert!(matches!(result, Err(EncoderError::Read(MockError))));
        assert_eq!(encoder.count(), 1);
    }

    // ── Change notification ──────────────────────────────────────────

    #[test]
    fn wait_for_change_skips_bursts_that_cancel() {
        let source = MockSource::new(Level::Low, Level::Low)
            .batch(&[])
            .batch(&[(LINE_A, EdgeKind::Rising), (LINE_A, EdgeKind::Falling)])
            .batch(&[(LINE_B, EdgeKind::Rising)]);
        let mut encoder = start(source);

        let count = block_on(encoder.wait_for_change()).unwrap();

        assert_eq!(count, -1);
        assert_eq!(encoder.release().waits, [WaitPolicy::Forever; 3]);
    }

    #[test]
    fn wait_for_change_reports_relative_to_seed() {
        let source = MockSource::new(Level::Low, Level::Low)
            .batch(&[(LINE_A, EdgeKind::Rising)])
            .batch(&[(LINE_B, EdgeKind::Rising)]);
        let mut encoder = start(source).with_count(10);

        assert_eq!(block_on(encoder.wait_for_change()).unwrap(), 11);
        assert_eq!(block_on(encoder.wait_for_change()).unwrap(), 12);
    }

    #[test]
    fn wait_for_change_stops_on_read_failure() {
        let source = MockSource::new(Level::Low, Level::Low).batch(&[]).failure();
        let mut encoder = start(source);

        let result = block_on(encoder.wait_for_change());
        assert!(matches!(result, Err(EncoderError::Read(MockError))));
    }

    // ── Hooks and seeding ────────────────────────────────────────────

    #[test]
    fn tick_hook_sees_every_accepted_edge() {
        let source = MockSource::new(Level::Low, Level::Low).batch(&[
            (LINE_A, EdgeKind::Rising),
            (LINE_B, EdgeKind::Other),
            (LINE_A, EdgeKind::Falling),
        ]);
        let net = Cell::new(0);
        let mut encoder = start(source).on_tick(|direction| net.set(net.get() + direction.increment()));

        block_on(encoder.update(WaitPolicy::Immediate)).unwrap();

        assert_eq!(net.get(), 0);
        assert_eq!(encoder.count(), 0);
        assert_eq!(encoder.discarded(), 1);
    }

    #[test]
    fn set_count_keeps_levels() {
        let source = MockSource::new(Level::Low, Level::Low)
            .batch(&[(LINE_A, EdgeKind::Rising)])
            .batch(&[(LINE_B, EdgeKind::Rising)]);
        let mut encoder = start(source);

        block_on(encoder.update(WaitPolicy::Immediate)).unwrap();
        encoder.set_count(0);
        block_on(encoder.update(WaitPolicy::Immediate)).unwrap();

        assert_eq!(encoder.count(), 1);
        assert_eq!(encoder.decoder().levels(), (Level::High, Level::High));
    }
}

//! Async decoder for two-channel quadrature rotary encoders.
//!
//! This crate turns the rising/falling edges of an encoder's A and B
//! channels into a signed tick count. It targets Embassy firmware but the
//! core state machine is plain, allocation-free Rust.
//!
//! # Architecture
//!
//! The crate is split into three layers:
//!
//! - **[`QuadratureDecoder`]**: the pure state machine. Consumes one
//!   [`EdgeEvent`] at a time, keeps the last level of each channel and the
//!   running count. No I/O, no timers.
//! - **[`EdgeSource`]**: the hardware boundary. Supplies the initial
//!   channel levels and batches of [`RawEdge`]s under a [`WaitPolicy`].
//!   [`GpioEdgeSource`] implements it over two `embedded-hal-async` pins.
//! - **[`Encoder`]**: the polling session. Pulls batches from a source,
//!   drops malformed edges via [`ChannelMap`], and feeds the rest to the
//!   decoder in detection order.
//!
//! # Quick start
//!
//! ```ignore
//! use quadrature_decoder::{ChannelMap, Encoder, GpioConfig, GpioEdgeSource};
//!
//! // `pin_a` / `pin_b` are any `embedded-hal-async` input pins
//! let source = GpioEdgeSource::new(pin_a, 14, pin_b, 15, GpioConfig::default());
//! let mut encoder = Encoder::new(source, ChannelMap::new(14, 15)).await?;
//!
//! loop {
//!     let count = encoder.wait_for_change().await?;
//! }
//! ```
//!
//! # Features
//!
//! - **`defmt`**: Enable [`defmt::Format`] implementations on public types
//!   and log discarded or coalesced edges.

#![cfg_attr(not(test), no_std)]

pub use boundary::{ChannelMap, Rejected};
pub use config::{GpioConfig, DEFAULT_DEBOUNCE_US, MAX_EVENTS, PULSES_PER_REV};
pub use decoder::QuadratureDecoder;
pub use encoder::Encoder;
pub use error::{EncoderError, GpioError};
pub use gpio::GpioEdgeSource;
pub use signal::{Channel, Direction, EdgeEvent, Level, Transition};
pub use source::{EdgeBatch, EdgeKind, EdgeSource, RawEdge, WaitPolicy};

mod boundary;
mod config;
mod decoder;
mod encoder;
mod error;
mod gpio;
mod signal;
mod source;

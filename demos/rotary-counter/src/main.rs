//! Rotary counter demo
//!
//! Reads a mechanical quadrature encoder wired straight to two GPIOs of the
//! Raspberry Pi Pico 2 and logs the tick count via defmt every time it
//! changes.
//!
//! # Wiring
//!
//! | Signal | Pico 2 Pin | Notes                        |
//! |--------|------------|------------------------------|
//! | ENC A  | GP14       | Pull-up enabled              |
//! | ENC B  | GP15       | Pull-up enabled              |
//! | ENC C  | GND        | Common                       |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use {defmt_rtt as _, panic_probe as _};

use quadrature_decoder::{Direction, Encoder, GpioConfig, GpioEdgeSource};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

const LINE_A: u8 = 14;
const LINE_B: u8 = 15;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- Encoder channels (common pin to GND, so pull-ups) ---
    let pin_a = Input::new(p.PIN_14, Pull::Up);
    let pin_b = Input::new(p.PIN_15, Pull::Up);

    let source = GpioEdgeSource::new(pin_a, LINE_A, pin_b, LINE_B, GpioConfig::default());
    let channels = source.channels();

    // Initial levels are read here; a failure means the pins are unusable.
    let encoder = match Encoder::new(source, channels).await {
        Ok(encoder) => encoder,
        Err(e) => {
            error!("Encoder start failed: {}", e);
            return;
        }
    };

    let mut encoder = encoder.on_tick(|direction: Direction| {
        debug!("tick {}", direction);
    });

    let (a, b) = encoder.decoder().levels();
    info!("Encoder started (a={}, b={}), turn the knob", a, b);

    loop {
        match encoder.wait_for_change().await {
            Ok(count) => info!("count: {}", count),
            Err(e) => {
                // Edges may have been lost; the count is no longer trustworthy.
                error!("Encoder read failed: {}", e);
                break;
            }
        }
    }

    info!("Discarded edges: {}", encoder.discarded());
}

/*!
 # Two-channel PWM on a 16-bit timer

 This crate turns a request like "20 ms period, half duty on channel A" into the
 register values of a 16-bit hardware timer: a clock divider, the counter top and
 one compare value per output channel.

 The timer itself is reached through the [`HardwarePort`](port::HardwarePort) trait.
 Two kinds of ports ship with the crate:

 *   [`sim::SimulatedPort`], a software model of the ATmega328P Timer1 registers,
     always available and used by the tests.
 *   [`stm32::Tim3Port`] and `stm32::Tim4Port`, enabled by selecting one of the chip
     features below.

 ```
 use timer16_pwm::prelude::*;
 use timer16_pwm::port::Channel;
 use timer16_pwm::pwm::Pwm;
 use timer16_pwm::sim::SimulatedPort;

 let mut pwm = Pwm::new(SimulatedPort::new(), 16.mhz());

 // 20 ms is 320_000 ticks at 16 MHz, too many for the counter without a divider
 let solution = pwm.initialize(20.ms()).unwrap();
 assert_eq!(solution.divider, 8);
 assert_eq!(solution.top, 39_999);

 assert_eq!(pwm.set_resolution(16), 15);
 assert_eq!(pwm.write(Channel::A, 16_384).unwrap(), 20_000);
 ```

 # Selecting a chip

 Hardware ports are only compiled when a chip is selected as a feature:

 *   stm32f302xb
 *   stm32f302xc
 *   stm32f303xb
 *   stm32f303xc
 *   stm32f303xd
 *   stm32f303xe

 Example: The STM32F3Discovery board has a STM32F303VCT6 chip.
 So you want to expand your call to `cargo` with `--features stm32f303xc`.
*/
#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod fmt;

pub use embedded_hal as hal;

// Provides the critical-section implementation behind `HardwarePort::interrupt_free`
#[cfg(feature = "device-selected")]
use cortex_m as _;

#[cfg(feature = "device-selected")]
cfg_if::cfg_if! {
    if #[cfg(feature = "svd-f303")] {
        pub use stm32f3::stm32f303 as pac;
    } else if #[cfg(feature = "svd-f302")] {
        pub use stm32f3::stm32f302 as pac;
    }
}

pub mod config;
pub mod error;
pub mod port;
pub mod prelude;
pub mod prescaler;
pub mod pwm;
pub mod resolution;
pub mod sim;
#[cfg(feature = "device-selected")]
#[cfg_attr(docsrs, doc(cfg(feature = "device-selected")))]
pub mod stm32;
pub mod time;
pub mod timer;

pub use crate::error::Error;

/*!
# Testsuite

This testsuite module defines the test setup and the wiring the tests expect.

Because of the ease of use, the tests are written for the STM32F3Discovery board.

The PWM outputs of TIM3 are looped back to plain input pins, so the duty cycle
can be measured by sampling the inputs:

| output       | input |
|--------------|-------|
| PA6 (TIM3_CH1) | PC0 |
| PA7 (TIM3_CH2) | PC1 |
*/
#![no_std]
#![cfg_attr(test, no_main)]

use defmt_rtt as _;
use panic_probe as _;

use timer16_pwm::pac;

/// Timer clock of TIM3 with the reset clock tree, HSI without any prescaler
pub const TIMER_CLOCK_HZ: u32 = 8_000_000;

/// Input pin number on GPIOC looped back from channel A
pub const LOOPBACK_A: u32 = 0;
/// Input pin number on GPIOC looped back from channel B
pub const LOOPBACK_B: u32 = 1;

/// Input pins sampling the PWM outputs.
pub struct Loopback {
    _gpioc: pac::GPIOC,
}

impl Loopback {
    /// Powers GPIOC, whose pins reset to floating inputs.
    pub fn new(gpioc: pac::GPIOC) -> Self {
        // SAFETY: Single bit read-modify-write of the port clock enable
        unsafe { (*pac::RCC::ptr()).ahbenr.modify(|_, w| w.iopcen().set_bit()) };
        Loopback { _gpioc: gpioc }
    }

    /// Reads `pin` `samples` times and returns how often it was high.
    pub fn count_high(&self, pin: u32, samples: u32) -> u32 {
        // SAFETY: Reading the input data register has no side effects
        let gpioc = unsafe { &*pac::GPIOC::ptr() };
        (0..samples)
            .filter(|_| gpioc.idr.read().bits() & (1 << pin) != 0)
            .count() as u32
    }
}

#[export_name = "main"]
unsafe extern "C" fn __dummy_entry() -> ! {
    defmt_test::export::exit()
}

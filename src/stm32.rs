//! # STM32F3 general purpose timers
//!
//! [`HardwarePort`]s for channels 1 and 2 of TIM3 and TIM4:
//!
//! | port       | channel A | channel B | alternate function |
//! |------------|-----------|-----------|--------------------|
//! | `Tim3Port` | PA6       | PA7       | AF2                |
//! | `Tim4Port` | PB6       | PB7       | AF2                |
//!
//! The prescaler takes any divider from 1 to 65536, the ports offer every power
//! of two that fits in a `u16`. Both channels run in PWM mode 1 with compare
//! preload, so duty cycle updates take effect at the next period.
//!
//! The timer clock handed to [`Pwm`](crate::pwm::Pwm) is the APB1 timer clock,
//! which is twice PCLK1 whenever the APB1 prescaler is not 1.
//!
//! ```no_run
//! use timer16_pwm::prelude::*;
//! use timer16_pwm::pac;
//! use timer16_pwm::port::Channel;
//! use timer16_pwm::pwm::Pwm;
//! use timer16_pwm::stm32::Tim3Port;
//!
//! let dp = pac::Peripherals::take().unwrap();
//!
//! // HSI after reset
//! let mut pwm = Pwm::new(Tim3Port::new(dp.TIM3), 8.mhz());
//! pwm.initialize(20.ms()).unwrap();
//! pwm.write(Channel::A, 512).unwrap();
//! ```

use crate::pac::{GPIOA, GPIOB, RCC, TIM3, TIM4};
use crate::port::{Channel, HardwarePort, Mode};
use crate::prescaler::DividerTable;

/// Modify specific index of array-like register
macro_rules! modify_at {
    ($reg:expr, $bitwidth:expr, $index:expr, $value:expr) => {
        $reg.modify(|r, w| {
            let mask = !(u32::MAX >> (32 - $bitwidth) << ($bitwidth * $index));
            let value = $value << ($bitwidth * $index);
            w.bits(r.bits() & mask | value)
        })
    };
}

/// Powers of two up to the largest `u16`
const POW2_DIVIDERS: DividerTable = DividerTable::new(&[
    1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768,
]);

/// `OCxM` value of PWM mode 1: active while the counter is below the compare value
const OCM_PWM1: u32 = 0b110;

/// `CCMR1` with both channels in PWM mode 1 and compare preload enabled
const CCMR1_PWM1_PRELOAD: u32 = (OCM_PWM1 << 4) | (1 << 3) | (OCM_PWM1 << 12) | (1 << 11);

/// `MODER` value of alternate function mode
const MODER_ALTERNATE: u32 = 0b10;

macro_rules! timer_port {
    ($({
        $TIMX:ident: ($X:literal, $GPIOX:ident, $x:ident, $pin_a:literal, $pin_b:literal, $af:literal),
    },)+) => {
        paste::paste! {
            $(
                #[doc = concat!("Channels 1 and 2 of ", stringify!($TIMX), " as a [`HardwarePort`].")]
                ///
                /// [`configure_outputs`](HardwarePort::configure_outputs) switches the
                /// two output pins to their alternate function. They must not be used
                /// for anything else while the port is alive.
                #[derive(Debug)]
                pub struct [<Tim $X Port>] {
                    tim: $TIMX,
                }

                impl [<Tim $X Port>] {
                    /// Powers up and resets the timer.
                    pub fn new(tim: $TIMX) -> Self {
                        // SAFETY: Single bit read-modify-writes of the enable and
                        // reset bits belonging to the timer we own.
                        let rcc = unsafe { &*RCC::ptr() };
                        rcc.apb1enr.modify(|_, w| w.[<tim $X en>]().set_bit());
                        rcc.apb1rstr.modify(|_, w| w.[<tim $X rst>]().set_bit());
                        rcc.apb1rstr.modify(|_, w| w.[<tim $X rst>]().clear_bit());

                        Self { tim }
                    }

                    /// Stops the timer and releases it
                    pub fn free(mut self) -> $TIMX {
                        self.reset_counter();
                        self.tim
                    }
                }

                impl HardwarePort for [<Tim $X Port>] {
                    const DIVIDERS: DividerTable = POW2_DIVIDERS;

                    fn reset_counter(&mut self) {
                        self.tim.cr1.reset();
                        self.tim.ccer.reset();
                        // NOTE(unsafe): all of these registers accept any value.
                        unsafe {
                            self.tim.ccmr1_output().write(|w| w.bits(0));
                            self.tim.psc.write(|w| w.bits(0));
                            self.tim.cnt.write(|w| w.bits(0));
                        }
                    }

                    fn set_mode(&mut self, mode: Mode) {
                        match mode {
                            Mode::FastPwm => {
                                // NOTE(unsafe): documented PWM mode 1 encoding
                                self.tim
                                    .ccmr1_output()
                                    .write(|w| unsafe { w.bits(CCMR1_PWM1_PRELOAD) });
                                self.tim
                                    .ccer
                                    .modify(|_, w| w.cc1e().set_bit().cc2e().set_bit());
                                // Buffer the top so it only changes on an update event
                                self.tim.cr1.modify(|_, w| w.arpe().set_bit());
                            }
                        }
                    }

                    fn set_boundary(&mut self, top: u16) {
                        self.tim.arr.write(|w| unsafe { w.bits(u32::from(top)) });
                    }

                    fn set_clock_select(&mut self, divider: u16) {
                        self.tim
                            .psc
                            .write(|w| unsafe { w.bits(u32::from(divider) - 1) });
                        // Load the prescaler and top from their shadow registers
                        self.tim.egr.write(|w| w.ug().set_bit());
                        self.tim.cr1.modify(|_, w| w.cen().set_bit());
                    }

                    fn set_compare(&mut self, channel: Channel, value: u16) {
                        match channel {
                            Channel::A => self.tim.ccr1.write(|w| unsafe { w.bits(u32::from(value)) }),
                            Channel::B => self.tim.ccr2.write(|w| unsafe { w.bits(u32::from(value)) }),
                        }
                    }

                    fn compare(&self, channel: Channel) -> u16 {
                        match channel {
                            Channel::A => self.tim.ccr1.read().bits() as u16,
                            Channel::B => self.tim.ccr2.read().bits() as u16,
                        }
                    }

                    fn configure_outputs(&mut self) {
                        // SAFETY: The GPIO port clock bit is a single bit
                        // read-modify-write, the pin fields are the two pins this
                        // port reserves.
                        unsafe {
                            (*RCC::ptr()).ahbenr.modify(|_, w| w.[<iop $x en>]().set_bit());

                            let gpio = &*$GPIOX::ptr();
                            modify_at!(gpio.moder, 2, $pin_a, MODER_ALTERNATE);
                            modify_at!(gpio.moder, 2, $pin_b, MODER_ALTERNATE);
                            modify_at!(gpio.afrl, 4, $pin_a, $af);
                            modify_at!(gpio.afrl, 4, $pin_b, $af);
                        }
                    }

                    fn set_output_enabled(&mut self, channel: Channel, enabled: bool) {
                        match channel {
                            Channel::A => self.tim.ccer.modify(|_, w| w.cc1e().bit(enabled)),
                            Channel::B => self.tim.ccer.modify(|_, w| w.cc2e().bit(enabled)),
                        }
                    }
                }
            )+
        }
    };
}

timer_port! {
    { TIM3: (3, GPIOA, a, 6, 7, 2), },
    { TIM4: (4, GPIOB, b, 6, 7, 2), },
}

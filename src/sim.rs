//! # Simulated ATmega328P Timer1
//!
//! A software stand-in for the Timer1 registers of the ATmega328P, the 16-bit
//! timer behind Arduino Uno pins 9 (`OC1A`, `PB1`) and 10 (`OC1B`, `PB2`).
//! It keeps the register contents as plain fields so tests can check what a
//! real chip would have been programmed with.
//!
//! On top of the registers it counts interrupt-free sections and configuration
//! writes which happened while interrupts were enabled.

use crate::port::{Channel, HardwarePort, Mode};
use crate::prescaler::DividerTable;

/// `TCCR1A` bit: clear `OC1A` on compare match
pub const COM1A1: u8 = 7;
/// `TCCR1A` bit: clear `OC1B` on compare match
pub const COM1B1: u8 = 5;
/// `TCCR1A` waveform generation bit 1
pub const WGM11: u8 = 1;
/// `TCCR1A` waveform generation bit 0
pub const WGM10: u8 = 0;
/// `TCCR1B` waveform generation bit 3
pub const WGM13: u8 = 4;
/// `TCCR1B` waveform generation bit 2
pub const WGM12: u8 = 3;
/// `TCCR1B` clock select bit 2
pub const CS12: u8 = 2;
/// `TCCR1B` clock select bit 1
pub const CS11: u8 = 1;
/// `TCCR1B` clock select bit 0
pub const CS10: u8 = 0;

/// `TCCR1B` clock select field
pub const CS_MASK: u8 = (1 << CS12) | (1 << CS11) | (1 << CS10);

/// `DDRB` bit of pin 9
pub const DDB1: u8 = 1;
/// `DDRB` bit of pin 10
pub const DDB2: u8 = 2;

/// Clock-select bits for `divider`, `None` if `CS12:0` cannot express it.
pub const fn clock_select_bits(divider: u16) -> Option<u8> {
    match divider {
        1 => Some(1 << CS10),
        8 => Some(1 << CS11),
        64 => Some((1 << CS11) | (1 << CS10)),
        256 => Some(1 << CS12),
        1024 => Some((1 << CS12) | (1 << CS10)),
        _ => None,
    }
}

/// Timer1 register file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Registers {
    /// Timer/Counter1 control register A
    pub tccr1a: u8,
    /// Timer/Counter1 control register B
    pub tccr1b: u8,
    /// Timer/Counter1
    pub tcnt1: u16,
    /// Input capture register 1, the top in mode 14
    pub icr1: u16,
    /// Output compare register 1 A
    pub ocr1a: u16,
    /// Output compare register 1 B
    pub ocr1b: u16,
    /// Port B data direction register
    pub ddrb: u8,
}

impl Registers {
    /// Waveform generation mode, `WGM13:0`
    pub fn waveform_mode(&self) -> u8 {
        let low = self.tccr1a & ((1 << WGM11) | (1 << WGM10));
        let high = (self.tccr1b >> WGM12) & 0b11;
        (high << 2) | low
    }

    /// Divider selected by `CS12:0`, `None` while the clock is stopped
    pub fn divider(&self) -> Option<u16> {
        match self.tccr1b & CS_MASK {
            0b001 => Some(1),
            0b010 => Some(8),
            0b011 => Some(64),
            0b100 => Some(256),
            0b101 => Some(1024),
            _ => None,
        }
    }
}

/// [`HardwarePort`] backed by a simulated ATmega328P Timer1.
#[derive(Debug, Clone)]
pub struct SimulatedPort {
    /// Register contents
    pub registers: Registers,
    interrupts_enabled: bool,
    critical_sections: u32,
    unmasked_writes: u32,
}

impl SimulatedPort {
    /// A timer in its reset state with interrupts enabled.
    pub fn new() -> Self {
        SimulatedPort {
            registers: Registers::default(),
            interrupts_enabled: true,
            critical_sections: 0,
            unmasked_writes: 0,
        }
    }

    /// Whether interrupts are currently enabled
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    /// Number of interrupt-free sections entered so far
    pub fn critical_sections(&self) -> u32 {
        self.critical_sections
    }

    /// Number of configuration writes made with interrupts enabled
    pub fn unmasked_writes(&self) -> u32 {
        self.unmasked_writes
    }

    fn configuration_write(&mut self) {
        if self.interrupts_enabled {
            self.unmasked_writes += 1;
        }
    }
}

impl Default for SimulatedPort {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwarePort for SimulatedPort {
    const DIVIDERS: DividerTable = DividerTable::ATMEGA328P;

    fn reset_counter(&mut self) {
        self.configuration_write();
        self.registers.tccr1a = 0;
        self.registers.tccr1b = 0;
        self.registers.tcnt1 = 0;
    }

    fn set_mode(&mut self, mode: Mode) {
        self.configuration_write();
        match mode {
            // Mode 14, ICR1 as top, both outputs non-inverting
            Mode::FastPwm => {
                self.registers.tccr1a = (1 << COM1A1) | (1 << COM1B1) | (1 << WGM11);
                self.registers.tccr1b = (1 << WGM13) | (1 << WGM12);
            }
        }
    }

    fn set_boundary(&mut self, top: u16) {
        self.configuration_write();
        self.registers.icr1 = top;
    }

    fn set_clock_select(&mut self, divider: u16) {
        self.configuration_write();
        self.registers.tccr1b &= !CS_MASK;
        // An unsupported divider leaves the clock stopped
        if let Some(bits) = clock_select_bits(divider) {
            self.registers.tccr1b |= bits;
        }
    }

    fn set_compare(&mut self, channel: Channel, value: u16) {
        match channel {
            Channel::A => self.registers.ocr1a = value,
            Channel::B => self.registers.ocr1b = value,
        }
    }

    fn compare(&self, channel: Channel) -> u16 {
        match channel {
            Channel::A => self.registers.ocr1a,
            Channel::B => self.registers.ocr1b,
        }
    }

    fn configure_outputs(&mut self) {
        self.configuration_write();
        self.registers.ddrb |= (1 << DDB1) | (1 << DDB2);
    }

    fn set_output_enabled(&mut self, channel: Channel, enabled: bool) {
        let bit = match channel {
            Channel::A => 1 << COM1A1,
            Channel::B => 1 << COM1B1,
        };
        if enabled {
            self.registers.tccr1a |= bit;
        } else {
            self.registers.tccr1a &= !bit;
        }
    }

    fn interrupt_free<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.critical_sections += 1;
        let previous = core::mem::replace(&mut self.interrupts_enabled, false);
        let r = f(self);
        self.interrupts_enabled = previous;
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_select_covers_the_reference_table() {
        let mut port = SimulatedPort::new();
        for divider in DividerTable::ATMEGA328P.iter() {
            port.set_clock_select(divider);
            assert_eq!(port.registers.divider(), Some(divider));
        }
    }

    #[test]
    fn unsupported_divider_stops_the_clock() {
        let mut port = SimulatedPort::new();
        port.set_clock_select(64);
        port.set_clock_select(128);
        assert_eq!(port.registers.divider(), None);
        assert_eq!(clock_select_bits(2), None);
    }

    #[test]
    fn fast_pwm_is_mode_14() {
        let mut port = SimulatedPort::new();
        port.set_mode(Mode::FastPwm);
        assert_eq!(port.registers.waveform_mode(), 14);
    }

    #[test]
    fn interrupt_free_restores_previous_state() {
        let mut port = SimulatedPort::new();
        let inside = port.interrupt_free(|port| {
            port.set_boundary(100);
            port.interrupts_enabled()
        });
        assert!(!inside);
        assert!(port.interrupts_enabled());
        assert_eq!(port.critical_sections(), 1);
        assert_eq!(port.unmasked_writes(), 0);

        port.set_boundary(200);
        assert_eq!(port.unmasked_writes(), 1);
    }

    #[test]
    fn nested_sections_keep_interrupts_masked() {
        let mut port = SimulatedPort::new();
        port.interrupt_free(|port| {
            port.interrupt_free(|_| ());
            assert!(!port.interrupts_enabled());
        });
        assert!(port.interrupts_enabled());
        assert_eq!(port.critical_sections(), 2);
    }
}

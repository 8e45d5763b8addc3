//! Time units

/// Hertz
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hertz(pub u32);

/// KiloHertz
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KiloHertz(pub u32);

/// MegaHertz
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MegaHertz(pub u32);

/// Microseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MicroSeconds(pub u32);

/// Milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MilliSeconds(pub u32);

/// Extension trait that adds convenience methods to the `u32` type
pub trait U32Ext {
    /// Wrap in `Hertz`
    fn hz(self) -> Hertz;

    /// Wrap in `KiloHertz`
    fn khz(self) -> KiloHertz;

    /// Wrap in `MegaHertz`
    fn mhz(self) -> MegaHertz;

    /// Wrap in `MicroSeconds`
    fn us(self) -> MicroSeconds;

    /// Wrap in `MilliSeconds`
    fn ms(self) -> MilliSeconds;
}

impl U32Ext for u32 {
    fn hz(self) -> Hertz {
        Hertz(self)
    }

    fn khz(self) -> KiloHertz {
        KiloHertz(self)
    }

    fn mhz(self) -> MegaHertz {
        MegaHertz(self)
    }

    fn us(self) -> MicroSeconds {
        MicroSeconds(self)
    }

    fn ms(self) -> MilliSeconds {
        MilliSeconds(self)
    }
}

// The conversions below saturate at `u32::MAX`

impl From<KiloHertz> for Hertz {
    fn from(val: KiloHertz) -> Self {
        Self(val.0.saturating_mul(1_000))
    }
}

impl From<MegaHertz> for Hertz {
    fn from(val: MegaHertz) -> Self {
        Self(val.0.saturating_mul(1_000_000))
    }
}

impl From<MegaHertz> for KiloHertz {
    fn from(val: MegaHertz) -> Self {
        Self(val.0.saturating_mul(1_000))
    }
}

/// Saturates at `u32::MAX` microseconds, which no divider table can represent,
/// so an overlong period is rejected by the solver instead of wrapping around.
impl From<MilliSeconds> for MicroSeconds {
    fn from(val: MilliSeconds) -> Self {
        Self(val.0.saturating_mul(1_000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_units_scale_to_hertz() {
        assert_eq!(Hertz::from(16.mhz()), Hertz(16_000_000));
        assert_eq!(Hertz::from(250.khz()), Hertz(250_000));
        assert_eq!(KiloHertz::from(8.mhz()), KiloHertz(8_000));
    }

    #[test]
    fn frequencies_saturate_instead_of_overflowing() {
        assert_eq!(Hertz::from(4_295.mhz()), Hertz(u32::MAX));
        assert_eq!(Hertz::from(4_294_968.khz()), Hertz(u32::MAX));
        assert_eq!(KiloHertz::from(u32::MAX.mhz()), KiloHertz(u32::MAX));
        assert_eq!(Hertz::from(4_294.mhz()), Hertz(4_294_000_000));
    }

    #[test]
    fn milliseconds_saturate_instead_of_wrapping() {
        assert_eq!(MicroSeconds::from(20.ms()), 20_000.us());
        assert_eq!(MicroSeconds::from(u32::MAX.ms()), MicroSeconds(u32::MAX));
    }
}

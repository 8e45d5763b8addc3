//! Clock divider tables
//!
//! A timer's clock-select field only supports a handful of division ratios.
//! [`DividerTable`] holds them in ascending order, so the period solver can
//! try the finest time resolution first.

/// An ascending, non-empty list of non-zero clock dividers.
///
/// Tables are meant to be built in a `const`, where an invalid table fails the
/// build:
///
/// ```compile_fail
/// # use timer16_pwm::prescaler::DividerTable;
/// const BROKEN: DividerTable = DividerTable::new(&[8, 1]);
/// # let _ = BROKEN.len();
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DividerTable(&'static [u16]);

impl DividerTable {
    /// The five ratios of the ATmega328P Timer1 clock-select bits `CS12:0`.
    pub const ATMEGA328P: DividerTable = DividerTable::new(&[1, 8, 64, 256, 1024]);

    /// Checks and wraps `dividers`.
    ///
    /// # Panics
    ///
    /// If the table is empty, contains a zero or is not strictly ascending.
    /// Evaluated in a `const` this is a compile error.
    pub const fn new(dividers: &'static [u16]) -> Self {
        assert!(!dividers.is_empty(), "divider table is empty");
        assert!(dividers[0] != 0, "divider table contains zero");

        let mut i = 1;
        while i < dividers.len() {
            assert!(
                dividers[i - 1] < dividers[i],
                "divider table is not strictly ascending"
            );
            i += 1;
        }

        DividerTable(dividers)
    }

    /// The dividers, smallest first
    pub const fn as_slice(&self) -> &'static [u16] {
        self.0
    }

    /// Number of dividers in the table
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`, tables are never empty.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The finest divider
    pub const fn smallest(&self) -> u16 {
        self.0[0]
    }

    /// The coarsest divider, which bounds the longest representable period
    pub const fn largest(&self) -> u16 {
        self.0[self.0.len() - 1]
    }

    /// Returns `true` if the clock-select field supports `divider`.
    pub fn contains(&self, divider: u16) -> bool {
        self.0.contains(&divider)
    }

    /// Iterate the dividers, smallest first
    pub fn iter(&self) -> impl Iterator<Item = u16> + 'static {
        self.0.iter().copied()
    }
}

impl Default for DividerTable {
    fn default() -> Self {
        DividerTable::ATMEGA328P
    }
}

//! Elapsed time as four decimal digit fields
//!
//! The value is held as explicit fields but keeps a packed 16-bit view, four
//! bits per field, because the display extracts digits by mask and shift and
//! the terminal check compares packed bit patterns:
//!
//! | bits  | field          |
//! |-------|----------------|
//! | 0-3   | hundredths     |
//! | 4-7   | tenths         |
//! | 8-11  | seconds        |
//! | 12-15 | tens of seconds|
//!
//! Each field is four bits wide, so it may transiently hold 10..=15 between a
//! carry-producing increment and the mask that settles it.

use core::fmt;

/// One of the four packed digit fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Hundredths,
    Tenths,
    Seconds,
    TensOfSeconds,
}

impl Field {
    /// Fields in packed order, least significant first
    pub const ALL: [Field; 4] = [
        Field::Hundredths,
        Field::Tenths,
        Field::Seconds,
        Field::TensOfSeconds,
    ];

    pub const fn shift(self) -> u32 {
        match self {
            Field::Hundredths => 0,
            Field::Tenths => 4,
            Field::Seconds => 8,
            Field::TensOfSeconds => 12,
        }
    }

    pub const fn mask(self) -> u16 {
        0x000F << self.shift()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElapsedValue {
    pub hundredths: u8,
    pub tenths: u8,
    pub seconds: u8,
    pub tens_of_seconds: u8,
}

impl ElapsedValue {
    pub const ZERO: Self = Self::from_packed(0x0000);

    /// "99:90": the counter halts here
    pub const TERMINAL: Self = Self::from_packed(0x9990);

    pub const fn from_packed(packed: u16) -> Self {
        Self {
            hundredths: (packed & 0x000F) as u8,
            tenths: ((packed >> 4) & 0x000F) as u8,
            seconds: ((packed >> 8) & 0x000F) as u8,
            tens_of_seconds: ((packed >> 12) & 0x000F) as u8,
        }
    }

    pub const fn packed(&self) -> u16 {
        (self.hundredths as u16 & 0x0F)
            | ((self.tenths as u16 & 0x0F) << 4)
            | ((self.seconds as u16 & 0x0F) << 8)
            | ((self.tens_of_seconds as u16 & 0x0F) << 12)
    }

    /// Field value as stored, which may exceed 9
    pub const fn field(&self, field: Field) -> u8 {
        match field {
            Field::Hundredths => self.hundredths,
            Field::Tenths => self.tenths,
            Field::Seconds => self.seconds,
            Field::TensOfSeconds => self.tens_of_seconds,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.packed() == Self::TERMINAL.packed()
    }

    /// Total time in hundredths of a second, if every field holds a decimal digit
    pub fn as_hundredths(&self) -> Option<u32> {
        let mut total = 0u32;
        for field in Field::ALL.iter().rev() {
            let digit = self.field(*field);
            if digit > 9 {
                return None;
            }
            total = total * 10 + digit as u32;
        }
        Some(total)
    }
}

impl fmt::Display for ElapsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:X}{:X}:{:X}{:X}",
            self.tens_of_seconds & 0x0F,
            self.seconds & 0x0F,
            self.tenths & 0x0F,
            self.hundredths & 0x0F
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layout() {
        let value = ElapsedValue {
            hundredths: 1,
            tenths: 2,
            seconds: 3,
            tens_of_seconds: 4,
        };
        assert_eq!(value.packed(), 0x4321);
        assert_eq!(ElapsedValue::from_packed(0x4321), value);
    }

    #[test]
    fn field_masks() {
        assert_eq!(Field::Hundredths.mask(), 0x000F);
        assert_eq!(Field::Tenths.mask(), 0x00F0);
        assert_eq!(Field::Seconds.mask(), 0x0F00);
        assert_eq!(Field::TensOfSeconds.mask(), 0xF000);
    }

    #[test]
    fn terminal_is_99_90() {
        assert_eq!(ElapsedValue::TERMINAL.packed(), 0x9990);
        assert!(ElapsedValue::TERMINAL.is_terminal());
        assert!(!ElapsedValue::ZERO.is_terminal());
        assert_eq!(ElapsedValue::TERMINAL.to_string(), "99:90");
    }

    #[test]
    fn display_shows_artifact_nibbles() {
        assert_eq!(ElapsedValue::from_packed(0xA0B0).to_string(), "A0:B0");
    }

    #[test]
    fn hundredths_total() {
        assert_eq!(ElapsedValue::from_packed(0x1230).as_hundredths(), Some(1230));
        assert_eq!(ElapsedValue::TERMINAL.as_hundredths(), Some(9990));
        assert_eq!(ElapsedValue::from_packed(0x00A0).as_hundredths(), None);
    }
}

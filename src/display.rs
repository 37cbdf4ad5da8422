use crate::bus::DisplayBus;
use crate::elapsed::{ElapsedValue, Field};
use crate::segments::{self, COLON_PATTERN};

/// Digit-select output with every line deasserted
pub const DIGITS_OFF: u8 = 0xFF;

pub const DIG_3: u8 = 0x01;
pub const DIG_2: u8 = 0x02;
pub const DIG_1: u8 = 0x04;
pub const DIG_0: u8 = 0x08;
pub const COLON: u8 = 0x10;

/// Active-low digit-select pattern for each cursor position
pub const DIGIT_SELECT: [u8; 5] = [!DIG_0, !DIG_1, !DIG_2, !DIG_3, !COLON];

/// Display positions in refresh order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    /// Rightmost digit, hundredths
    Digit0,
    Digit1,
    Digit2,
    /// Leftmost digit, tens of seconds
    Digit3,
    Colon,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Digit0,
        Position::Digit1,
        Position::Digit2,
        Position::Digit3,
        Position::Colon,
    ];

    pub const fn index(self) -> u8 {
        match self {
            Position::Digit0 => 0,
            Position::Digit1 => 1,
            Position::Digit2 => 2,
            Position::Digit3 => 3,
            Position::Colon => 4,
        }
    }

    pub const fn select_pattern(self) -> u8 {
        DIGIT_SELECT[self.index() as usize]
    }

    /// Packed field shown at this position, `None` for the colon
    pub const fn field(self) -> Option<Field> {
        match self {
            Position::Digit0 => Some(Field::Hundredths),
            Position::Digit1 => Some(Field::Tenths),
            Position::Digit2 => Some(Field::Seconds),
            Position::Digit3 => Some(Field::TensOfSeconds),
            Position::Colon => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidPosition(pub u8);

impl TryFrom<u8> for Position {
    type Error = InvalidPosition;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Position::ALL
            .get(index as usize)
            .copied()
            .ok_or(InvalidPosition(index))
    }
}

/// Masked high-field patterns that are forced to a fixed glyph
const DIGIT3_SENTINELS: [(u16, u8); 3] = [(0x8000, 8), (0x9000, 9), (0xFFFF, 9)];

/// Segment pattern for the leftmost digit.
///
/// The masked field is first compared against the sentinel patterns for
/// "8" and "9"; only when none matches is it shifted down and encoded.
pub fn decode_digit3(packed: u16) -> u8 {
    let masked = packed & Field::TensOfSeconds.mask();
    for (sentinel, digit) in DIGIT3_SENTINELS {
        if masked == sentinel {
            return segments::encode(digit);
        }
    }
    segments::encode((masked >> Field::TensOfSeconds.shift()) as u8)
}

/// Segment pattern written while `position` is selected
pub fn segment_pattern(position: Position, value: &ElapsedValue) -> u8 {
    let packed = value.packed();
    match position.field() {
        Some(Field::TensOfSeconds) => decode_digit3(packed),
        Some(field) => segments::encode(((packed & field.mask()) >> field.shift()) as u8),
        None => COLON_PATTERN,
    }
}

/// Digit multiplexer: one display position per call
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Multiplexer {
    cursor: u8,
}

impl Multiplexer {
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// Force the cursor. Out-of-range values are accepted and clamped on
    /// the next `advance`.
    pub fn set_cursor(&mut self, cursor: u8) {
        self.cursor = cursor;
    }

    /// Draws the position under the cursor and moves to the next one.
    ///
    /// All digit lines are released before the segment bus changes so the
    /// new pattern never shows on the previous digit. A cursor outside
    /// 0..=4 is put back to 0 and nothing is drawn, so after the colon one
    /// call is spent on the wrap and a full cycle takes six calls.
    pub fn advance<B: DisplayBus>(
        &mut self,
        value: &ElapsedValue,
        bus: &mut B,
    ) -> Option<Position> {
        let position = match Position::try_from(self.cursor) {
            Ok(position) => position,
            Err(_) => {
                self.cursor = 0;
                return None;
            }
        };

        bus.write_digit_select(DIGITS_OFF);
        bus.write_segments(segment_pattern(position, value));
        bus.write_digit_select(position.select_pattern());

        self.cursor += 1;
        Some(position)
    }
}

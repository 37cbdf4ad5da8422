//! 7-segment encoding for the display board
//!
//! Segment lines are active-low: a set bit turns the segment off.
//! Bit 0 drives segment A, bit 6 segment G, bit 7 the decimal point.

pub const SEG_A: u8 = 0x01;
pub const SEG_B: u8 = 0x02;
pub const SEG_C: u8 = 0x04;
pub const SEG_D: u8 = 0x08;
pub const SEG_E: u8 = 0x10;
pub const SEG_F: u8 = 0x20;
pub const SEG_G: u8 = 0x40;
pub const SEG_DP: u8 = 0x80;

/// All segments off
pub const BLANK: u8 = 0xFF;

/// Pattern written while the colon/separator line is selected (segments A and B lit)
pub const COLON_PATTERN: u8 = !(SEG_A | SEG_B);

/// Lit segments for each decimal digit, active-high
const LIT: [u8; 10] = [
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,         // 0
    SEG_B | SEG_C,                                         // 1
    SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,                 // 2
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,                 // 3
    SEG_B | SEG_C | SEG_F | SEG_G,                         // 4
    SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,                 // 5
    SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,         // 6
    SEG_A | SEG_B | SEG_C,                                 // 7
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G, // 8
    SEG_A | SEG_B | SEG_C | SEG_F | SEG_G,                 // 9
];

/// Active-low segment patterns indexed by digit value
pub const SEGMENT_PATTERNS: [u8; 10] = [
    !LIT[0],
    !LIT[1],
    !LIT[2],
    !LIT[3],
    !LIT[4],
    !LIT[5],
    !LIT[6],
    !LIT[7],
    !LIT[8],
    !LIT[9],
];

/// Segment pattern for a decimal digit.
///
/// Values above 9 have no glyph and come back as [`BLANK`].
#[inline]
pub fn encode(digit: u8) -> u8 {
    SEGMENT_PATTERNS
        .get(digit as usize)
        .copied()
        .unwrap_or(BLANK)
}

//! TM1651 command bytes and segment patterns.
//!
//! The chip understands three command classes, distinguished by their top
//! two bits:
//! - `0b01xx_xxxx` data command (addressing mode)
//! - `0b10xx_xxxx` display control (on/off + brightness)
//! - `0b11xx_xxxx` address command (target display register)

// ---------------------------------------------------------------------------
// Data commands
// ---------------------------------------------------------------------------

/// Write to display registers with automatic address increment.
pub const ADDR_AUTO_INCREMENT: u8 = 0x40;

/// Write to a single, fixed display register.
pub const ADDR_FIXED: u8 = 0x44;

// ---------------------------------------------------------------------------
// Address commands
// ---------------------------------------------------------------------------

/// Display register holding the level bar (GRID1).
pub const ADDR_LEVEL: u8 = 0xC0;

/// First display register of the overlay (GRID2). The overlay spans
/// [`FRAME_REGISTERS`] consecutive registers from here.
pub const ADDR_FRAME_START: u8 = 0xC1;

/// Number of overlay registers written by one frame transaction.
pub const FRAME_REGISTERS: usize = 3;

// ---------------------------------------------------------------------------
// Display control
// ---------------------------------------------------------------------------

/// Display control base with the display switched off.
/// OR'd with a hardware brightness code.
pub const DISPLAY_OFF: u8 = 0x80;

/// Display control base with the display switched on.
/// OR'd with a hardware brightness code.
pub const DISPLAY_ON: u8 = 0x88;

/// Mask for the 3-bit hardware brightness field of the display control byte.
pub const BRIGHTNESS_MASK: u8 = 0x07;

/// Hardware brightness code: lowest pulse width.
pub const BRIGHTNESS_DARKEST: u8 = 0;

/// Hardware brightness code used after power-up.
pub const BRIGHTNESS_TYPICAL: u8 = 2;

/// Hardware brightness code: highest pulse width.
pub const BRIGHTNESS_BRIGHTEST: u8 = 7;

// ---------------------------------------------------------------------------
// Segment patterns
// ---------------------------------------------------------------------------

/// Highest level the bar register can show (SEG1..SEG7).
pub const MAX_LEVEL: u8 = 7;

/// Bar pattern for each level: level `n` lights the lowest `n` segments.
pub const LEVEL_PATTERNS: [u8; MAX_LEVEL as usize + 1] = [
    0b0000_0000,
    0b0000_0001,
    0b0000_0011,
    0b0000_0111,
    0b0000_1111,
    0b0001_1111,
    0b0011_1111,
    0b0111_1111,
];

/// Overlay pattern written to every frame register while blinking is on.
pub const FRAME_SEGMENTS: u8 = 0b0111_1111;

/// Look up the bar pattern for `level`, saturating at [`MAX_LEVEL`].
pub fn level_pattern(level: u8) -> u8 {
    LEVEL_PATTERNS[level.min(MAX_LEVEL) as usize]
}

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Default full bus cycle in microseconds.
///
/// The TM1651 tops out at 500 kHz (2 µs per cycle); 8 µs leaves headroom
/// for long leads and weak pull-ups.
pub const DEFAULT_CLOCK_CYCLE_US: u32 = 8;

/// Default number of acknowledgment samples before a byte counts as lost.
pub const DEFAULT_ACK_SAMPLES: u16 = 200;

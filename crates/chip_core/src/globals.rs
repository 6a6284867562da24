pub const RAM_SIZE: usize = 4096;
pub const STACK_SIZE: usize = 16;
pub const REG_COUNT: usize = 16;
pub const KEY_COUNT: usize = 16;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const SCREEN_BUFFER_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// A lit cell; unlit cells are all-zero. No intermediate values exist.
pub const PIXEL_ON: u32 = 0xFFFF_FFFF;

pub const FONT_ADDR: u16 = 0x050;
pub const GLYPH_SIZE: u16 = 5;
pub const START_ADDR: u16 = 0x200;

/// Program-visible addresses are 12 bits wide.
pub const ADDR_MASK: u16 = 0x0FFF;

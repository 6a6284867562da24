use crate::globals::{
    RAM_SIZE, REG_COUNT, STACK_SIZE, KEY_COUNT, SCREEN_BUFFER_SIZE
};

/// A full, aliasing-free copy of interpreter state.
///
/// Holds everything `Cpu::restore` needs to rebuild the machine:
/// memory, video cells, registers, stack, keypad and timers. The RNG
/// and the dispatch logic are not state and are not captured.
#[derive(Clone)]
pub struct Snapshot {
    pub(crate) memory: [u8; RAM_SIZE],
    pub(crate) video: [u32; SCREEN_BUFFER_SIZE],
    pub(crate) v: [u8; REG_COUNT],
    pub(crate) stack: [u16; STACK_SIZE],
    pub(crate) keypad: [bool; KEY_COUNT],
    pub(crate) pc: u16,
    pub(crate) i: u16,
    pub(crate) sp: usize,
    pub(crate) opcode: u16,
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    display::Display,
    errors::ChipError,
    font::FONT_SET,
    globals::{
        RAM_SIZE, STACK_SIZE, REG_COUNT, KEY_COUNT,
        FONT_ADDR, GLYPH_SIZE, START_ADDR, ADDR_MASK
    },
    snapshot::Snapshot,
    utils::{nibbles, u8_from_two, u16_from_two, u16_from_three}
};

/// What happens when a program-derived address leaves the 12-bit space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// Report `AddressOutOfRange` and halt the current step.
    #[default]
    Strict,
    /// Mask addresses to 12 bits, matching flat-wraparound hardware.
    Permissive,
}

pub struct Cpu {
    memory: [u8; RAM_SIZE],
    display: Display,
    v: [u8; REG_COUNT],
    pc: u16,
    i: u16,
    sp: usize,
    stack: [u16; STACK_SIZE],
    keypad: [bool; KEY_COUNT],
    delay_timer: u8,
    sound_timer: u8,
    opcode: u16,
    bounds: BoundsPolicy,
    rng: StdRng,
    redraw: bool
}
impl Cpu {
    pub fn new() -> Self {
        Self::with_policy(BoundsPolicy::default())
    }
    pub fn with_policy(bounds: BoundsPolicy) -> Self {
        let mut cpu = Cpu {
            memory: [0; RAM_SIZE],
            display: Display::new(),
            v: [0; REG_COUNT],
            pc: START_ADDR,
            i: 0,
            sp: 0,
            stack: [0; STACK_SIZE],
            keypad: [false; KEY_COUNT],
            delay_timer: 0,
            sound_timer: 0,
            opcode: 0,
            bounds,
            rng: StdRng::seed_from_u64(time_seed()),
            redraw: false
        };
        cpu.write_font();
        cpu
    }
    /// Back to boot state: everything zeroed, glyphs rewritten, PC at
    /// the load origin, RNG reseeded.
    pub fn reset(&mut self) {
        self.memory = [0; RAM_SIZE];
        self.display.clear();
        self.v = [0; REG_COUNT];
        self.pc = START_ADDR;
        self.i = 0;
        self.sp = 0;
        self.stack = [0; STACK_SIZE];
        self.keypad = [false; KEY_COUNT];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.opcode = 0;
        self.rng = StdRng::seed_from_u64(time_seed());
        self.redraw = true;
        self.write_font();
    }
    /// Resets the machine and copies the ROM image in at 0x200.
    pub fn load_rom(&mut self, data: &[u8]) -> Result<(), ChipError> {
        if data.len() > RAM_SIZE - START_ADDR as usize {
            return Err(ChipError::ProgramTooLarge(data.len()));
        }
        self.reset();
        let start = START_ADDR as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
        log::debug!("loaded {} byte rom at {:#05x}", data.len(), START_ADDR);
        Ok(())
    }
    fn write_font(&mut self) {
        let start = FONT_ADDR as usize;
        self.memory[start..start + FONT_SET.len()].copy_from_slice(&FONT_SET);
    }

    // External interfaces (§ input, display, audio, debug)

    pub fn set_key(&mut self, key: usize, pressed: bool) {
        if key < KEY_COUNT {
            self.keypad[key] = pressed;
        }
    }
    pub fn get_display_buffer(&self) -> &[u32; crate::globals::SCREEN_BUFFER_SIZE] {
        self.display.get_buffer()
    }
    /// Checks and clears the redraw flag
    pub fn take_redraw(&mut self) -> bool {
        if self.redraw {
            self.redraw = false;
            return true;
        }
        false
    }
    pub fn should_beep(&self) -> bool {
        self.sound_timer > 0
    }
    pub fn pc(&self) -> u16 { self.pc }
    pub fn index(&self) -> u16 { self.i }
    pub fn opcode(&self) -> u16 { self.opcode }
    pub fn registers(&self) -> &[u8; REG_COUNT] { &self.v }
    pub fn stack(&self) -> &[u16; STACK_SIZE] { &self.stack }
    pub fn stack_pointer(&self) -> usize { self.sp }
    pub fn delay_timer(&self) -> u8 { self.delay_timer }
    pub fn sound_timer(&self) -> u8 { self.sound_timer }

    /// One timer tick; runs on its own cadence, not per instruction.
    /// Both timers saturate at zero.
    pub fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    /// Captures all interpreter state into an independent value.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            memory: self.memory,
            video: *self.display.get_buffer(),
            v: self.v,
            stack: self.stack,
            keypad: self.keypad,
            pc: self.pc,
            i: self.i,
            sp: self.sp,
            opcode: self.opcode,
            delay_timer: self.delay_timer,
            sound_timer: self.sound_timer,
        }
    }
    /// Overwrites live state from a snapshot and flags a redraw.
    pub fn restore(&mut self, snap: &Snapshot) {
        self.memory = snap.memory;
        self.display.load(&snap.video);
        self.v = snap.v;
        self.stack = snap.stack;
        self.keypad = snap.keypad;
        self.pc = snap.pc;
        self.i = snap.i;
        self.sp = snap.sp;
        self.opcode = snap.opcode;
        self.delay_timer = snap.delay_timer;
        self.sound_timer = snap.sound_timer;
        self.redraw = true;
    }

    /// One fetch-decode-execute cycle. The PC is already past the
    /// instruction when the body runs, so jumps overwrite it and calls
    /// push the post-increment address.
    pub fn step(&mut self) -> Result<(), ChipError> {
        let op = self.read_word(self.pc)?;
        self.opcode = op;
        self.pc = self.pc.wrapping_add(2);
        self.execute(op)
    }

    fn execute(&mut self, op: u16) -> Result<(), ChipError> {
        match nibbles(op) {
            (0x0, 0x0, 0xE, 0x0) => {
                self.display.clear();
                self.redraw = true;
            },
            (0x0, 0x0, 0xE, 0xE) => self.pc = self.pop_stack()?,
            // machine subroutine -> ignored
            (0x0, _, _, _) => (),
            (0x1, n0, n1, n2) => self.pc = u16_from_three(n0, n1, n2),
            (0x2, n0, n1, n2) => {
                self.push_stack(self.pc)?;
                self.pc = u16_from_three(n0, n1, n2);
            },
            (0x3, x, n0, n1) => {
                if self.v[x as usize] == u8_from_two(n0, n1) {
                    self.skip();
                }
            },
            (0x4, x, n0, n1) => {
                if self.v[x as usize] != u8_from_two(n0, n1) {
                    self.skip();
                }
            },
            (0x5, x, y, 0x0) => {
                if self.v[x as usize] == self.v[y as usize] {
                    self.skip();
                }
            },
            (0x6, x, n0, n1) => self.v[x as usize] = u8_from_two(n0, n1),
            (0x7, x, n0, n1) => {
                // no carry flag on the immediate form
                let val = self.v[x as usize].wrapping_add(u8_from_two(n0, n1));
                self.v[x as usize] = val;
            },
            (0x8, x, y, sel) => self.exec_alu(x as usize, y as usize, sel),
            (0x9, x, y, 0x0) => {
                if self.v[x as usize] != self.v[y as usize] {
                    self.skip();
                }
            },
            (0xA, n0, n1, n2) => self.i = u16_from_three(n0, n1, n2),
            (0xB, n0, n1, n2) => {
                self.pc = self.v[0] as u16 + u16_from_three(n0, n1, n2);
            },
            (0xC, x, n0, n1) => {
                let byte: u8 = self.rng.gen();
                self.v[x as usize] = byte & u8_from_two(n0, n1);
            },
            (0xD, x, y, n) => self.exec_draw(x as usize, y as usize, n as usize)?,
            (0xE, x, n0, n1) => self.exec_key(x as usize, u8_from_two(n0, n1)),
            (0xF, x, n0, n1) => self.exec_misc(x as usize, u8_from_two(n0, n1))?,
            _ => log::debug!("ignoring opcode {:#06x}", op),
        };
        Ok(())
    }

    /// 8xy_ family: register-register ALU ops, selected by the low
    /// nibble. The flag write always lands after the result write.
    fn exec_alu(&mut self, x: usize, y: usize, sel: u8) {
        match sel {
            0x0 => self.v[x] = self.v[y],
            0x1 => self.v[x] |= self.v[y],
            0x2 => self.v[x] &= self.v[y],
            0x3 => self.v[x] ^= self.v[y],
            0x4 => {
                let sum = self.v[x] as u16 + self.v[y] as u16;
                self.v[x] = sum as u8;
                self.v[0xF] = (sum > 0xFF) as u8;
            },
            0x5 => {
                // strict greater-than: equal operands report borrow
                let flag = (self.v[x] > self.v[y]) as u8;
                self.v[x] = self.v[x].wrapping_sub(self.v[y]);
                self.v[0xF] = flag;
            },
            0x6 => {
                let flag = self.v[x] & 0x1;
                self.v[x] >>= 1;
                self.v[0xF] = flag;
            },
            0x7 => {
                let flag = (self.v[y] > self.v[x]) as u8;
                self.v[x] = self.v[y].wrapping_sub(self.v[x]);
                self.v[0xF] = flag;
            },
            0xE => {
                let flag = self.v[x] >> 7;
                self.v[x] <<= 1;
                self.v[0xF] = flag;
            },
            _ => log::debug!("ignoring alu selector {:#x}", sel),
        }
    }

    fn exec_draw(&mut self, x: usize, y: usize, height: usize) -> Result<(), ChipError> {
        let mut rows = [0u8; 15];
        for (row, slot) in rows.iter_mut().enumerate().take(height) {
            *slot = self.read_byte(self.i.wrapping_add(row as u16))?;
        }
        let collision = self.display.blit_sprite(
            self.v[x] as usize,
            self.v[y] as usize,
            &rows[..height]
        );
        self.v[0xF] = collision as u8;
        self.redraw = true;
        Ok(())
    }

    /// Ex__ family: key-state skips.
    fn exec_key(&mut self, x: usize, sel: u8) {
        let key = self.v[x] as usize;
        match sel {
            0x9E => {
                if self.keypad.get(key) == Some(&true) {
                    self.skip();
                }
            },
            0xA1 => {
                if self.keypad.get(key) != Some(&true) {
                    self.skip();
                }
            },
            _ => log::debug!("ignoring key selector {:#04x}", sel),
        }
    }

    /// Fx__ family: timers, await-key, index ops, BCD, register blocks.
    fn exec_misc(&mut self, x: usize, sel: u8) -> Result<(), ChipError> {
        match sel {
            0x07 => self.v[x] = self.delay_timer,
            0x0A => {
                // busy-wait: no key means the PC rolls back and this
                // instruction runs again next cycle
                match self.keypad.iter().position(|&pressed| pressed) {
                    Some(key) => self.v[x] = key as u8,
                    None => self.pc = self.pc.wrapping_sub(2),
                }
            },
            0x15 => self.delay_timer = self.v[x],
            0x18 => self.sound_timer = self.v[x],
            0x1E => {
                // overflow test against the pre-addition values
                let flag = (self.i as u32 + self.v[x] as u32 > 0xFFF) as u8;
                self.i = self.i.wrapping_add(self.v[x] as u16);
                self.v[0xF] = flag;
            },
            0x29 => self.i = FONT_ADDR + GLYPH_SIZE * self.v[x] as u16,
            0x33 => {
                let value = self.v[x];
                self.write_byte(self.i, value / 100)?;
                self.write_byte(self.i.wrapping_add(1), value / 10 % 10)?;
                self.write_byte(self.i.wrapping_add(2), value % 10)?;
            },
            0x55 => {
                for reg in 0..=x {
                    self.write_byte(self.i.wrapping_add(reg as u16), self.v[reg])?;
                }
            },
            0x65 => {
                for reg in 0..=x {
                    self.v[reg] = self.read_byte(self.i.wrapping_add(reg as u16))?;
                }
            },
            _ => log::debug!("ignoring misc selector {:#04x}", sel),
        }
        Ok(())
    }

    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
    fn mem_index(&self, addr: u16) -> Result<usize, ChipError> {
        match self.bounds {
            BoundsPolicy::Strict if addr as usize >= RAM_SIZE => {
                Err(ChipError::AddressOutOfRange(addr))
            },
            BoundsPolicy::Strict => Ok(addr as usize),
            BoundsPolicy::Permissive => Ok((addr & ADDR_MASK) as usize),
        }
    }
    fn read_byte(&self, addr: u16) -> Result<u8, ChipError> {
        Ok(self.memory[self.mem_index(addr)?])
    }
    fn write_byte(&mut self, addr: u16, val: u8) -> Result<(), ChipError> {
        self.memory[self.mem_index(addr)?] = val;
        Ok(())
    }
    /// Big-endian word read, high byte first.
    fn read_word(&self, addr: u16) -> Result<u16, ChipError> {
        Ok(u16_from_two(
            self.read_byte(addr)?,
            self.read_byte(addr.wrapping_add(1))?
        ))
    }
    fn push_stack(&mut self, val: u16) -> Result<(), ChipError> {
        if self.sp >= STACK_SIZE {
            return Err(ChipError::StackOverflow);
        }
        self.stack[self.sp] = val;
        self.sp += 1;
        Ok(())
    }
    fn pop_stack(&mut self) -> Result<u16, ChipError> {
        if self.sp == 0 {
            return Err(ChipError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

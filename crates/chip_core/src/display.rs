use crate::globals::{SCREEN_WIDTH, SCREEN_HEIGHT, SCREEN_BUFFER_SIZE, PIXEL_ON};

/// Monochrome 64x32 cell grid. Cells are either `PIXEL_ON` or zero and
/// only the clear and draw instructions ever write to it.
#[derive(Clone)]
pub struct Display {
    buffer: [u32; SCREEN_BUFFER_SIZE]
}
impl Display {
    pub fn new() -> Self {
        Display {
            buffer: [0; SCREEN_BUFFER_SIZE]
        }
    }
    pub fn clear(&mut self) {
        self.buffer = [0; SCREEN_BUFFER_SIZE];
    }
    pub fn load(&mut self, data: &[u32; SCREEN_BUFFER_SIZE]) {
        self.buffer.copy_from_slice(data);
    }
    pub fn get_buffer(&self) -> &[u32; SCREEN_BUFFER_SIZE] {
        &self.buffer
    }
    /// XOR-composites an 8-wide sprite at (x, y) and returns whether any
    /// cell flipped from on to off.
    ///
    /// The origin wraps per axis; rows and columns running past the
    /// right or bottom edge are clipped rather than wrapped again.
    pub fn blit_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let x = x % SCREEN_WIDTH;
        let y = y % SCREEN_HEIGHT;
        let mut collision = false;
        for (row, &bits) in rows.iter().enumerate() {
            let py = y + row;
            if py >= SCREEN_HEIGHT { break }
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 { continue }
                let px = x + col;
                if px >= SCREEN_WIDTH { continue }
                let cell = &mut self.buffer[py * SCREEN_WIDTH + px];
                if *cell == PIXEL_ON {
                    collision = true;
                }
                *cell ^= PIXEL_ON;
            }
        }
        collision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn blit_single_row() {
        let mut display = Display::new();
        let collision = display.blit_sprite(8, 2, &[0b10101011]);
        assert!(!collision);
        let target = 8 + 2 * SCREEN_WIDTH;
        assert!(display.buffer[target - 1] == 0);
        assert!(display.buffer[target] == PIXEL_ON);
        assert!(display.buffer[target + 1] == 0);
        assert!(display.buffer[target + 2] == PIXEL_ON);
        assert!(display.buffer[target + 7] == PIXEL_ON);
        assert!(display.buffer[target + 8] == 0);
    }
    #[test]
    fn blit_multi_row() {
        let mut display = Display::new();
        let sprite = [0b11000000, 0b00000000, 0b10000000];
        let collision = display.blit_sprite(4, 1, &sprite);
        assert!(!collision);
        assert!(display.buffer[4 + SCREEN_WIDTH] == PIXEL_ON);
        assert!(display.buffer[5 + SCREEN_WIDTH] == PIXEL_ON);
        assert!(display.buffer[4 + 2 * SCREEN_WIDTH] == 0);
        assert!(display.buffer[4 + 3 * SCREEN_WIDTH] == PIXEL_ON);
    }
    #[test]
    fn blit_collision_toggles_off() {
        let mut display = Display::new();
        assert!(!display.blit_sprite(10, 5, &[0xFF]));
        let collision = display.blit_sprite(10, 5, &[0xFF]);
        assert!(collision);
        let target = 10 + 5 * SCREEN_WIDTH;
        for i in 0..8 {
            assert!(display.buffer[target + i] == 0);
        }
    }
    #[test]
    fn blit_partial_overlap_still_collides() {
        let mut display = Display::new();
        display.blit_sprite(0, 0, &[0b00000001]);
        let collision = display.blit_sprite(0, 0, &[0b11111111]);
        assert!(collision);
        assert!(display.buffer[7] == 0);
        assert!(display.buffer[0] == PIXEL_ON);
    }
    #[test]
    fn origin_wraps_per_axis() {
        let mut display = Display::new();
        let collision = display.blit_sprite(SCREEN_WIDTH + 3, SCREEN_HEIGHT + 2, &[0b10000000]);
        assert!(!collision);
        assert!(display.buffer[3 + 2 * SCREEN_WIDTH] == PIXEL_ON);
    }
    #[test]
    fn clips_at_right_edge() {
        let mut display = Display::new();
        display.blit_sprite(SCREEN_WIDTH - 2, 0, &[0xFF]);
        assert!(display.buffer[SCREEN_WIDTH - 2] == PIXEL_ON);
        assert!(display.buffer[SCREEN_WIDTH - 1] == PIXEL_ON);
        // nothing bleeds into the next row
        assert!(display.buffer[SCREEN_WIDTH] == 0);
        assert!(display.buffer[SCREEN_WIDTH + 5] == 0);
    }
    #[test]
    fn clips_at_bottom_edge() {
        let mut display = Display::new();
        display.blit_sprite(0, SCREEN_HEIGHT - 1, &[0x80, 0x80, 0x80]);
        assert!(display.buffer[(SCREEN_HEIGHT - 1) * SCREEN_WIDTH] == PIXEL_ON);
        // rows past the bottom are dropped, not wrapped to the top
        assert!(display.buffer[0] == 0);
        assert!(display.buffer[SCREEN_WIDTH] == 0);
    }
    #[test]
    fn clear_zeroes_everything() {
        let mut display = Display::new();
        display.blit_sprite(12, 12, &[0xFF, 0xFF]);
        display.clear();
        assert!(display.buffer.iter().all(|&c| c == 0));
    }
}

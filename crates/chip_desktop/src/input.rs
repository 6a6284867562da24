use minifb::{Key, Window};

use chip_core::Cpu;

/// Physical keys for the 16-slot logical matrix, laid out as the
/// classic 4x4 block:
///
/// 1 2 3 4        1 2 3 C
/// Q W E R   ->   4 5 6 D
/// A S D F        7 8 9 E
/// Z X C V        A 0 B F
const KEY_MAP: [(Key, usize); 16] = [
    (Key::Key1, 0x1), (Key::Key2, 0x2), (Key::Key3, 0x3), (Key::Key4, 0xC),
    (Key::Q, 0x4), (Key::W, 0x5), (Key::E, 0x6), (Key::R, 0xD),
    (Key::A, 0x7), (Key::S, 0x8), (Key::D, 0x9), (Key::F, 0xE),
    (Key::Z, 0xA), (Key::X, 0x0), (Key::C, 0xB), (Key::V, 0xF),
];

/// Pushes the current key states into the core before the next step.
pub fn update_keypad(window: &Window, cpu: &mut Cpu) {
    for (key, slot) in KEY_MAP {
        cpu.set_key(slot, window.is_key_down(key));
    }
}

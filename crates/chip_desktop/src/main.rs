use minifb::{Key, Window, WindowOptions};
use std::time::{Duration, Instant};

use chip_core::{
    Cpu, Snapshot,
    globals::{SCREEN_WIDTH, SCREEN_HEIGHT, PIXEL_ON}
};

mod audio;
mod input;

const SCALING: usize = 8;
const W: usize = SCALING * SCREEN_WIDTH;
const H: usize = SCALING * SCREEN_HEIGHT;

const FG_COLOR: u32 = 0x00_0DFF0D;
const BG_COLOR: u32 = 0x00_080808;

/// Timers decay at ~60Hz regardless of instruction throughput.
const TIMER_TICK: Duration = Duration::from_micros(16667);
/// Default instruction pacing; override with a second cli argument (us).
const DEFAULT_CYCLE_DELAY: Duration = Duration::from_micros(1440);

const SAVE_SLOTS: usize = 10;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: chip_desktop <rom> [cycle_delay_us]");
        std::process::exit(1);
    };
    let cycle_delay = args.next()
        .and_then(|a| a.parse().ok())
        .map(Duration::from_micros)
        .unwrap_or(DEFAULT_CYCLE_DELAY);

    let rom = match std::fs::read(&path) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("could not read {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let mut cpu = Cpu::new();
    if let Err(e) = cpu.load_rom(&rom) {
        eprintln!("could not load {}: {}", path, e);
        std::process::exit(1);
    }

    let mut window = Window::new(
            "CHIP-8",
            W,
            H,
            WindowOptions::default()
        )
        .unwrap();
    window.set_target_fps(60);

    let mut beeper = audio::Beeper::new();
    let mut slots: [Option<Snapshot>; SAVE_SLOTS] = Default::default();
    let mut slot = 0;

    let mut buffer = [0u32; W * H];
    let mut last_cycle = Instant::now();
    let mut last_tick = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        input::update_keypad(&window, &mut cpu);
        handle_save_keys(&window, &mut cpu, &mut slots, &mut slot);

        // two independent cadences: instructions at the configured
        // delay, timers at a fixed 60Hz
        while last_cycle.elapsed() >= cycle_delay {
            last_cycle += cycle_delay;
            if let Err(e) = cpu.step() {
                log::error!("halted at {:#06x}: {}", cpu.opcode(), e);
                log::error!("pc={:#05x} i={:#05x} sp={}", cpu.pc(), cpu.index(), cpu.stack_pointer());
                break;
            }
        }
        while last_tick.elapsed() >= TIMER_TICK {
            last_tick += TIMER_TICK;
            cpu.tick_timers();
        }

        beeper.update(cpu.should_beep());

        if cpu.take_redraw() {
            read_buffer(&mut buffer, &cpu);
        }
        let _ = window.update_with_buffer(&buffer, W, H);
    }
}

fn handle_save_keys(
    window: &Window,
    cpu: &mut Cpu,
    slots: &mut [Option<Snapshot>; SAVE_SLOTS],
    slot: &mut usize
) {
    if window.is_key_pressed(Key::F6, minifb::KeyRepeat::No) {
        *slot = (*slot + 1) % SAVE_SLOTS;
        log::info!("save slot {}", slot);
    }
    if window.is_key_pressed(Key::F5, minifb::KeyRepeat::No) {
        slots[*slot] = Some(cpu.snapshot());
        log::info!("saved state to slot {}", slot);
    }
    if window.is_key_pressed(Key::F9, minifb::KeyRepeat::No) {
        if let Some(snap) = &slots[*slot] {
            cpu.restore(snap);
            log::info!("restored state from slot {}", slot);
        }
    }
}

fn read_buffer(buffer: &mut [u32; W * H], cpu: &Cpu) {
    let cells = cpu.get_display_buffer();

    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            let color = if cells[y * SCREEN_WIDTH + x] == PIXEL_ON {
                FG_COLOR
            } else {
                BG_COLOR
            };
            for sy in 0..SCALING {
                for sx in 0..SCALING {
                    let dy = y * SCALING + sy;
                    let dx = x * SCALING + sx;
                    buffer[dy * W + dx] = color;
                }
            }
        }
    }
}

use tinyaudio::prelude::*;

const TONE_HZ: f32 = 220.0;

/// Single-tone beeper polled against the core's sound timer. The
/// output device only exists while the tone plays.
pub struct Beeper {
    device: Option<Box<dyn BaseAudioOutputDevice>>,
    params: OutputDeviceParameters
}
impl Beeper {
    pub fn new() -> Self {
        Self {
            device: None,
            params: OutputDeviceParameters {
                channels_count: 2,
                sample_rate: 44100,
                channel_sample_count: 4410
            }
        }
    }
    /// Matches the device state to the core's beep request.
    pub fn update(&mut self, should_beep: bool) {
        if should_beep {
            self.start();
        } else {
            self.device.take();
        }
    }
    fn start(&mut self) {
        if self.device.is_some() { return }
        let params = self.params.clone();
        let device = run_output_device(
            params,
            {
                let mut clock = 0f32;
                move |data| {
                    for samples in data.chunks_mut(params.channels_count) {
                        clock = (clock + 1.0) % params.sample_rate as f32;
                        let val = (clock * TONE_HZ * 2.0 * std::f32::consts::PI
                            / params.sample_rate as f32).sin();
                        for sample in samples {
                            *sample = val * 0.3;
                        }
                    }
                }
            }
        );
        match device {
            Ok(device) => self.device = Some(device),
            Err(e) => log::warn!("audio device unavailable: {}", e),
        }
    }
}

// ToneRenderer - callback-side state shared by every backend
//
// Bundles the generator and the command receiver that an output callback owns.
// Each render call first drains pending ToneCommands, then writes samples.
// Nothing here allocates or locks.

use super::commands::ToneCommandReceiver;
use super::sine::SineWaveGenerator;

/// Generator plus command queue owned by one output callback
pub struct ToneRenderer {
    generator: SineWaveGenerator,
    commands: ToneCommandReceiver,
}

impl ToneRenderer {
    pub fn new(generator: SineWaveGenerator, commands: ToneCommandReceiver) -> Self {
        Self {
            generator,
            commands,
        }
    }

    pub fn generator(&self) -> &SineWaveGenerator {
        &self.generator
    }

    /// Follow the device if it runs at a different rate than requested
    ///
    /// Non-positive rates (unknown) are ignored.
    pub fn sync_sample_rate(&mut self, device_rate: i64) {
        if device_rate <= 0 || device_rate > u32::MAX as i64 {
            return;
        }
        let device_rate = device_rate as u32;
        let config = *self.generator.config();
        if config.sample_rate_hz != device_rate {
            // Rate is positive, so retune cannot fail here
            let _ = self.generator.retune(config.with_sample_rate(device_rate));
        }
    }

    /// Render interleaved frames in the generator's own channel layout
    pub fn render_interleaved(&mut self, out: &mut [f32]) -> usize {
        self.commands.apply_pending(&mut self.generator);
        self.generator.fill(out)
    }

    /// Render one value per frame, copied to every device channel
    ///
    /// Used when the device layout differs from the generator's (e.g. a
    /// 6-channel desktop output). Returns the number of frames written.
    pub fn render_fanned(&mut self, out: &mut [f32], device_channels: usize) -> usize {
        self.commands.apply_pending(&mut self.generator);
        let device_channels = device_channels.max(1);
        let mut written = 0;
        for frame in out.chunks_exact_mut(device_channels) {
            frame.fill(self.generator.next_sample());
            written += 1;
        }
        written
    }

    /// Render a stereo frame slice as produced by Oboe's `(f32, f32)` layout
    pub fn render_pairs(&mut self, out: &mut [(f32, f32)]) -> usize {
        self.commands.apply_pending(&mut self.generator);
        for frame in out.iter_mut() {
            let value = self.generator.next_sample();
            *frame = (value, value);
        }
        out.len()
    }
}

//! Audio Output Callback - Oboe trait implementation for tone playback
//!
//! `SineOutputCallback` owns a [`ToneRenderer`] and is moved into the Oboe
//! stream. It runs on the real-time audio thread:
//! - No heap allocations during audio processing
//! - No mutex locks (tone changes arrive through an SPSC queue)
//! - Bounded execution time (one `sin` per frame)
//!
//! # Architecture
//! ```text
//! OboeBackend::open()
//!   └─> SineOutputCallback::new()
//!       └─> oboe::AudioStreamBuilder::set_callback()
//!           └─> SineOutputCallback::on_audio_ready() [Real-time thread]
//!               ├─> ToneRenderer::sync_sample_rate() [Follow device rate]
//!               └─> ToneRenderer::render_*()        [Drain commands, write frames]
//! ```

use std::marker::PhantomData;

use oboe::{
    AudioOutputCallback, AudioOutputStreamSafe, AudioStreamBase, DataCallbackResult, Mono,
    Stereo,
};

use super::renderer::ToneRenderer;

/// Output callback generic over the Oboe channel layout marker
pub struct SineOutputCallback<C> {
    renderer: ToneRenderer,
    marker: PhantomData<C>,
}

impl<C> SineOutputCallback<C> {
    pub fn new(renderer: ToneRenderer) -> Self {
        tracing::debug!("[SineOutputCallback] init");
        Self {
            renderer,
            marker: PhantomData,
        }
    }
}

impl<C> Drop for SineOutputCallback<C> {
    fn drop(&mut self) {
        tracing::debug!("[SineOutputCallback] drop");
    }
}

impl AudioOutputCallback for SineOutputCallback<Mono> {
    type FrameType = (f32, Mono);

    fn on_audio_ready(
        &mut self,
        stream: &mut dyn AudioOutputStreamSafe,
        frames: &mut [f32],
    ) -> DataCallbackResult {
        // Real-time audio callback - NO ALLOCATIONS, LOCKS, OR BLOCKING!
        self.renderer.sync_sample_rate(stream.get_sample_rate() as i64);
        self.renderer.render_interleaved(frames);
        DataCallbackResult::Continue
    }
}

impl AudioOutputCallback for SineOutputCallback<Stereo> {
    type FrameType = (f32, Stereo);

    fn on_audio_ready(
        &mut self,
        stream: &mut dyn AudioOutputStreamSafe,
        frames: &mut [(f32, f32)],
    ) -> DataCallbackResult {
        self.renderer.sync_sample_rate(stream.get_sample_rate() as i64);
        self.renderer.render_pairs(frames);
        DataCallbackResult::Continue
    }
}

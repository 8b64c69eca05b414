use std::sync::{Arc, Mutex, MutexGuard};

use crate::audio::{SineWaveGenerator, ToneRenderer};
use crate::error::StreamError;

use super::{AudioBackend, DeviceInfo, StreamInfo, StreamRequest};

/// Stub backend used for deterministic testing.
///
/// No audio I/O happens. The callback-side renderer is kept behind a shared
/// handle so tests can pull buffers through [`StubController::render`] as if
/// the device had requested them.
pub struct StubBackend {
    shared: Arc<Mutex<StubStream>>,
    device_rate: u32,
}

/// Test-side view of a [`StubBackend`].
#[derive(Clone)]
pub struct StubController {
    shared: Arc<Mutex<StubStream>>,
}

#[derive(Default)]
struct StubStream {
    renderer: Option<ToneRenderer>,
    paused: bool,
    opens: usize,
}

impl StubBackend {
    /// Stub device that honours the requested sample rate.
    pub fn new() -> (Self, StubController) {
        Self::with_device_rate(0)
    }

    /// Stub device that always runs at `device_rate` (0 = follow request).
    pub fn with_device_rate(device_rate: u32) -> (Self, StubController) {
        let shared = Arc::new(Mutex::new(StubStream::default()));
        let controller = StubController {
            shared: Arc::clone(&shared),
        };
        (
            Self {
                shared,
                device_rate,
            },
            controller,
        )
    }

    fn lock(&self) -> Result<MutexGuard<'_, StubStream>, StreamError> {
        lock_stream(&self.shared)
    }
}

fn lock_stream(shared: &Mutex<StubStream>) -> Result<MutexGuard<'_, StubStream>, StreamError> {
    shared.lock().map_err(|_| StreamError::LockPoisoned {
        component: "stub_stream".to_string(),
    })
}

impl AudioBackend for StubBackend {
    fn open(&mut self, request: StreamRequest) -> Result<StreamInfo, StreamError> {
        let generator = SineWaveGenerator::new(request.waveform)?;
        let mut renderer = ToneRenderer::new(generator, request.commands);
        if self.device_rate > 0 {
            renderer.sync_sample_rate(self.device_rate as i64);
        }

        let info = StreamInfo {
            sample_rate_hz: renderer.generator().config().sample_rate_hz,
            channel_count: renderer.generator().config().channel_count,
        };

        let mut stream = self.lock()?;
        stream.renderer = Some(renderer);
        stream.paused = false;
        stream.opens += 1;
        Ok(info)
    }

    fn pause(&mut self) -> Result<(), StreamError> {
        self.lock()?.paused = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), StreamError> {
        self.lock()?.paused = false;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StreamError> {
        let mut stream = self.lock()?;
        stream.renderer = None;
        stream.paused = false;
        Ok(())
    }

    fn describe_device(&self) -> Result<DeviceInfo, StreamError> {
        Ok(DeviceInfo {
            name: "stub".to_string(),
            sample_rate_hz: (self.device_rate > 0).then_some(self.device_rate),
            channel_count: Some(2),
        })
    }
}

impl StubController {
    /// Pull `frames` frames from the callback, as the device would.
    ///
    /// Returns `None` while no stream is open, the stream is paused, or
    /// `frames` is too large to allocate.
    pub fn render(&self, frames: usize) -> Option<Vec<f32>> {
        let mut stream = lock_stream(&self.shared).ok()?;
        if stream.paused {
            return None;
        }
        let renderer = stream.renderer.as_mut()?;
        let channels = renderer.generator().config().channel_count as usize;
        let mut out = vec![0.0; frames.checked_mul(channels)?];
        renderer.render_interleaved(&mut out);
        Some(out)
    }

    /// Whether a stream is currently open.
    pub fn is_open(&self) -> bool {
        lock_stream(&self.shared)
            .map(|stream| stream.renderer.is_some())
            .unwrap_or(false)
    }

    /// Number of times the backend opened a stream.
    pub fn open_count(&self) -> usize {
        lock_stream(&self.shared)
            .map(|stream| stream.opens)
            .unwrap_or(0)
    }

    /// Sample rate the callback generator currently runs at.
    pub fn sample_rate_hz(&self) -> Option<u32> {
        let stream = lock_stream(&self.shared).ok()?;
        stream
            .renderer
            .as_ref()
            .map(|renderer| renderer.generator().config().sample_rate_hz)
    }
}

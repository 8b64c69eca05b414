//! Oboe-based audio backend for Android
//!
//! Opens a shared f32 output stream (mono or stereo, following the requested
//! waveform) whose callback owns the tone generator. The device may pick a
//! different sample rate than requested; the callback follows it.

use oboe::{
    AudioDeviceDirection, AudioDeviceInfo, AudioOutputCallback, AudioStream, AudioStreamAsync,
    AudioStreamBase, AudioStreamBuilder, Mono, Output, PerformanceMode, SharingMode, Stereo,
};

use crate::audio::callback::SineOutputCallback;
use crate::audio::{SineWaveGenerator, ToneRenderer};
use crate::error::StreamError;

use super::{AudioBackend, DeviceInfo, StreamInfo, StreamRequest};

enum OutputStream {
    Mono(AudioStreamAsync<Output, SineOutputCallback<Mono>>),
    Stereo(AudioStreamAsync<Output, SineOutputCallback<Stereo>>),
}

impl OutputStream {
    fn sample_rate(&self) -> i32 {
        match self {
            OutputStream::Mono(stream) => stream.get_sample_rate(),
            OutputStream::Stereo(stream) => stream.get_sample_rate(),
        }
    }

    fn start(&mut self) -> oboe::Status {
        match self {
            OutputStream::Mono(stream) => stream.start(),
            OutputStream::Stereo(stream) => stream.start(),
        }
    }

    fn pause(&mut self) -> oboe::Status {
        match self {
            OutputStream::Mono(stream) => stream.pause(),
            OutputStream::Stereo(stream) => stream.pause(),
        }
    }

    fn stop(&mut self) -> oboe::Status {
        match self {
            OutputStream::Mono(stream) => stream.stop(),
            OutputStream::Stereo(stream) => stream.stop(),
        }
    }
}

/// Android backend that drives an Oboe output stream.
#[derive(Default)]
pub struct OboeBackend {
    stream: Option<OutputStream>,
}

impl OboeBackend {
    pub fn new() -> Self {
        Self { stream: None }
    }
}

fn open_stream<C>(
    callback: SineOutputCallback<C>,
    sample_rate: u32,
    low_latency: bool,
) -> Result<AudioStreamAsync<Output, SineOutputCallback<C>>, StreamError>
where
    C: oboe::IsChannelCount,
    (f32, C): oboe::IsFrameType,
    SineOutputCallback<C>: AudioOutputCallback<FrameType = (f32, C)>,
{
    let performance_mode = if low_latency {
        PerformanceMode::LowLatency
    } else {
        PerformanceMode::None
    };

    AudioStreamBuilder::default()
        .set_performance_mode(performance_mode)
        .set_sharing_mode(SharingMode::Shared)
        .set_direction::<Output>()
        .set_sample_rate(sample_rate as i32)
        .set_channel_count::<C>()
        .set_format::<f32>()
        .set_callback(callback)
        .open_stream()
        .map_err(|e| StreamError::StreamOpenFailed {
            reason: format!("Output stream: {:?}", e),
        })
}

impl AudioBackend for OboeBackend {
    fn open(&mut self, request: StreamRequest) -> Result<StreamInfo, StreamError> {
        let waveform = request.waveform;
        let generator = SineWaveGenerator::new(waveform)?;
        let renderer = ToneRenderer::new(generator, request.commands);

        let mut stream = if waveform.channel_count == 2 {
            OutputStream::Stereo(open_stream(
                SineOutputCallback::<Stereo>::new(renderer),
                waveform.sample_rate_hz,
                request.low_latency,
            )?)
        } else {
            OutputStream::Mono(open_stream(
                SineOutputCallback::<Mono>::new(renderer),
                waveform.sample_rate_hz,
                request.low_latency,
            )?)
        };

        stream.start().map_err(|e| StreamError::HardwareError {
            details: format!("Failed to start output stream: {:?}", e),
        })?;

        let info = StreamInfo {
            sample_rate_hz: stream.sample_rate().max(0) as u32,
            channel_count: waveform.channel_count,
        };
        tracing::debug!(
            "[OboeBackend] stream started: sample_rate={} Hz, channels={}",
            info.sample_rate_hz,
            info.channel_count
        );

        self.stream = Some(stream);
        Ok(info)
    }

    fn pause(&mut self) -> Result<(), StreamError> {
        let stream = self.stream.as_mut().ok_or(StreamError::NotRunning)?;
        stream.pause().map_err(|e| StreamError::HardwareError {
            details: format!("Failed to pause output stream: {:?}", e),
        })
    }

    fn resume(&mut self) -> Result<(), StreamError> {
        let stream = self.stream.as_mut().ok_or(StreamError::NotRunning)?;
        stream.start().map_err(|e| StreamError::HardwareError {
            details: format!("Failed to resume output stream: {:?}", e),
        })
    }

    fn close(&mut self) -> Result<(), StreamError> {
        if let Some(mut stream) = self.stream.take() {
            stream.stop().map_err(|e| StreamError::HardwareError {
                details: format!("Failed to stop output stream: {:?}", e),
            })?;
        }
        Ok(())
    }

    fn describe_device(&self) -> Result<DeviceInfo, StreamError> {
        let devices = AudioDeviceInfo::request(AudioDeviceDirection::Output).map_err(|e| {
            StreamError::HardwareError {
                details: format!("Device query failed: {:?}", e),
            }
        })?;

        let device = devices
            .into_iter()
            .next()
            .ok_or_else(|| StreamError::HardwareError {
                details: "No output device reported".to_string(),
            })?;

        Ok(DeviceInfo {
            name: device.product_name,
            sample_rate_hz: device.sample_rates.iter().copied().max().map(|r| r as u32),
            channel_count: device.channel_counts.iter().copied().max().map(|c| c as u16),
        })
    }
}

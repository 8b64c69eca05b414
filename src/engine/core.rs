//! EngineHandle: playback and probe orchestration for one tone.
//!
//! Owns the audio backend, the probe, the control end of the tone command
//! queue, and a broadcast channel of lifecycle events. The handle is created
//! by the host (JNI side or tests) and passed around explicitly.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::audio::{
    tone_command_queue, SineWaveGenerator, ToneCommand, ToneCommandSender, WaveformConfig,
};
use crate::config::AppConfig;
use crate::engine::backend::{
    platform_backend, AudioBackend, DeviceInfo, StreamInfo, StreamRequest,
};
use crate::error::{log_stream_error, GeneratorError, StreamError};
use crate::probe::{Probe, ProbeReport};

/// Capacity of the lifecycle event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Output stream lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    Stopped,
    Running,
    Paused,
}

/// Lifecycle event published by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    Started {
        sample_rate_hz: u32,
        channel_count: u16,
    },
    Paused,
    Resumed,
    Stopped,
    ToneChanged {
        frequency_hz: f32,
        amplitude: f32,
    },
}

/// Playback engine plus probe for a single tone
pub struct EngineHandle {
    config: AppConfig,
    /// Requested tone; the running stream may use a different sample rate
    tone: WaveformConfig,
    backend: Box<dyn AudioBackend>,
    state: StreamState,
    stream_info: Option<StreamInfo>,
    commands: Option<ToneCommandSender>,
    probe: Probe,
    events_tx: broadcast::Sender<EngineEvent>,
}

impl EngineHandle {
    /// Create an engine using the platform's audio backend
    ///
    /// # Errors
    /// `StreamError::Generator` if the configured tone is invalid
    pub fn new(config: AppConfig) -> Result<Self, StreamError> {
        Self::with_backend(config, platform_backend())
    }

    /// Create an engine with an explicit backend
    ///
    /// # Errors
    /// `StreamError::Generator` if the configured tone is invalid
    pub fn with_backend(
        config: AppConfig,
        backend: Box<dyn AudioBackend>,
    ) -> Result<Self, StreamError> {
        let tone = config.tone.to_waveform();
        let probe = Probe::new(SineWaveGenerator::new(tone)?);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            config,
            tone,
            backend,
            state: StreamState::Stopped,
            stream_info: None,
            commands: None,
            probe,
            events_tx,
        })
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Requested tone parameters
    pub fn tone(&self) -> &WaveformConfig {
        &self.tone
    }

    /// Parameters negotiated with the device while a stream is open
    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.stream_info
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Start, or resume, tone playback
    ///
    /// Stopped → opens and starts a stream; Paused → resumes it; Running →
    /// no-op.
    ///
    /// # Errors
    /// - Stream cannot be opened (no device, unsupported format)
    /// - Hardware failure while starting or resuming
    pub fn start(&mut self) -> Result<(), StreamError> {
        match self.state {
            StreamState::Running => {
                tracing::debug!("[EngineHandle] start ignored: already running");
                Ok(())
            }
            StreamState::Paused => {
                self.backend.resume().inspect_err(|err| {
                    log_stream_error(err, "start");
                })?;
                self.state = StreamState::Running;
                self.publish(EngineEvent::Resumed);
                Ok(())
            }
            StreamState::Stopped => self.open_stream(),
        }
    }

    fn open_stream(&mut self) -> Result<(), StreamError> {
        let (sender, receiver) = tone_command_queue(self.config.stream.command_capacity);
        let request = StreamRequest {
            waveform: self.tone,
            commands: receiver,
            low_latency: self.config.stream.low_latency,
        };

        let info = self.backend.open(request).inspect_err(|err| {
            log_stream_error(err, "start");
        })?;

        tracing::info!(
            "[EngineHandle] stream started: sample_rate={} Hz, channels={}, frequency={} Hz",
            info.sample_rate_hz,
            info.channel_count,
            self.tone.frequency_hz
        );

        self.commands = Some(sender);
        self.stream_info = Some(info);
        self.state = StreamState::Running;
        self.publish(EngineEvent::Started {
            sample_rate_hz: info.sample_rate_hz,
            channel_count: info.channel_count,
        });
        Ok(())
    }

    /// Pause playback, keeping the stream open
    ///
    /// # Errors
    /// - `StreamError::NotRunning` if no stream is open
    /// - Hardware failure while pausing
    pub fn pause(&mut self) -> Result<(), StreamError> {
        match self.state {
            StreamState::Stopped => {
                let err = StreamError::NotRunning;
                log_stream_error(&err, "pause");
                Err(err)
            }
            StreamState::Paused => Ok(()),
            StreamState::Running => {
                self.backend.pause().inspect_err(|err| {
                    log_stream_error(err, "pause");
                })?;
                self.state = StreamState::Paused;
                self.publish(EngineEvent::Paused);
                Ok(())
            }
        }
    }

    /// Stop playback and release the stream
    ///
    /// Safe to call when already stopped. The engine ends up Stopped even if
    /// the backend reports a failure while closing.
    pub fn stop(&mut self) -> Result<(), StreamError> {
        if self.state == StreamState::Stopped {
            return Ok(());
        }

        let result = self.backend.close();
        self.commands = None;
        self.stream_info = None;
        self.state = StreamState::Stopped;
        self.publish(EngineEvent::Stopped);
        tracing::info!("[EngineHandle] stream stopped");

        result.inspect_err(|err| {
            log_stream_error(err, "stop");
        })
    }

    /// Change the tone frequency, live if a stream is open
    ///
    /// # Errors
    /// - `StreamError::Generator` for a non-positive or non-finite frequency
    /// - `StreamError::StreamFailure` if the command queue is full
    pub fn set_frequency(&mut self, frequency_hz: f32) -> Result<(), StreamError> {
        let next = self.tone.with_frequency(frequency_hz);
        self.apply_tone(next, ToneCommand::SetFrequency(frequency_hz), "set_frequency")
    }

    /// Change the tone amplitude, live if a stream is open
    ///
    /// # Errors
    /// - `StreamError::Generator` for an amplitude outside [0, 1]
    /// - `StreamError::StreamFailure` if the command queue is full
    pub fn set_amplitude(&mut self, amplitude: f32) -> Result<(), StreamError> {
        let next = self.tone.with_amplitude(amplitude);
        self.apply_tone(next, ToneCommand::SetAmplitude(amplitude), "set_amplitude")
    }

    fn apply_tone(
        &mut self,
        next: WaveformConfig,
        command: ToneCommand,
        context: &str,
    ) -> Result<(), StreamError> {
        next.validate()
            .map_err(StreamError::from)
            .inspect_err(|err| log_stream_error(err, context))?;

        if let Some(commands) = self.commands.as_mut() {
            commands
                .send(command)
                .inspect_err(|err| log_stream_error(err, context))?;
        }

        let probe_tone = self
            .probe
            .config()
            .with_frequency(next.frequency_hz)
            .with_amplitude(next.amplitude);
        self.probe.retune(probe_tone)?;
        self.tone = next;

        self.publish(EngineEvent::ToneChanged {
            frequency_hz: next.frequency_hz,
            amplitude: next.amplitude,
        });
        Ok(())
    }

    /// Render and measure one probe buffer of the configured size
    ///
    /// Independent of the output stream; works while stopped.
    pub fn probe(&mut self) -> Result<ProbeReport, GeneratorError> {
        self.probe.run(self.config.probe.buffer_frames)
    }

    /// Render and measure a probe buffer of `frames` frames
    pub fn probe_frames(&mut self, frames: usize) -> Result<ProbeReport, GeneratorError> {
        self.probe.run(frames)
    }

    /// Restart the probe tone from phase 0
    pub fn reset_probe(&mut self) {
        self.probe.reset();
    }

    /// Describe the default output device
    pub fn describe_device(&self) -> Result<DeviceInfo, StreamError> {
        self.backend.describe_device()
    }

    /// Subscribe to lifecycle events
    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.events_tx.subscribe()
    }

    /// Lifecycle events as an async stream
    ///
    /// Events missed by a lagging consumer are skipped.
    pub fn event_stream(&self) -> impl Stream<Item = EngineEvent> {
        BroadcastStream::new(self.events_tx.subscribe()).filter_map(|event| event.ok())
    }

    fn publish(&self, event: EngineEvent) {
        // No subscribers is fine
        let _ = self.events_tx.send(event);
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if self.state != StreamState::Stopped {
            let _ = self.stop();
        }
        tracing::debug!("[EngineHandle] drop");
    }
}

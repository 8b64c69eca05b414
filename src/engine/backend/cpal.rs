//! CPAL-based audio backend for desktop platforms (Linux, macOS, Windows)
//!
//! `cpal::Stream` is not `Send`, so the stream lives on a dedicated control
//! thread for its whole life. The backend talks to that thread over std
//! channels; every control message carries a reply channel so errors surface
//! synchronously to the caller.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio::{SineWaveGenerator, ToneRenderer};
use crate::error::StreamError;

use super::{AudioBackend, DeviceInfo, StreamInfo, StreamRequest};

enum Control {
    Pause,
    Resume,
    Close,
}

type Reply = Sender<Result<(), StreamError>>;

struct OutputThread {
    control_tx: Sender<(Control, Reply)>,
    join: JoinHandle<()>,
}

/// CPAL output backend driving the default output device
#[derive(Default)]
pub struct CpalBackend {
    thread: Option<OutputThread>,
}

impl CpalBackend {
    pub fn new() -> Self {
        Self { thread: None }
    }

    fn send(&self, control: Control) -> Result<(), StreamError> {
        let thread = self.thread.as_ref().ok_or(StreamError::NotRunning)?;
        let (reply_tx, reply_rx) = mpsc::channel();
        thread
            .control_tx
            .send((control, reply_tx))
            .map_err(|_| thread_gone())?;
        reply_rx.recv().map_err(|_| thread_gone())?
    }
}

fn thread_gone() -> StreamError {
    StreamError::StreamFailure {
        reason: "output thread exited".to_string(),
    }
}

fn default_device() -> Result<cpal::Device, StreamError> {
    cpal::default_host()
        .default_output_device()
        .ok_or_else(|| StreamError::StreamOpenFailed {
            reason: "No default output device found".to_string(),
        })
}

fn build_stream(request: StreamRequest) -> Result<(cpal::Stream, StreamInfo), StreamError> {
    let device = default_device()?;
    let config = device
        .default_output_config()
        .map_err(|e| StreamError::StreamOpenFailed {
            reason: format!("Failed to get default output config: {:?}", e),
        })?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(StreamError::StreamOpenFailed {
            reason: "Only F32 sample format is currently supported for output".to_string(),
        });
    }

    let stream_config: cpal::StreamConfig = config.into();
    let device_channels = stream_config.channels as usize;
    let info = StreamInfo {
        sample_rate_hz: stream_config.sample_rate.0,
        channel_count: stream_config.channels,
    };

    let generator =
        SineWaveGenerator::new(request.waveform.with_sample_rate(info.sample_rate_hz))?;
    let mut renderer = ToneRenderer::new(generator, request.commands);

    let err_fn = |err| tracing::error!("[CpalBackend] Output stream error: {}", err);

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                renderer.render_fanned(data, device_channels);
            },
            err_fn,
            None,
        )
        .map_err(|e| StreamError::StreamOpenFailed {
            reason: format!("{:?}", e),
        })?;

    stream.play().map_err(|e| StreamError::HardwareError {
        details: format!("Output start failed: {}", e),
    })?;

    Ok((stream, info))
}

fn run_output_thread(
    request: StreamRequest,
    ready_tx: Sender<Result<StreamInfo, StreamError>>,
    control_rx: Receiver<(Control, Reply)>,
) {
    let stream = match build_stream(request) {
        Ok((stream, info)) => {
            let _ = ready_tx.send(Ok(info));
            stream
        }
        Err(err) => {
            let _ = ready_tx.send(Err(err));
            return;
        }
    };

    while let Ok((control, reply)) = control_rx.recv() {
        let result = match control {
            Control::Pause => stream.pause().map_err(|e| StreamError::HardwareError {
                details: format!("Output pause failed: {}", e),
            }),
            Control::Resume => stream.play().map_err(|e| StreamError::HardwareError {
                details: format!("Output resume failed: {}", e),
            }),
            Control::Close => {
                let _ = reply.send(Ok(()));
                break;
            }
        };
        let _ = reply.send(result);
    }

    drop(stream);
    tracing::debug!("[CpalBackend] output thread finished");
}

impl AudioBackend for CpalBackend {
    fn open(&mut self, request: StreamRequest) -> Result<StreamInfo, StreamError> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (control_tx, control_rx) = mpsc::channel();

        let join = std::thread::Builder::new()
            .name("sine-probe-output".to_string())
            .spawn(move || run_output_thread(request, ready_tx, control_rx))?;

        match ready_rx.recv() {
            Ok(Ok(info)) => {
                self.thread = Some(OutputThread { control_tx, join });
                Ok(info)
            }
            Ok(Err(err)) => {
                let _ = join.join();
                Err(err)
            }
            Err(_) => {
                let _ = join.join();
                Err(thread_gone())
            }
        }
    }

    fn pause(&mut self) -> Result<(), StreamError> {
        self.send(Control::Pause)
    }

    fn resume(&mut self) -> Result<(), StreamError> {
        self.send(Control::Resume)
    }

    fn close(&mut self) -> Result<(), StreamError> {
        let result = self.send(Control::Close);
        if let Some(thread) = self.thread.take() {
            drop(thread.control_tx);
            if thread.join.join().is_err() {
                return Err(thread_gone());
            }
        }
        result
    }

    fn describe_device(&self) -> Result<DeviceInfo, StreamError> {
        let device = default_device()?;
        let name = device.name().unwrap_or_else(|_| "unknown".to_string());
        let config = device.default_output_config().ok();
        Ok(DeviceInfo {
            name,
            sample_rate_hz: config.as_ref().map(|c| c.sample_rate().0),
            channel_count: config.as_ref().map(|c| c.channels()),
        })
    }
}

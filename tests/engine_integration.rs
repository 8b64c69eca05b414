//! End-to-end checks through the public API: config, engine and probe

use sine_probe::engine::StubBackend;
use sine_probe::error::ErrorCode;
use sine_probe::{
    AppConfig, EngineEvent, EngineHandle, Probe, ProbeReport, SineWaveGenerator, StreamError,
    StreamState,
};

const CONFIG_JSON: &str = r#"{
    "tone": { "sample_rate_hz": 44100, "frequency_hz": 1000.0, "amplitude": 0.25, "channel_count": 2 },
    "probe": { "buffer_frames": 4410 }
}"#;

#[test]
fn test_json_config_drives_engine_and_probe() {
    let config = AppConfig::from_json_str(CONFIG_JSON).unwrap();
    let (backend, controller) = StubBackend::new();
    let mut engine = EngineHandle::with_backend(config, Box::new(backend)).unwrap();

    let report = engine.probe().unwrap();
    assert_eq!(report.sample_rate_hz, 44100);
    assert_eq!(report.channel_count, 2);
    assert_eq!(report.frames, 4410);
    assert_eq!(report.sample_count, 8820);
    assert!(report.peak <= 0.25 + 1e-6);
    let dominant = report.dominant_frequency_hz.unwrap();
    assert!((dominant - 1000.0).abs() < 44100.0 / 8192.0);

    engine.start().unwrap();
    let frames = controller.render(128).unwrap();
    assert_eq!(frames.len(), 256);
    assert!(frames.chunks_exact(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_probe_report_round_trips_through_json() {
    let mut probe = Probe::new(
        SineWaveGenerator::new(AppConfig::default().tone.to_waveform()).unwrap(),
    );
    let report = probe.run(2048).unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let decoded: ProbeReport = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, report);
}

#[test]
fn test_session_events_in_order() {
    let (backend, _controller) = StubBackend::new();
    let mut engine = EngineHandle::with_backend(AppConfig::default(), Box::new(backend)).unwrap();
    let mut events = engine.subscribe_events();

    engine.start().unwrap();
    engine.set_frequency(660.0).unwrap();
    engine.pause().unwrap();
    engine.stop().unwrap();
    assert_eq!(engine.state(), StreamState::Stopped);

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    assert_eq!(received.len(), 4);
    assert!(matches!(received[0], EngineEvent::Started { .. }));
    assert_eq!(
        received[1],
        EngineEvent::ToneChanged {
            frequency_hz: 660.0,
            amplitude: 0.5
        }
    );
    assert_eq!(received[2], EngineEvent::Paused);
    assert_eq!(received[3], EngineEvent::Stopped);
}

#[test]
fn test_errors_carry_codes() {
    let (backend, _controller) = StubBackend::new();
    let mut engine = EngineHandle::with_backend(AppConfig::default(), Box::new(backend)).unwrap();

    let err = engine.pause().unwrap_err();
    assert_eq!(err, StreamError::NotRunning);
    assert_eq!(err.code(), 2001);

    let err = engine.set_amplitude(2.0).unwrap_err();
    assert_eq!(err.code(), 1001);
    assert!(err.to_string().contains("amplitude"));
}

#[test]
fn test_describe_device_reports_stub() {
    let (backend, _controller) = StubBackend::with_device_rate(44100);
    let engine = EngineHandle::with_backend(AppConfig::default(), Box::new(backend)).unwrap();

    let device = engine.describe_device().unwrap();
    assert_eq!(device.name, "stub");
    assert_eq!(device.sample_rate_hz, Some(44100));
}

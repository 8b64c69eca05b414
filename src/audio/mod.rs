// Audio module - tone synthesis and callback-side plumbing

pub mod commands;
pub mod renderer;
pub mod sample_buffer;
pub mod sine;

#[cfg(target_os = "android")]
pub mod callback;

// Re-export commonly used types for convenience
pub use commands::{
    tone_command_queue, ToneCommand, ToneCommandReceiver, ToneCommandSender,
    DEFAULT_COMMAND_CAPACITY,
};
pub use renderer::ToneRenderer;
pub use sample_buffer::SampleBuffer;
pub use sine::{SineWaveGenerator, WaveformConfig};

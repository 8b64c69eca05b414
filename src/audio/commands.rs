// ToneCommand queue - lock-free parameter changes into the audio callback
//
// The audio callback owns its SineWaveGenerator exclusively. The control side
// never touches it; instead it pushes ToneCommands through an SPSC ring buffer
// that the callback drains at the top of every buffer.
//
// Command flow:
// 1. EngineHandle validates the new value against the current tone
// 2. EngineHandle pushes a ToneCommand into the producer
// 3. Audio callback pops pending commands and retunes its generator
// 4. Generator keeps its phase, so the change is click-free

use rtrb::{Consumer, Producer, RingBuffer};

use super::sine::SineWaveGenerator;
use crate::error::StreamError;

/// Default queue depth; the UI can never outrun the callback by this much
pub const DEFAULT_COMMAND_CAPACITY: usize = 32;

/// Parameter change for a running tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneCommand {
    SetFrequency(f32),
    SetAmplitude(f32),
}

/// Control-side end of the command queue
pub struct ToneCommandSender {
    producer: Producer<ToneCommand>,
}

/// Callback-side end of the command queue
pub struct ToneCommandReceiver {
    consumer: Consumer<ToneCommand>,
}

/// Create a connected sender/receiver pair
///
/// A `capacity` of 0 is raised to 1.
pub fn tone_command_queue(capacity: usize) -> (ToneCommandSender, ToneCommandReceiver) {
    let (producer, consumer) = RingBuffer::new(capacity.max(1));
    (
        ToneCommandSender { producer },
        ToneCommandReceiver { consumer },
    )
}

impl ToneCommandSender {
    /// Queue a command for the audio callback
    ///
    /// # Errors
    /// `StreamError::StreamFailure` if the queue is full or the callback side
    /// has been dropped
    pub fn send(&mut self, command: ToneCommand) -> Result<(), StreamError> {
        if self.producer.is_abandoned() {
            return Err(StreamError::StreamFailure {
                reason: "tone command receiver dropped".to_string(),
            });
        }
        self.producer
            .push(command)
            .map_err(|_| StreamError::StreamFailure {
                reason: "tone command queue full".to_string(),
            })
    }
}

impl ToneCommandReceiver {
    /// Apply every pending command to `generator`
    ///
    /// Real-time safe: no allocation or locking. Commands whose values no
    /// longer validate are skipped. Returns the number applied.
    pub fn apply_pending(&mut self, generator: &mut SineWaveGenerator) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.consumer.pop() {
            let current = *generator.config();
            let next = match command {
                ToneCommand::SetFrequency(hz) => current.with_frequency(hz),
                ToneCommand::SetAmplitude(amplitude) => current.with_amplitude(amplitude),
            };
            if generator.retune(next).is_ok() {
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::WaveformConfig;

    fn generator() -> SineWaveGenerator {
        SineWaveGenerator::new(WaveformConfig::new(48000, 440.0, 0.5, 1)).unwrap()
    }

    #[test]
    fn test_commands_are_applied_in_order() {
        let (mut tx, mut rx) = tone_command_queue(4);
        let mut generator = generator();

        tx.send(ToneCommand::SetFrequency(880.0)).unwrap();
        tx.send(ToneCommand::SetAmplitude(0.25)).unwrap();
        tx.send(ToneCommand::SetFrequency(1000.0)).unwrap();

        assert_eq!(rx.apply_pending(&mut generator), 3);
        assert_eq!(generator.config().frequency_hz, 1000.0);
        assert_eq!(generator.config().amplitude, 0.25);
        assert_eq!(rx.apply_pending(&mut generator), 0);
    }

    #[test]
    fn test_full_queue_reports_stream_failure() {
        let (mut tx, _rx) = tone_command_queue(1);
        tx.send(ToneCommand::SetAmplitude(0.1)).unwrap();

        let result = tx.send(ToneCommand::SetAmplitude(0.2));
        assert!(matches!(result, Err(StreamError::StreamFailure { .. })));
    }

    #[test]
    fn test_zero_capacity_holds_one_command() {
        let (mut tx, mut rx) = tone_command_queue(0);
        let mut generator = generator();

        tx.send(ToneCommand::SetFrequency(660.0)).unwrap();
        assert!(tx.send(ToneCommand::SetFrequency(770.0)).is_err());

        assert_eq!(rx.apply_pending(&mut generator), 1);
        assert_eq!(generator.config().frequency_hz, 660.0);
    }

    #[test]
    fn test_dropped_receiver_reports_stream_failure() {
        let (mut tx, rx) = tone_command_queue(4);
        drop(rx);

        let result = tx.send(ToneCommand::SetFrequency(220.0));
        assert!(matches!(result, Err(StreamError::StreamFailure { .. })));
    }

    #[test]
    fn test_invalid_command_is_skipped() {
        let (mut tx, mut rx) = tone_command_queue(4);
        let mut generator = generator();

        tx.send(ToneCommand::SetAmplitude(3.0)).unwrap();
        tx.send(ToneCommand::SetFrequency(220.0)).unwrap();

        assert_eq!(rx.apply_pending(&mut generator), 1);
        assert_eq!(generator.config().amplitude, 0.5);
        assert_eq!(generator.config().frequency_hz, 220.0);
    }
}

// THEORY:
// The `mood_gateways` crate is the boundary between the pure stabilization
// engine and the physical world. The engine decides *what* the actuators
// should do; this crate owns *how* those decisions reach real hardware, and
// what happens when the hardware misbehaves.
//
// Key architectural principles:
// 1.  **Narrow trait seams**: each actuator is a one-method trait
//     (`LightGateway::set_light`, `AudioGateway::play`). The engine's output
//     maps onto these directly, and tests substitute doubles trivially.
// 2.  **Explicit failure, contained failure**: every gateway call returns a
//     `Result<(), GatewayError>`. The `ActuatorBank` that fans a transition
//     out to both actuators logs failures and swallows them. A dead lamp
//     must never stall the frame loop, and the committed state upstream is
//     never rolled back, so the next differing frame retries implicitly.
// 3.  **Always-available fallbacks**: the console gateways work on any
//     machine with no hardware at all. Real transports (BLE lamp, audio
//     sink) are opt-in cargo features.

use mood_engine::pipeline::{LightCommand, Rgb, TrackId, TransitionData};
use thiserror::Error;
use tracing::warn;

pub mod console;

#[cfg(feature = "ble")]
pub mod ble_lamp;

#[cfg(feature = "audio")]
pub mod player;

/// The soft, warm light issued as a best-effort courtesy during teardown.
pub const IDLE_LIGHT: LightCommand = LightCommand {
    brightness: 30,
    color: Rgb(255, 255, 200),
};

/// Failure reported by an actuator gateway. These are logged and tolerated,
/// never propagated into the frame loop.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("audio asset missing: {0}")]
    AssetMissing(String),
}

/// Drives the ambient light. Implementations own their transport and any
/// reconnection policy; callers only see success or failure.
pub trait LightGateway {
    fn set_light(&mut self, cmd: &LightCommand) -> Result<(), GatewayError>;
}

/// Drives the audio player. `play` must be idempotent: requesting the track
/// that is already playing is a no-op, so a re-committed mood never restarts
/// its music. Playback loops until superseded.
pub trait AudioGateway {
    fn play(&mut self, track: &TrackId) -> Result<(), GatewayError>;

    /// Halts playback entirely; used during teardown. Defaults to a no-op for
    /// gateways with nothing to silence.
    fn stop(&mut self) {}
}

/// Fans one pipeline transition out to both actuators, absorbing failures.
pub struct ActuatorBank {
    light: Box<dyn LightGateway>,
    audio: Box<dyn AudioGateway>,
}

impl ActuatorBank {
    pub fn new(light: Box<dyn LightGateway>, audio: Box<dyn AudioGateway>) -> Self {
        Self { light, audio }
    }

    /// Forwards a confirmed transition to both gateways. Failures are logged
    /// and swallowed; one dead actuator does not block the other, and neither
    /// blocks the caller.
    pub fn apply(&mut self, transition: &TransitionData) {
        if let Err(err) = self.light.set_light(&transition.light) {
            warn!(mood = %transition.mood, %err, "light gateway rejected the transition");
        }
        if let Err(err) = self.audio.play(&transition.track) {
            warn!(mood = %transition.mood, %err, "audio gateway rejected the transition");
        }
    }

    /// Best-effort teardown: dim to the idle light and silence the player.
    /// Failures are only logged; the process is exiting anyway.
    pub fn idle(&mut self) {
        if let Err(err) = self.light.set_light(&IDLE_LIGHT) {
            warn!(%err, "could not issue the idle light during teardown");
        }
        self.audio.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mood_engine::pipeline::{Mood, RawEmotion};
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingLight {
        calls: Rc<Cell<usize>>,
    }

    impl LightGateway for CountingLight {
        fn set_light(&mut self, _cmd: &LightCommand) -> Result<(), GatewayError> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    struct FailingLight;

    impl LightGateway for FailingLight {
        fn set_light(&mut self, _cmd: &LightCommand) -> Result<(), GatewayError> {
            Err(GatewayError::Transport("write timed out".into()))
        }
    }

    struct CountingAudio {
        calls: Rc<Cell<usize>>,
    }

    impl AudioGateway for CountingAudio {
        fn play(&mut self, _track: &TrackId) -> Result<(), GatewayError> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    fn transition() -> TransitionData {
        let mood = Mood::Raw(RawEmotion::Happy);
        TransitionData {
            mood,
            light: mood_engine::core_modules::actuator_map::light_for(mood),
            track: mood_engine::core_modules::actuator_map::track_for(mood),
        }
    }

    #[test]
    fn bank_forwards_to_both_gateways() {
        let light_calls = Rc::new(Cell::new(0));
        let audio_calls = Rc::new(Cell::new(0));
        let mut bank = ActuatorBank::new(
            Box::new(CountingLight { calls: light_calls.clone() }),
            Box::new(CountingAudio { calls: audio_calls.clone() }),
        );

        bank.apply(&transition());
        assert_eq!(light_calls.get(), 1);
        assert_eq!(audio_calls.get(), 1);
    }

    #[test]
    fn a_failing_light_does_not_block_the_audio() {
        let audio_calls = Rc::new(Cell::new(0));
        let mut bank = ActuatorBank::new(
            Box::new(FailingLight),
            Box::new(CountingAudio { calls: audio_calls.clone() }),
        );

        // Must not panic and must still reach the audio gateway.
        bank.apply(&transition());
        assert_eq!(audio_calls.get(), 1);
    }

    #[test]
    fn idle_issues_the_soft_teardown_light() {
        struct LastCommand {
            last: Rc<Cell<Option<LightCommand>>>,
        }
        impl LightGateway for LastCommand {
            fn set_light(&mut self, cmd: &LightCommand) -> Result<(), GatewayError> {
                self.last.set(Some(*cmd));
                Ok(())
            }
        }

        let last = Rc::new(Cell::new(None));
        let audio_calls = Rc::new(Cell::new(0));
        let mut bank = ActuatorBank::new(
            Box::new(LastCommand { last: last.clone() }),
            Box::new(CountingAudio { calls: audio_calls }),
        );

        bank.idle();
        assert_eq!(last.get(), Some(IDLE_LIGHT));
    }
}

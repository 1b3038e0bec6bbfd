// THEORY:
// The console gateways are the always-available actuator backends: they
// implement the same traits as the hardware transports but only log what the
// hardware would have done. They serve two purposes: a degraded mode when no
// lamp or speaker is reachable, and a zero-dependency target for the demo
// runner and for tests.

use crate::{AudioGateway, GatewayError, LightGateway};
use mood_engine::pipeline::{LightCommand, TrackId};
use tracing::info;

/// A light gateway that logs commands instead of transmitting them.
#[derive(Debug, Default)]
pub struct ConsoleLight;

impl LightGateway for ConsoleLight {
    fn set_light(&mut self, cmd: &LightCommand) -> Result<(), GatewayError> {
        info!(light = %cmd, "console light");
        Ok(())
    }
}

/// An audio gateway that logs track changes. It honors the same idempotence
/// contract as the real player: a repeated request for the current track is
/// silently ignored.
#[derive(Debug, Default)]
pub struct ConsoleAudio {
    current: Option<TrackId>,
}

impl AudioGateway for ConsoleAudio {
    fn play(&mut self, track: &TrackId) -> Result<(), GatewayError> {
        if self.current.as_ref() == Some(track) {
            return Ok(());
        }
        info!(%track, "console audio: now looping");
        self.current = Some(*track);
        Ok(())
    }

    fn stop(&mut self) {
        if self.current.take().is_some() {
            info!("console audio: stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_light_accepts_any_command() {
        let mut light = ConsoleLight;
        let cmd = LightCommand {
            brightness: 85,
            color: mood_engine::pipeline::Rgb(255, 200, 100),
        };
        assert!(light.set_light(&cmd).is_ok());
    }

    #[test]
    fn console_audio_is_idempotent_on_the_same_track() {
        let mut audio = ConsoleAudio::default();
        let track = TrackId("music/happy.mp3");
        assert!(audio.play(&track).is_ok());
        assert!(audio.play(&track).is_ok());
        assert_eq!(audio.current, Some(track));

        let other = TrackId("music/sad.mp3");
        assert!(audio.play(&other).is_ok());
        assert_eq!(audio.current, Some(other));
    }
}

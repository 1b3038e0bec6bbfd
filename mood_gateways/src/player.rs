// THEORY:
// The `player` module is the real transport behind `AudioGateway`: a rodio
// sink that loops one label-addressed track until the next transition
// supersedes it. Two contract points matter here:
//
// 1.  **Idempotence**: a request for the track that is already playing is a
//     no-op. Without this, a re-committed mood would restart its music with
//     an audible stutter.
// 2.  **Loop-until-superseded**: tracks repeat indefinitely; the player never
//     falls silent on its own.
//
// The `current` marker is only advanced after a track actually starts, so a
// failed load (missing asset, undecodable file) leaves the previous track
// playing and remains retryable.

use crate::{AudioGateway, GatewayError};
use mood_engine::pipeline::TrackId;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

/// An `AudioGateway` backed by the default audio output device.
pub struct RodioPlayer {
    /// Root directory the label-addressed track paths resolve against.
    asset_dir: PathBuf,
    // The stream must outlive the sink or playback stops.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    current: Option<TrackId>,
}

impl RodioPlayer {
    /// Opens the default output device. Failing here is fatal for the caller
    /// (device unavailable at startup).
    pub fn open(asset_dir: PathBuf) -> Result<Self, GatewayError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| GatewayError::DeviceUnavailable(e.to_string()))?;
        Ok(Self {
            asset_dir,
            _stream: stream,
            handle,
            sink: None,
            current: None,
        })
    }

}

impl AudioGateway for RodioPlayer {
    fn play(&mut self, track: &TrackId) -> Result<(), GatewayError> {
        if self.current.as_ref() == Some(track) {
            return Ok(());
        }

        let path = self.asset_dir.join(track.as_str());
        let file = File::open(&path)
            .map_err(|_| GatewayError::AssetMissing(path.display().to_string()))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| GatewayError::Transport(e.to_string()))?
            .repeat_infinite();

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| GatewayError::DeviceUnavailable(e.to_string()))?;
        sink.append(source);

        info!(%track, "now looping");
        self.sink = Some(sink);
        self.current = Some(*track);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.current = None;
    }
}

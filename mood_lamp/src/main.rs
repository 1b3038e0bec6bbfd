// THEORY:
// Process entry point: wiring, not logic. `main` initializes logging, loads
// the deployment config, builds the actuator bank from whichever gateway
// features were compiled in, runs the frame loop (live camera with the
// `camera` feature, scripted demo otherwise), and performs the cooperative
// teardown (a best-effort idle light and audio stop) no matter how the
// loop ended. All the interesting behavior lives in `mood_engine`.

mod config;
mod scripted;

#[cfg(feature = "camera")]
mod camera;

use anyhow::Result;
use config::RunnerConfig;
use mood_engine::pipeline::MoodPipeline;
use mood_gateways::{ActuatorBank, AudioGateway, LightGateway};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args().nth(1);
    let config = config::load(config_path.as_deref().map(Path::new))?;
    info!(frame_skip = config.frame_skip, "mood lamp starting");

    let mut pipeline = MoodPipeline::new(config.pipeline.clone());
    let mut bank = ActuatorBank::new(build_light(&config)?, build_audio(&config)?);

    let result = run(&config, &mut pipeline, &mut bank);

    // Cooperative teardown regardless of how the loop ended.
    info!("shutting down");
    bank.idle();
    result
}

#[cfg(feature = "camera")]
fn run(config: &RunnerConfig, pipeline: &mut MoodPipeline, bank: &mut ActuatorBank) -> Result<()> {
    // The scripted classifier stands in until a real detection backend
    // implementing `EmotionClassifier` is wired here.
    let mut classifier = scripted::ScriptedClassifier::demo();
    camera::run(config, &mut classifier, pipeline, bank)
}

#[cfg(not(feature = "camera"))]
fn run(config: &RunnerConfig, pipeline: &mut MoodPipeline, bank: &mut ActuatorBank) -> Result<()> {
    use mood_engine::pipeline::Report;

    let _ = config;
    info!("built without the camera feature; replaying the scripted demo");

    let mut classifier = scripted::ScriptedClassifier::demo();
    while let Some(detections) = classifier.next_frame() {
        match pipeline.observe(&detections) {
            Report::Transition(data) => {
                info!(mood = %data.mood, light = %data.light, track = %data.track, "transition");
                bank.apply(&data);
            }
            Report::Steady => {}
            Report::NoSignal => {}
        }
    }
    Ok(())
}

#[cfg(feature = "ble")]
fn build_light(config: &RunnerConfig) -> Result<Box<dyn LightGateway>> {
    use anyhow::Context;
    use mood_gateways::ble_lamp::{BleLamp, BleLampConfig};
    use uuid::Uuid;

    let lamp_config = BleLampConfig {
        address: config.lamp_address.clone(),
        service_uuid: Uuid::parse_str(&config.lamp_service_uuid)
            .context("invalid lamp service UUID")?,
        characteristic_uuid: Uuid::parse_str(&config.lamp_characteristic_uuid)
            .context("invalid lamp characteristic UUID")?,
    };
    // Device unavailable at startup is fatal; degraded modes only apply once
    // the loop is running.
    let lamp = BleLamp::connect(lamp_config)?;
    Ok(Box::new(lamp))
}

#[cfg(not(feature = "ble"))]
fn build_light(_config: &RunnerConfig) -> Result<Box<dyn LightGateway>> {
    Ok(Box::new(mood_gateways::console::ConsoleLight))
}

#[cfg(feature = "audio")]
fn build_audio(config: &RunnerConfig) -> Result<Box<dyn AudioGateway>> {
    use mood_gateways::player::RodioPlayer;

    let player = RodioPlayer::open(config.music_dir.clone())?;
    Ok(Box::new(player))
}

#[cfg(not(feature = "audio"))]
fn build_audio(_config: &RunnerConfig) -> Result<Box<dyn AudioGateway>> {
    Ok(Box::new(mood_gateways::console::ConsoleAudio::default()))
}

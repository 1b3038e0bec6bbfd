// THEORY:
// The camera loop: the only part of the system that touches frames. Each
// iteration reads one frame, classifies every Nth one (the frame-skip
// cadence), pushes the result through the pipeline, and forwards confirmed
// transitions to the actuator bank. The frames in between are display-only;
// the committed state simply persists.
//
// The loop is single-threaded and synchronous on purpose: there is exactly
// one writer and one reader of the pipeline state, both in the same
// iteration. A slow actuator call stalls the next sample, nothing more.

use crate::config::RunnerConfig;
use mood_engine::core_modules::actuator_map;
use mood_engine::pipeline::{EmotionClassifier, MoodPipeline, Report};
use mood_gateways::ActuatorBank;
use opencv::{
    core::{Point, Scalar},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::time::Instant;
use tracing::{info, warn};

const WINDOW_NAME: &str = "Mood Lamp";
const QUIT_KEY: i32 = 'q' as i32;

pub fn run(
    config: &RunnerConfig,
    classifier: &mut dyn EmotionClassifier,
    pipeline: &mut MoodPipeline,
    bank: &mut ActuatorBank,
) -> anyhow::Result<()> {
    // --- 1. Camera Initialization (fatal if unavailable) ---
    let mut cap = VideoCapture::new(0, videoio::CAP_ANY)?;
    cap.set(videoio::CAP_PROP_FRAME_WIDTH, config.camera_width as f64)?;
    cap.set(videoio::CAP_PROP_FRAME_HEIGHT, config.camera_height as f64)?;
    if !cap.is_opened()? {
        anyhow::bail!("camera device 0 could not be opened");
    }
    info!(
        width = config.camera_width,
        height = config.camera_height,
        frame_skip = config.frame_skip,
        "camera loop starting; press 'q' to quit"
    );

    // --- 2. Main Processing Loop ---
    let frame_skip = config.frame_skip.max(1);
    let started = Instant::now();
    let mut frame = Mat::default();
    let mut frame_count: u64 = 0;
    loop {
        if !cap.read(&mut frame)? || frame.empty() {
            warn!("camera frame could not be read, stopping");
            break;
        }
        frame_count += 1;

        // --- 3. Sampled Classification ---
        // Only every Nth frame is classified; the rest reuse the committed
        // state untouched.
        if frame_count % frame_skip == 0 {
            let mut rgb_frame = Mat::default();
            imgproc::cvt_color(&frame, &mut rgb_frame, imgproc::COLOR_BGR2RGB, 0)?;
            let buffer = rgb_frame.data_bytes()?;

            // A classifier failure degrades to an empty detection list; the
            // pipeline reads that as no signal.
            let detections = match classifier.detect(buffer) {
                Ok(detections) => detections,
                Err(err) => {
                    warn!(%err, "classifier failed for this frame");
                    Vec::new()
                }
            };

            if let Report::Transition(data) = pipeline.observe(&detections) {
                bank.apply(&data);
            }
        }

        // --- 4. Overlay ---
        if let Some(mood) = pipeline.committed_mood() {
            let light = actuator_map::light_for(mood);
            draw_label(&mut frame, &format!("Mood: {mood}"), 40, 1.0)?;
            draw_label(&mut frame, &format!("Light: {}%", light.brightness), 80, 0.8)?;
        }
        let fps = frame_count as f64 / started.elapsed().as_secs_f64().max(0.001);
        draw_label(&mut frame, &format!("FPS: {fps:.0}"), 120, 0.7)?;

        // --- 5. Display & Quit Handling ---
        highgui::imshow(WINDOW_NAME, &frame)?;
        if highgui::wait_key(1)? == QUIT_KEY {
            info!("quit key received");
            break;
        }
    }

    highgui::destroy_all_windows()?;
    Ok(())
}

fn draw_label(frame: &mut Mat, text: &str, y: i32, scale: f64) -> opencv::Result<()> {
    imgproc::put_text(
        frame,
        text,
        Point::new(20, y),
        imgproc::FONT_HERSHEY_SIMPLEX,
        scale,
        Scalar::new(0.0, 255.0, 0.0, 0.0),
        2,
        imgproc::LINE_8,
        false,
    )
}

// THEORY:
// This file is the main entry point for the `mood_engine` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (the gateway crate
// and the `mood_lamp` runner).
//
// The primary goal is to export the `MoodPipeline` and its associated data
// structures (`PipelineConfig`, `Report`, etc.) as the clean, high-level
// interface for the entire stabilization engine. The internal modules
// (`core_modules`) remain public for advanced consumers, but everything a
// typical caller needs is re-exported through `pipeline`.

pub mod core_modules;
pub mod pipeline;

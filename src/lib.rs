//! Synheart Synth - Deterministic synthetic wearable biometrics
//!
//! Synth fabricates physiologically plausible, internally consistent wearable
//! data for a date range from a seed, through a fixed pipeline:
//! base signals → movement → daily calories → session summaries.
//!
//! ## Modules
//!
//! - **Pipeline**: Generate a [`SyntheticBundle`] for an inclusive date range
//! - **Devices**: Serve real or synthetic data behind a uniform device interface
//! - **Encoder**: Flatten bundles into JSON payloads

pub mod calories;
pub mod config;
pub mod devices;
pub mod encoder;
pub mod error;
pub mod movement;
pub mod pipeline;
pub mod range;
pub mod sessions;
pub mod types;
pub mod vitals;

#[cfg(feature = "cli")]
pub mod logging;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::{DeviceConfig, SynthConfig};
pub use devices::{BiostrapEvo, DataType, Device, DeviceData};
pub use encoder::BundleEncoder;
pub use error::SynthError;
pub use pipeline::{generate, SyntheticGenerator};
pub use range::DateRange;
pub use types::{SampleKey, SyntheticBundle};

/// Synth version embedded in all payloads
pub const SYNTH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for payloads
pub const PRODUCER_NAME: &str = "synheart-synth";

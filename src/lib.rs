//! Adaptive calibration and zonal press detection for a velostat
//! pressure-sensor matrix.
//!
//! The crate owns the per-sensor low/high/threshold calibration state, the
//! drift-tolerant adaptive recalibration, and the spatial-zone voting that
//! turns a grid of boolean detections into four directional press signals.
//! Multiplexer addressing, ADC sampling and real sleeps stay behind the
//! [`ChannelReader`] and [`embedded_hal::delay::DelayNs`] seams, so the whole
//! engine runs deterministically on the host.

#![cfg_attr(not(test), no_std)]

pub mod calibrate;
pub mod config;
pub mod detect;
pub mod engine;
pub mod store;
pub mod trigger;
pub mod types;
pub mod zones;

pub use config::{PadConfig, Zone};
pub use engine::PadEngine;
pub use store::CalibrationStore;
pub use trigger::RecalibrationTrigger;
pub use types::{ChannelReader, PressVector, RawSample};

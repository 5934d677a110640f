//! Low-baseline calibration and threshold derivation.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::config::{PadConfig, MAX_SENSORS};
use crate::store::CalibrationStore;
use crate::types::ChannelReader;

/// Samples every sensor and rebuilds its resting-state low baseline.
///
/// Samples are spaced so that the whole `samples x sensors` pass fits the
/// configured wall-time budget. Each per-sensor average is validated against
/// the configured ceiling; an out-of-range average is a locally recovered
/// fault (the cell's baseline is forced to 0 and a diagnostic is logged) so
/// one bad sensor cannot abort calibration for the rest.
///
/// Idempotent; rerun on every recalibration. Reader failures propagate.
pub fn calibrate_low<R, D>(
    store: &mut CalibrationStore,
    config: &PadConfig,
    reader: &mut R,
    delay: &mut D,
) -> Result<(), R::Error>
where
    R: ChannelReader,
    D: DelayNs,
{
    let sample_delay_us = config.sample_delay_us();
    let mut sums: Vec<u32, MAX_SENSORS> = Vec::new();
    sums.resize(store.sensor_count(), 0)
        .expect("store geometry fits capacity");

    for row in 0..store.rows() {
        for col in 0..store.cols() {
            for _ in 0..config.calibration_samples {
                let raw = reader.read(row, col)?;
                store.set_current(row, col, raw as u32);
                let index = store.index(row, col);
                sums[index] += raw as u32;
                delay.delay_us(sample_delay_us);
            }
        }
    }

    for row in 0..store.rows() {
        for col in 0..store.cols() {
            let index = store.index(row, col);
            let average = sums[index] / config.calibration_samples;
            if average > config.average_ceiling {
                log::warn!(
                    "calibration: average out of range row={} col={} average={} ceiling={}",
                    row,
                    col,
                    average,
                    config.average_ceiling
                );
                store.set_low(row, col, 0);
            } else {
                store.set_low(row, col, average + config.drift_offset);
            }
        }
    }

    Ok(())
}

/// Recomputes one sensor's decision threshold from its current low/high pair:
/// `threshold = low + (high - low) * percent / 100`, truncated integer math.
///
/// An inverted span (high below low) is clamped to the low baseline when the
/// configuration asks for it; otherwise the raw formula result is kept,
/// floored at zero for storage.
pub fn recalibrate_threshold(
    store: &mut CalibrationStore,
    config: &PadConfig,
    row: usize,
    col: usize,
) {
    let low = store.low(row, col) as i64;
    let high = store.high(row, col) as i64;
    let raw = low + (high - low) * config.threshold_percent as i64 / 100;

    let threshold = if high < low && config.clamp_inverted_span {
        log::warn!(
            "threshold: inverted span row={} col={} low={} high={}",
            row,
            col,
            low,
            high
        );
        low
    } else {
        raw.max(0)
    };

    store.set_threshold(row, col, threshold as u32);
}

//! Per-cycle press detection over the full matrix.

use crate::calibrate::recalibrate_threshold;
use crate::config::PadConfig;
use crate::store::CalibrationStore;
use crate::types::ChannelReader;

/// Runs one full poll pass.
///
/// Every cell gets a fresh raw sample and detection flag. When a sample
/// exceeds the cell's running maximum, the high baseline advances and the
/// threshold is rederived; this is the only path that moves high/threshold
/// between resets, so sensitivity self-tunes upward and never back down
/// except through an explicit recalibration.
pub fn detect_presses<R>(
    store: &mut CalibrationStore,
    config: &PadConfig,
    reader: &mut R,
) -> Result<(), R::Error>
where
    R: ChannelReader,
{
    for row in 0..store.rows() {
        for col in 0..store.cols() {
            let raw = reader.read(row, col)? as u32;
            store.set_current(row, col, raw);

            if raw > store.threshold(row, col) {
                if raw > store.high(row, col) {
                    store.set_high(row, col, raw);
                    recalibrate_threshold(store, config, row, col);
                }
                store.set_detection(row, col, true);
            } else {
                store.set_detection(row, col, false);
            }
        }
    }

    Ok(())
}

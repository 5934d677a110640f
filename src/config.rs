//! Tunable constants for the pad geometry and calibration behavior.

/// Reference mat geometry.
pub const SENSOR_ROWS: usize = 12;
pub const SENSOR_COLS: usize = 8;

/// Grid capacity ceiling; `rows * cols` of any configuration must fit.
pub const MAX_SENSORS: usize = 256;

pub const CALIBRATION_SAMPLES: u32 = 3;
pub const CALIBRATION_BUDGET_US: u32 = 3_000_000;
/// Added on top of the measured resting average to absorb drift and noise.
pub const CALIBRATION_DRIFT_OFFSET: u32 = 5;
pub const CALIBRATION_AVERAGE_CEILING: u32 = 65_535;
/// Threshold sits this far (percent) from the low baseline toward the high.
pub const THRESHOLD_PERCENT: u32 = 40;
pub const RECALIBRATION_SETTLE_US: u32 = 1_000_000;
pub const IDLE_DELAY_US: u32 = 100_000;

/// One directional region of the mat. Row/col bounds are half-open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Zone {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
    /// Active cell count must strictly exceed this to register a press.
    pub min_votes: usize,
}

impl Zone {
    pub const fn new(
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
        min_votes: usize,
    ) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
            min_votes,
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_start..self.row_end).contains(&row)
            && (self.col_start..self.col_end).contains(&col)
    }
}

// Hand-tuned to the reference 12x8 mat; the up/down regions are larger than
// left/right, hence the asymmetric vote requirement.
pub const UP_ZONE: Zone = Zone::new(0, 4, 2, 6, 4);
pub const RIGHT_ZONE: Zone = Zone::new(4, 8, 5, 8, 3);
pub const DOWN_ZONE: Zone = Zone::new(8, 12, 2, 6, 4);
pub const LEFT_ZONE: Zone = Zone::new(4, 8, 0, 3, 3);

/// Complete engine configuration. Defaults match the reference hardware.
#[derive(Clone, Copy, Debug)]
pub struct PadConfig {
    pub rows: usize,
    pub cols: usize,
    /// Samples accumulated per sensor during low-baseline calibration.
    pub calibration_samples: u32,
    /// Wall-time budget for one full calibration pass, microseconds.
    pub calibration_budget_us: u32,
    pub drift_offset: u32,
    /// Calibration averages above this are treated as faults.
    pub average_ceiling: u32,
    pub threshold_percent: u32,
    /// Keep thresholds at or above the low baseline when a transient high
    /// reading inverts the span. Disable to reproduce the raw reference
    /// formula.
    pub clamp_inverted_span: bool,
    /// Hold time after a recalibration completes, microseconds.
    pub settle_us: u32,
    /// End-of-cycle delay in the cooperative run loop, microseconds.
    pub idle_delay_us: u32,
    /// Emit order: up, right, down, left.
    pub zones: [Zone; 4],
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            rows: SENSOR_ROWS,
            cols: SENSOR_COLS,
            calibration_samples: CALIBRATION_SAMPLES,
            calibration_budget_us: CALIBRATION_BUDGET_US,
            drift_offset: CALIBRATION_DRIFT_OFFSET,
            average_ceiling: CALIBRATION_AVERAGE_CEILING,
            threshold_percent: THRESHOLD_PERCENT,
            clamp_inverted_span: true,
            settle_us: RECALIBRATION_SETTLE_US,
            idle_delay_us: IDLE_DELAY_US,
            zones: [UP_ZONE, RIGHT_ZONE, DOWN_ZONE, LEFT_ZONE],
        }
    }
}

impl PadConfig {
    pub fn sensor_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Spacing between individual calibration samples so the whole pass fits
    /// the configured budget.
    pub(crate) fn sample_delay_us(&self) -> u32 {
        let total_samples = self.calibration_samples as u64 * self.sensor_count() as u64;
        if total_samples == 0 {
            return 0;
        }
        (self.calibration_budget_us as u64 / total_samples) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_sample_spacing_fills_budget() {
        let config = PadConfig::default();
        // 3 s across 3 samples x 96 sensors.
        assert_eq!(config.sample_delay_us(), 3_000_000 / (3 * 96));
    }

    #[test]
    fn zone_bounds_are_half_open() {
        assert!(UP_ZONE.contains(0, 2));
        assert!(UP_ZONE.contains(3, 5));
        assert!(!UP_ZONE.contains(4, 2));
        assert!(!UP_ZONE.contains(0, 6));
    }

    #[test]
    fn reference_zones_do_not_overlap_in_columns_within_shared_rows() {
        for row in 4..8 {
            for col in 0..SENSOR_COLS {
                let in_left = LEFT_ZONE.contains(row, col);
                let in_right = RIGHT_ZONE.contains(row, col);
                assert!(!(in_left && in_right), "row {row} col {col}");
            }
        }
    }
}

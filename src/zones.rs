//! Zonal vote aggregation over the detection grid.

use crate::config::PadConfig;
use crate::store::CalibrationStore;
use crate::types::PressVector;

/// Translates the detection grid into the directional press vector.
///
/// Each configured zone counts its active cells and registers a press when
/// the count strictly exceeds the zone's vote requirement. Majority-style
/// voting over a region absorbs single-sensor noise and partial foot contact
/// without per-sensor hysteresis. Pure function of the detection grid.
pub fn aggregate_zones(store: &CalibrationStore, config: &PadConfig) -> PressVector {
    let [up, right, down, left] = &config.zones;

    PressVector {
        up: count_votes(store, up) > up.min_votes,
        right: count_votes(store, right) > right.min_votes,
        down: count_votes(store, down) > down.min_votes,
        left: count_votes(store, left) > left.min_votes,
        reserved: false,
    }
}

fn count_votes(store: &CalibrationStore, zone: &crate::config::Zone) -> usize {
    let mut votes = 0;
    for row in zone.row_start..zone.row_end {
        for col in zone.col_start..zone.col_end {
            if store.detection(row, col) {
                votes += 1;
            }
        }
    }
    votes
}

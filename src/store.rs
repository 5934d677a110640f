//! Calibration grids for the sensor matrix.
//!
//! Pure storage: five parallel grids over one row-major index space, plus a
//! byte-record snapshot of the four calibration grids. No derived
//! computation lives here.

use heapless::Vec;

use crate::config::MAX_SENSORS;

const SNAPSHOT_MAGIC: u32 = 0x5645_4C50; // "VELP"
const SNAPSHOT_VERSION: u8 = 1;
const SNAPSHOT_HEADER_LEN: usize = 7;
const SNAPSHOT_GRIDS: usize = 4;

/// Largest snapshot record for the configured capacity.
pub const SNAPSHOT_MAX_LEN: usize = SNAPSHOT_HEADER_LEN + MAX_SENSORS * SNAPSHOT_GRIDS * 4 + 1;

/// The sole flattening rule; every grid access goes through here.
#[inline]
fn flat_index(rows: usize, cols: usize, row: usize, col: usize) -> usize {
    assert!(
        row < rows && col < cols,
        "sensor index out of range: ({row}, {col}) on a {rows}x{cols} grid"
    );
    row * cols + col
}

pub struct CalibrationStore {
    rows: usize,
    cols: usize,
    low: Vec<u32, MAX_SENSORS>,
    high: Vec<u32, MAX_SENSORS>,
    threshold: Vec<u32, MAX_SENSORS>,
    current: Vec<u32, MAX_SENSORS>,
    detection: Vec<bool, MAX_SENSORS>,
}

impl CalibrationStore {
    /// Allocates all grids zero-filled.
    ///
    /// Panics when `rows * cols` is zero or exceeds [`MAX_SENSORS`].
    pub fn new(rows: usize, cols: usize) -> Self {
        let count = rows * cols;
        assert!(
            count > 0 && count <= MAX_SENSORS,
            "unsupported grid geometry {rows}x{cols}"
        );

        let mut low = Vec::new();
        let mut high = Vec::new();
        let mut threshold = Vec::new();
        let mut current = Vec::new();
        let mut detection = Vec::new();
        low.resize(count, 0).expect("capacity checked above");
        high.resize(count, 0).expect("capacity checked above");
        threshold.resize(count, 0).expect("capacity checked above");
        current.resize(count, 0).expect("capacity checked above");
        detection.resize(count, false).expect("capacity checked above");

        Self {
            rows,
            cols,
            low,
            high,
            threshold,
            current,
            detection,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn sensor_count(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub(crate) fn index(&self, row: usize, col: usize) -> usize {
        flat_index(self.rows, self.cols, row, col)
    }

    pub fn low(&self, row: usize, col: usize) -> u32 {
        self.low[self.index(row, col)]
    }

    pub fn set_low(&mut self, row: usize, col: usize, value: u32) {
        let index = self.index(row, col);
        self.low[index] = value;
    }

    pub fn high(&self, row: usize, col: usize) -> u32 {
        self.high[self.index(row, col)]
    }

    pub fn set_high(&mut self, row: usize, col: usize, value: u32) {
        let index = self.index(row, col);
        self.high[index] = value;
    }

    pub fn threshold(&self, row: usize, col: usize) -> u32 {
        self.threshold[self.index(row, col)]
    }

    pub fn set_threshold(&mut self, row: usize, col: usize, value: u32) {
        let index = self.index(row, col);
        self.threshold[index] = value;
    }

    pub fn current(&self, row: usize, col: usize) -> u32 {
        self.current[self.index(row, col)]
    }

    pub fn set_current(&mut self, row: usize, col: usize, value: u32) {
        let index = self.index(row, col);
        self.current[index] = value;
    }

    pub fn detection(&self, row: usize, col: usize) -> bool {
        self.detection[self.index(row, col)]
    }

    pub fn set_detection(&mut self, row: usize, col: usize, value: bool) {
        let index = self.index(row, col);
        self.detection[index] = value;
    }

    /// Zeroes the adaptive grids (high + threshold) after a recalibration
    /// request. Low baselines, current samples and detections are left for
    /// the next passes to overwrite.
    pub fn reset_adaptive(&mut self) {
        self.high.iter_mut().for_each(|cell| *cell = 0);
        self.threshold.iter_mut().for_each(|cell| *cell = 0);
    }

    /// Record length for this geometry.
    pub fn snapshot_len(&self) -> usize {
        SNAPSHOT_HEADER_LEN + self.sensor_count() * SNAPSHOT_GRIDS * 4 + 1
    }

    /// Encodes the four calibration grids (low, high, threshold, current)
    /// into `out`. Detections are transient and not captured. Returns the
    /// record length, or `None` when `out` is too small.
    pub fn save_snapshot(&self, out: &mut [u8]) -> Option<usize> {
        let len = self.snapshot_len();
        if out.len() < len {
            return None;
        }

        out[0..4].copy_from_slice(&SNAPSHOT_MAGIC.to_le_bytes());
        out[4] = SNAPSHOT_VERSION;
        out[5] = self.rows as u8;
        out[6] = self.cols as u8;

        let mut offset = SNAPSHOT_HEADER_LEN;
        for grid in [&self.low, &self.high, &self.threshold, &self.current] {
            for &value in grid.iter() {
                out[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
                offset += 4;
            }
        }
        out[offset] = checksum8(&out[..offset]);

        Some(len)
    }

    /// Restores the four calibration grids from a record produced by
    /// [`save_snapshot`](Self::save_snapshot). Rejects records with a foreign
    /// magic, version or geometry, or a failed checksum. Detections are left
    /// untouched.
    pub fn load_snapshot(&mut self, bytes: &[u8]) -> Option<()> {
        let len = self.snapshot_len();
        if bytes.len() < len {
            return None;
        }
        if u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) != SNAPSHOT_MAGIC {
            return None;
        }
        if bytes[4] != SNAPSHOT_VERSION {
            return None;
        }
        if bytes[5] as usize != self.rows || bytes[6] as usize != self.cols {
            return None;
        }
        if bytes[len - 1] != checksum8(&bytes[..len - 1]) {
            return None;
        }

        let mut offset = SNAPSHOT_HEADER_LEN;
        for grid in [
            &mut self.low,
            &mut self.high,
            &mut self.threshold,
            &mut self.current,
        ] {
            for cell in grid.iter_mut() {
                *cell = u32::from_le_bytes([
                    bytes[offset],
                    bytes[offset + 1],
                    bytes[offset + 2],
                    bytes[offset + 3],
                ]);
                offset += 4;
            }
        }

        Some(())
    }
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0xA5u8;
    for &byte in bytes {
        acc = acc.rotate_left(3) ^ byte;
    }
    acc
}

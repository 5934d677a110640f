//! Shared types at the engine boundary.

/// One raw ADC sample as delivered by the hardware shim.
pub type RawSample = u16;

/// Capability to select and sample a single sensor.
///
/// Implementations own the multiplexer address computation and any settling
/// required so the returned value reflects exactly the requested sensor, with
/// no cross-talk from a previous selection. A bus or ADC fault must surface
/// as `Err`, never as a fabricated zero reading.
pub trait ChannelReader {
    type Error;

    fn read(&mut self, row: usize, col: usize) -> Result<RawSample, Self::Error>;
}

/// Directional output of one poll cycle.
///
/// Field order matches the emit order of the original pad protocol:
/// up, right, down, left, then a reserved slot that is always false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PressVector {
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub left: bool,
    pub reserved: bool,
}

impl PressVector {
    pub const fn none() -> Self {
        Self {
            up: false,
            right: false,
            down: false,
            left: false,
            reserved: false,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.right || self.down || self.left
    }
}

impl From<PressVector> for (bool, bool, bool, bool, bool) {
    fn from(vector: PressVector) -> Self {
        (
            vector.up,
            vector.right,
            vector.down,
            vector.left,
            vector.reserved,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_order_is_up_right_down_left_reserved() {
        let vector = PressVector {
            up: true,
            right: false,
            down: true,
            left: false,
            reserved: false,
        };
        let tuple: (bool, bool, bool, bool, bool) = vector.into();
        assert_eq!(tuple, (true, false, true, false, false));
    }

    #[test]
    fn none_reports_no_activity() {
        assert!(!PressVector::none().any());
    }
}

//! End-to-end poll-loop scenarios against the public API.

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use velopad::{ChannelReader, PadConfig, PadEngine, PressVector};

struct MatSimulator {
    resting: u16,
    pressed: Vec<(usize, usize)>,
    pressure: u16,
}

impl MatSimulator {
    fn new(resting: u16) -> Self {
        Self {
            resting,
            pressed: Vec::new(),
            pressure: 0,
        }
    }

    fn press(&mut self, cells: &[(usize, usize)], pressure: u16) {
        self.pressed = cells.to_vec();
        self.pressure = pressure;
    }

    fn release(&mut self) {
        self.pressed.clear();
    }
}

impl ChannelReader for MatSimulator {
    type Error = Infallible;

    fn read(&mut self, row: usize, col: usize) -> Result<u16, Infallible> {
        if self.pressed.contains(&(row, col)) {
            Ok(self.pressure)
        } else {
            Ok(self.resting)
        }
    }
}

/// Lets the run-loop test inject presses from the emit callback while the
/// engine holds the reader.
struct SharedMat(Rc<RefCell<MatSimulator>>);

impl ChannelReader for SharedMat {
    type Error = Infallible;

    fn read(&mut self, row: usize, col: usize) -> Result<u16, Infallible> {
        self.0.borrow_mut().read(row, col)
    }
}

struct InstantDelay;

impl DelayNs for InstantDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn primed_engine(mat: &mut MatSimulator) -> PadEngine {
    let mut engine = PadEngine::default();
    engine.calibrate(mat, &mut InstantDelay).unwrap();
    // First pass seeds high/threshold from resting readings.
    let _ = engine.poll_cycle(mat, &mut InstantDelay, true).unwrap();
    engine
}

#[test]
fn five_up_zone_cells_press_up_but_four_do_not() {
    let mut mat = MatSimulator::new(120);
    let mut engine = primed_engine(&mut mat);

    mat.press(&[(0, 2), (0, 3), (1, 2), (1, 3)], 900);
    let vector = engine.poll_cycle(&mut mat, &mut InstantDelay, true).unwrap();
    assert!(!vector.up, "four votes must not satisfy a strict > 4");

    mat.press(&[(0, 2), (0, 3), (1, 2), (1, 3), (2, 4)], 900);
    let vector = engine.poll_cycle(&mut mat, &mut InstantDelay, true).unwrap();
    let tuple: (bool, bool, bool, bool, bool) = vector.into();
    assert_eq!(tuple, (true, false, false, false, false));
}

#[test]
fn stomp_then_release_then_lighter_press_still_registers() {
    let mut mat = MatSimulator::new(120);
    let mut engine = primed_engine(&mut mat);
    let left_cells = [(4, 0), (4, 1), (5, 0), (5, 1)];

    mat.press(&left_cells, 1000);
    assert!(engine
        .poll_cycle(&mut mat, &mut InstantDelay, true)
        .unwrap()
        .left);

    mat.release();
    assert_eq!(
        engine.poll_cycle(&mut mat, &mut InstantDelay, true).unwrap(),
        PressVector::none()
    );

    // Threshold learned from the stomp: 125 + 0.4 * (1000 - 125) = 475.
    // A lighter press still clears it.
    mat.press(&left_cells, 600);
    assert!(engine
        .poll_cycle(&mut mat, &mut InstantDelay, true)
        .unwrap()
        .left);
}

#[test]
fn reset_signal_rewinds_the_engine_to_a_cold_start() {
    let mut mat = MatSimulator::new(120);
    let mut engine = primed_engine(&mut mat);

    mat.press(&[(8, 2)], 950);
    let _ = engine.poll_cycle(&mut mat, &mut InstantDelay, true).unwrap();
    assert_eq!(engine.store().high(8, 2), 950);

    // Hold the active-low reset for one cycle while the mat is quiet.
    mat.release();
    let _ = engine
        .poll_cycle(&mut mat, &mut InstantDelay, false)
        .unwrap();

    // Adaptive state rewound: the cycle after the reset saw only resting
    // samples, so the learned maximum is the resting level again.
    assert_eq!(engine.store().low(8, 2), 125);
    assert_eq!(engine.store().high(8, 2), 120);

    // And the engine relearns presses exactly like a cold system.
    mat.press(&[(8, 2), (8, 3), (9, 2), (9, 3), (10, 4)], 900);
    assert!(engine
        .poll_cycle(&mut mat, &mut InstantDelay, true)
        .unwrap()
        .down);
}

#[test]
fn run_loop_reports_a_press_sequence_in_order() {
    let mat = Rc::new(RefCell::new(MatSimulator::new(120)));
    let mut reader = SharedMat(Rc::clone(&mat));
    let mut engine = PadEngine::new(PadConfig::default());

    let mut cycles = 0u32;
    let mut saw_right = false;
    engine
        .run(
            &mut reader,
            &mut InstantDelay,
            || true,
            |vector| {
                cycles += 1;
                match cycles {
                    // Cycle 1 is the threshold-priming pass.
                    2 => {
                        assert_eq!(vector, PressVector::none());
                        mat.borrow_mut().press(&[(4, 5), (4, 6), (5, 5), (5, 6)], 800);
                        true
                    }
                    3 => {
                        saw_right = vector.right && !vector.up && !vector.down && !vector.left;
                        false
                    }
                    _ => true,
                }
            },
        )
        .unwrap();

    assert_eq!(cycles, 3);
    assert!(saw_right);
}

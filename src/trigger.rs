//! Recalibration trigger state machine.
//!
//! A two-state machine (idle / recalibrating) ticked once per poll cycle with
//! the decoded reset-input state. It never touches the grids itself; it only
//! requests work through the dispatch context, and the engine performs the
//! blocking recalibration before the detector pass of the same cycle.

use statig::{blocking::IntoStateMachineExt as _, prelude::*};

#[derive(Clone, Copy, Debug)]
enum TriggerEvent {
    Tick { reset_active: bool },
}

#[derive(Clone, Copy, Debug, Default)]
struct TriggerActions {
    recalibrate: bool,
}

pub struct RecalibrationTrigger {
    machine: statig::blocking::StateMachine<TriggerHsm>,
}

impl Default for RecalibrationTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl RecalibrationTrigger {
    pub fn new() -> Self {
        Self {
            machine: TriggerHsm.state_machine(),
        }
    }

    /// Feeds one poll cycle's reset state. Returns true when this cycle must
    /// run a full recalibration before polling sensors.
    pub fn tick(&mut self, reset_active: bool) -> bool {
        let mut actions = TriggerActions::default();
        self.machine
            .handle_with_context(&TriggerEvent::Tick { reset_active }, &mut actions);
        actions.recalibrate
    }

    pub fn is_recalibrating(&self) -> bool {
        matches!(self.machine.state(), State::Recalibrating {})
    }
}

struct TriggerHsm;

#[state_machine(initial = "State::idle()")]
impl TriggerHsm {
    #[state]
    fn idle(
        &mut self,
        context: &mut TriggerActions,
        event: &TriggerEvent,
    ) -> Outcome<State> {
        match event {
            TriggerEvent::Tick { reset_active: true } => {
                context.recalibrate = true;
                Transition(State::recalibrating())
            }
            TriggerEvent::Tick {
                reset_active: false,
            } => Handled,
        }
    }

    #[state]
    fn recalibrating(
        &mut self,
        context: &mut TriggerActions,
        event: &TriggerEvent,
    ) -> Outcome<State> {
        match event {
            // A held reset line keeps forcing full recalibration passes,
            // matching the level-triggered reference behavior.
            TriggerEvent::Tick { reset_active: true } => {
                context.recalibrate = true;
                Handled
            }
            TriggerEvent::Tick {
                reset_active: false,
            } => Transition(State::idle()),
        }
    }
}

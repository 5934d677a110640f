//! Poll-cycle orchestration: reset trigger, detector pass, zone voting.

use embedded_hal::delay::DelayNs;

use crate::calibrate::calibrate_low;
use crate::config::PadConfig;
use crate::detect::detect_presses;
use crate::store::CalibrationStore;
use crate::trigger::RecalibrationTrigger;
use crate::types::{ChannelReader, PressVector};
use crate::zones::aggregate_zones;

/// Owns all grid state and drives the fixed per-cycle sequence:
/// reset check, optional blocking recalibration, one detector pass, zone
/// vote. Single logical thread; recalibration always runs to completion
/// before the detector touches the grids again.
pub struct PadEngine {
    store: CalibrationStore,
    config: PadConfig,
    trigger: RecalibrationTrigger,
}

impl Default for PadEngine {
    fn default() -> Self {
        Self::new(PadConfig::default())
    }
}

impl PadEngine {
    pub fn new(config: PadConfig) -> Self {
        Self {
            store: CalibrationStore::new(config.rows, config.cols),
            config,
            trigger: RecalibrationTrigger::new(),
        }
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    pub fn store(&self) -> &CalibrationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CalibrationStore {
        &mut self.store
    }

    /// Initial low-baseline pass; run once before the poll loop starts.
    pub fn calibrate<R, D>(&mut self, reader: &mut R, delay: &mut D) -> Result<(), R::Error>
    where
        R: ChannelReader,
        D: DelayNs,
    {
        calibrate_low(&mut self.store, &self.config, reader, delay)
    }

    /// Runs one cooperative cycle and returns the directional press vector.
    ///
    /// `reset_level` is the raw reset-input level; the line is pulled up and
    /// reads logic low while the button is pressed.
    pub fn poll_cycle<R, D>(
        &mut self,
        reader: &mut R,
        delay: &mut D,
        reset_level: bool,
    ) -> Result<PressVector, R::Error>
    where
        R: ChannelReader,
        D: DelayNs,
    {
        let reset_active = !reset_level;
        if self.trigger.tick(reset_active) {
            self.recalibrate(reader, delay)?;
        }

        detect_presses(&mut self.store, &self.config, reader)?;
        Ok(aggregate_zones(&self.store, &self.config))
    }

    /// Drives the loop at the configured idle cadence until `emit` returns
    /// false. All waiting goes through `delay`, so tests can run the loop
    /// without real time passing.
    pub fn run<R, D, L, F>(
        &mut self,
        reader: &mut R,
        delay: &mut D,
        mut reset_level: L,
        mut emit: F,
    ) -> Result<(), R::Error>
    where
        R: ChannelReader,
        D: DelayNs,
        L: FnMut() -> bool,
        F: FnMut(PressVector) -> bool,
    {
        self.calibrate(reader, delay)?;

        loop {
            let vector = self.poll_cycle(reader, delay, reset_level())?;
            if !emit(vector) {
                return Ok(());
            }
            delay.delay_us(self.config.idle_delay_us);
        }
    }

    fn recalibrate<R, D>(&mut self, reader: &mut R, delay: &mut D) -> Result<(), R::Error>
    where
        R: ChannelReader,
        D: DelayNs,
    {
        log::info!("recalibration: start");
        self.store.reset_adaptive();
        calibrate_low(&mut self.store, &self.config, reader, delay)?;
        // Settle before the pad goes live again.
        delay.delay_us(self.config.settle_us);
        log::info!("recalibration: done");
        Ok(())
    }
}

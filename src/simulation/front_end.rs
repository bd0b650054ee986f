use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use super::signal::SignalSource;
use crate::config::TimebaseConfig;
use crate::counter::{PrescalerRatio, TickOutcome, WindowRegisters};
use crate::error::{MeterError, Result};
use crate::hardware::{ButtonInput, ButtonState, PrescalerHardware, SignalInput};

/// Imperfections of the simulated board
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Real CPU oscillator rate; defaults to the corrected nominal clock,
    /// which makes the calibration constant exact
    pub oscillator_hz: Option<f64>,
    /// Standard deviation of the per-window input frequency error, in ppm
    pub jitter_ppm: f64,
    pub seed: Option<u64>,
    /// Sleep one tick period per tick instead of running flat out
    pub realtime: bool,
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_jitter_ppm(mut self, jitter_ppm: f64) -> Self {
        self.jitter_ppm = jitter_ppm;
        self
    }

    pub fn with_oscillator_hz(mut self, oscillator_hz: f64) -> Self {
        self.oscillator_hz = Some(oscillator_hz);
        self
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Divider select lines, shared with the front end that reads them
#[derive(Debug, Clone)]
pub struct SimulatedPrescaler {
    mask: Arc<AtomicU8>,
}

impl PrescalerHardware for SimulatedPrescaler {
    fn apply_mask(&mut self, mask: u8) {
        self.mask.store(mask, Ordering::Relaxed);
    }
}

/// Buttons held in one position
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedButtons(pub ButtonState);

impl ButtonInput for FixedButtons {
    fn read(&mut self) -> ButtonState {
        self.0
    }
}

/// Input stage, external divider and interrupt sources of the meter
///
/// Each window is replayed on a worker thread that plays the role of the
/// interrupt context: per timebase period it clocks the edges that passed
/// the divider into the event counter, then raises the timebase tick.
pub struct SimulatedFrontEnd {
    signal: SignalSource,
    config: SimulationConfig,
    tick_period_secs: f64,
    mask: Arc<AtomicU8>,
    rng: ChaCha8Rng,
    worker: Option<JoinHandle<()>>,
}

impl SimulatedFrontEnd {
    /// Create the front end and the divider port wired to it
    pub fn new(
        timebase: &TimebaseConfig,
        config: SimulationConfig,
        signal: SignalSource,
    ) -> Result<(Self, SimulatedPrescaler)> {
        let oscillator_hz = config
            .oscillator_hz
            .unwrap_or(timebase.cpu_clock_hz * timebase.clock_correction);
        if !(oscillator_hz > 0.0) {
            return Err(MeterError::Config(format!(
                "oscillator_hz must be positive, got {}",
                oscillator_hz
            )));
        }
        if !(config.jitter_ppm >= 0.0) {
            return Err(MeterError::Config(format!(
                "jitter_ppm must be non-negative, got {}",
                config.jitter_ppm
            )));
        }

        let tick_period_secs =
            f64::from(timebase.timer_prescale) * f64::from(timebase.compare_top) / oscillator_hz;
        let mask = Arc::new(AtomicU8::new(PrescalerRatio::FINEST.mask()));
        let rng = create_rng(config.seed);

        let front_end = Self {
            signal,
            config,
            tick_period_secs,
            mask: Arc::clone(&mask),
            rng,
            worker: None,
        };
        Ok((front_end, SimulatedPrescaler { mask }))
    }

    pub fn signal(&self) -> SignalSource {
        self.signal
    }

    /// Change the applied signal; takes effect from the next window
    pub fn set_signal(&mut self, signal: SignalSource) {
        self.signal = signal;
    }

    /// Ratio selected by the divider lines right now
    pub fn wired_ratio(&self) -> Result<PrescalerRatio> {
        let mask = self.mask.load(Ordering::Relaxed);
        PrescalerRatio::from_mask(mask).ok_or_else(|| {
            MeterError::SignalInput(format!("divider mask {:#05b} is not wired", mask))
        })
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Simulated interrupt worker panicked");
            }
        }
    }
}

impl SignalInput for SimulatedFrontEnd {
    fn start_window(&mut self, registers: &Arc<WindowRegisters>) -> Result<()> {
        self.join_worker();

        let ratio = self.wired_ratio()?;
        let jitter = Normal::new(0.0, self.config.jitter_ppm * 1e-6)
            .map_err(|e| MeterError::Config(format!("jitter: {}", e)))?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.rng.random::<u64>());
        let input_hz = self.signal.frequency_hz() * (1.0 + jitter.sample(&mut rng));
        let edges_per_tick =
            (input_hz / f64::from(ratio.division_factor()) * self.tick_period_secs).max(0.0);
        // Edges already part-way through their period when the window opens
        let mut phase: f64 = rng.random::<f64>();

        let pacing = self
            .config
            .realtime
            .then(|| Duration::from_secs_f64(self.tick_period_secs));
        let registers = Arc::clone(registers);

        log::trace!(
            "Simulating {:.3} Hz through /{} ({:.3} edges per tick)",
            input_hz,
            ratio.division_factor(),
            edges_per_tick
        );

        let worker = thread::Builder::new()
            .name("sim-interrupts".into())
            .spawn(move || {
                loop {
                    phase += edges_per_tick;
                    let edges = phase.floor();
                    phase -= edges;
                    registers.counter().clock(edges as u32);

                    if let Some(period) = pacing {
                        thread::sleep(period);
                    }

                    if registers.on_timebase_tick() != TickOutcome::Counting {
                        break;
                    }
                }
            })?;
        self.worker = Some(worker);
        Ok(())
    }
}

impl Drop for SimulatedFrontEnd {
    fn drop(&mut self) {
        self.join_worker();
    }
}

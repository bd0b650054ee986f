use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use lcmeter::MeterConfig;
use lcmeter::hardware::ButtonState;
use lcmeter::output::{LineBuffer, OutputFormat, create_formatter};
use lcmeter::simulation::{
    FixedButtons, LcTank, SignalSource, SimulationConfig, settle_and_measure,
    simulated_instrument,
};

#[derive(Parser, Debug)]
#[command(name = "lcmeter")]
#[command(about = "Auto-ranging frequency counter and LC meter on a simulated front end", long_about = None)]
struct Args {
    /// Meter configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Measure an external signal at this frequency in Hz
    #[arg(short, long)]
    frequency: Option<f64>,

    /// Unknown inductor in henries, in series with the fixture inductance
    #[arg(short = 'L', long, conflicts_with = "frequency")]
    inductor: Option<f64>,

    /// Unknown capacitor in farads, in parallel with the reference capacitor
    #[arg(short = 'C', long, conflicts_with_all = ["frequency", "inductor"])]
    capacitor: Option<f64>,

    /// Real fixture inductance in henries (default: nominal from the config)
    #[arg(long)]
    fixture_inductance: Option<f64>,

    /// Buttons held down (default follows the measured element)
    #[arg(short, long, value_enum)]
    buttons: Option<Buttons>,

    /// Self-calibrate against the empty fixture before measuring
    #[arg(long)]
    calibrate: bool,

    /// Number of display cycles, 0 to run until interrupted
    #[arg(short = 'n', long, default_value_t = 8)]
    cycles: u32,

    /// Input frequency error per window, standard deviation in ppm
    #[arg(long, default_value_t = 0.0)]
    jitter_ppm: f64,

    /// Seed for the simulated signal
    #[arg(long)]
    seed: Option<u64>,

    /// Pace the simulation at the real timebase rate
    #[arg(long)]
    realtime: bool,

    /// Output format: text, lcd, json, csv
    #[arg(long, value_enum, default_value = "lcd")]
    format: OutputFormat,

    /// Include raw counts in text output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Buttons {
    None,
    A,
    B,
    Both,
}

impl Buttons {
    fn state(self) -> ButtonState {
        match self {
            Self::None => ButtonState::new(false, false),
            Self::A => ButtonState::new(true, false),
            Self::B => ButtonState::new(false, true),
            Self::Both => ButtonState::new(true, true),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MeterConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => MeterConfig::default(),
    };

    let fixture = LcTank::empty(
        args.fixture_inductance
            .unwrap_or(config.lc.nominal_parasitic_inductance),
        config.lc.reference_capacitance,
    );
    let (signal, default_buttons) = match (args.frequency, args.inductor, args.capacitor) {
        (Some(hz), _, _) => (SignalSource::Fixed { hz }, Buttons::None),
        (None, Some(l), _) => (SignalSource::Tank(fixture.with_inductor(l)), Buttons::A),
        (None, None, Some(c)) => (SignalSource::Tank(fixture.with_capacitor(c)), Buttons::B),
        (None, None, None) => (SignalSource::Tank(fixture), Buttons::None),
    };
    let buttons = args.buttons.unwrap_or(default_buttons).state();

    let sim = SimulationConfig {
        oscillator_hz: None,
        jitter_ppm: args.jitter_ppm,
        seed: args.seed,
        realtime: args.realtime,
    };

    println!("=== LC Meter ===");
    println!(
        "Timebase: {} ticks of {:.1} ms per window, calibration {:.9} Hz/count",
        config.timebase.ticks_per_window,
        config.timebase.tick_period_secs() * 1e3,
        config.timebase.calibration_constant()
    );
    println!(
        "Reference capacitor: {:e} F, nominal fixture inductance: {:e} H",
        config.lc.reference_capacitance, config.lc.nominal_parasitic_inductance
    );
    println!("Input: {:.3} Hz", signal.frequency_hz());
    println!();

    let first_signal = if args.calibrate {
        SignalSource::Tank(fixture)
    } else {
        signal
    };
    let mut instrument = simulated_instrument(&config, sim, first_signal)?;

    if args.calibrate {
        settle_and_measure(&mut instrument, ButtonState::new(true, true))?;
        println!(
            "Calibrated fixture inductance: {:e} H",
            instrument.lc().parasitic_inductance()
        );
        instrument.signal_input_mut().set_signal(signal);
    }

    let formatter = create_formatter(args.format, args.verbose);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    let mut buttons = FixedButtons(buttons);
    let mut display = LineBuffer::new();
    let mut cycle = 0;
    while args.cycles == 0 || cycle < args.cycles {
        let reading = instrument.step(&mut buttons, &mut display)?;
        log::debug!("Display: [{}] [{}]", display.line(0), display.line(1));
        println!("{}", formatter.format(&reading));
        cycle += 1;
    }

    Ok(())
}

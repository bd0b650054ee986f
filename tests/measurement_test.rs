mod test_fixtures;

use lcmeter::MeterConfig;
use lcmeter::estimation::MeasurementMode;
use lcmeter::simulation::{MeasurementError, SimulationConfig, settle_and_measure};

use test_fixtures::{NONE, fixed, frequency_tolerance, seeded_instrument};

#[test]
fn test_settled_frequency_across_ranges() {
    for hz in [1_000.0, 75_000.0, 1.0e6, 25.0e6, 50.0e6, 145.0e6, 500.0e6] {
        let mut meter = seeded_instrument(fixed(hz), 11);
        let reading = settle_and_measure(&mut meter, NONE).expect("Measurement failed");

        let tolerance = frequency_tolerance(reading.division_factor());
        let error = (reading.derived.value - hz).abs();
        assert!(
            error <= tolerance,
            "{} Hz measured as {} Hz at /{} (error {}, tolerance {})",
            hz,
            reading.derived.value,
            reading.division_factor(),
            error,
            tolerance
        );
        assert_eq!(reading.derived.mode, MeasurementMode::Frequency);
        assert!(!reading.derived.unreliable);
    }
}

#[test]
fn test_auto_range_choice() {
    // The /128 probe over an eighth window counts about f * 9.77e-4 edges
    let cases = [
        (1.0e6, 2),     // 977
        (25.0e6, 4),    // 24_424
        (50.0e6, 128),  // 48_848: no row matches, probe ratio kept
        (70.0e6, 8),    // 68_387: one overflow, low 2_851
        (145.0e6, 16),  // 141_656: two overflows, low 10_584
        (500.0e6, 128), // 488_450
    ];

    for (hz, expected_division) in cases {
        let mut meter = seeded_instrument(fixed(hz), 5);
        let reading = meter.run_cycle(NONE).expect("Measurement failed");
        assert_eq!(
            reading.division_factor(),
            expected_division,
            "Unexpected divider for {} Hz",
            hz
        );
        assert_eq!(meter.active_ratio().division_factor(), expected_division);
    }
}

#[test]
fn test_range_follows_signal_change() {
    let mut meter = seeded_instrument(fixed(500.0e6), 9);
    let reading = meter.run_cycle(NONE).unwrap();
    assert_eq!(reading.division_factor(), 128);

    meter.signal_input_mut().set_signal(fixed(2.0e6));
    let reading = meter.run_cycle(NONE).unwrap();
    assert_eq!(reading.division_factor(), 2);
}

#[test]
fn test_startup_transient_averages_with_zeros() {
    let hz = 1.0e6;
    let mut meter = seeded_instrument(fixed(hz), 21);

    let values: Vec<f64> = (0..4)
        .map(|_| meter.run_cycle(NONE).unwrap().derived.value)
        .collect();

    // After k+1 cycles only k+1 slots hold real samples
    for (k, value) in values.iter().enumerate() {
        let expected = hz * (k + 1) as f64 / 4.0;
        assert!(
            (value - expected).abs() <= 10.0,
            "cycle {}: expected ~{}, got {}",
            k,
            expected,
            value
        );
    }
}

#[test]
fn test_no_signal_reads_zero() {
    let mut meter = seeded_instrument(fixed(0.0), 2);
    let reading = settle_and_measure(&mut meter, NONE).unwrap();

    assert_eq!(reading.division_factor(), 2);
    assert_eq!(reading.estimate.snapshot.count(), 0);
    assert_eq!(reading.derived.value, 0.0);
}

#[test]
fn test_jitter_averages_out() {
    let error = MeasurementError::for_frequency(
        &MeterConfig::default(),
        SimulationConfig::default()
            .with_seed(77)
            .with_jitter_ppm(20.0),
        10.0e6,
    )
    .unwrap();

    assert!(
        error.relative_error.abs() < 1.0e-4,
        "relative error {} too large",
        error.relative_error
    );
}

#[test]
fn test_slow_oscillator_reads_high() {
    // A CPU clock 100 ppm slow stretches every window by the same amount
    let config = MeterConfig::default();
    let nominal = config.timebase.cpu_clock_hz * config.timebase.clock_correction;
    let error = MeasurementError::for_frequency(
        &config,
        SimulationConfig::default()
            .with_seed(4)
            .with_oscillator_hz(nominal * (1.0 - 100e-6)),
        5.0e6,
    )
    .unwrap();

    assert!(
        (error.relative_error - 100e-6).abs() < 5e-6,
        "relative error {}",
        error.relative_error
    );
}

//! Hardware-derived constants for the measurement engine
//!
//! These values describe the external divider wiring and the empirically
//! tuned auto-range boundaries. They are tied to the default timebase in
//! [`crate::config::TimebaseConfig`]; changing the timebase period or the
//! clock correction invalidates [`AUTO_RANGE_BOUNDS`].

/// Number of slots in the frequency moving average.
pub const AVERAGING_SLOTS: usize = 4;

/// Divider table as `(hardware mask, exponent shift)`, indexed by selector id.
///
/// The mask is the 3-bit pattern driven onto the divider select lines; the
/// shift is the power of two the selected divider output divides by. The
/// two columns differ because the divider part was swapped without
/// rewiring the board.
pub const PRESCALER_TABLE: [(u8, u8); 8] = [
    (0x0, 1),  // Qa, up to 20 MHz (2 Hz step)
    (0x1, 2),  // Qb, up to 40 MHz (4 Hz step)
    (0x4, 3),  // Qc, up to 80 MHz (8 Hz step)
    (0x2, 4),  // Qd, up to 160 MHz (16 Hz step)
    (0x3, 7),  // Qg, up to 1280 MHz (128 Hz step)
    (0x5, 8),  // Qh
    (0x6, 9),  // Qi
    (0x7, 10), // Qj
];

/// Selector used for the rough range-finding window.
pub const PROBE_SELECTOR: u8 = 4;

/// Upper bounds on the 1/8 second probe count, as
/// `(max high word, low word limit, selector)`.
///
/// Evaluated in order; the first row whose high word is `<=` the bound and
/// whose low word is `<` the limit wins. Counts that match no row keep the
/// probe selector.
pub const AUTO_RANGE_BOUNDS: [(u16, u16, u8); 4] = [
    (0, 15625, 0), // ~18 MHz
    (0, 37000, 1), // ~38 MHz
    (1, 10635, 2), // ~78 MHz
    (2, 22000, 3), // ~156.7 MHz
];

use serde::Serialize;

use crate::constants::{PRESCALER_TABLE, PROBE_SELECTOR};
use crate::error::{MeterError, Result};
use crate::hardware::PrescalerHardware;

/// One entry of the external divider table
///
/// Only constructible from the table, so the selector id and the hardware
/// mask always belong together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PrescalerRatio {
    selector: u8,
    mask: u8,
    shift: u8,
}

impl PrescalerRatio {
    /// Finest ratio (divide by 2), selected at power-up
    pub const FINEST: Self = Self::from_table(0);

    /// Ratio used for the rough range-finding window (divide by 128)
    pub const PROBE: Self = Self::from_table(PROBE_SELECTOR);

    const fn from_table(selector: u8) -> Self {
        let (mask, shift) = PRESCALER_TABLE[selector as usize];
        Self {
            selector,
            mask,
            shift,
        }
    }

    pub fn from_selector(selector: u8) -> Result<Self> {
        if usize::from(selector) < PRESCALER_TABLE.len() {
            Ok(Self::from_table(selector))
        } else {
            Err(MeterError::InvalidSelector(selector))
        }
    }

    /// Look up the ratio wired to a divider mask
    pub fn from_mask(mask: u8) -> Option<Self> {
        Self::all().find(|ratio| ratio.mask == mask)
    }

    /// Every ratio in selector order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..PRESCALER_TABLE.len() as u8).map(Self::from_table)
    }

    pub fn selector(&self) -> u8 {
        self.selector
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }

    /// Input edges per counted edge (`2^shift`)
    pub fn division_factor(&self) -> u32 {
        1 << self.shift()
    }
}

/// Owns the divider hardware and remembers which ratio is active
pub struct PrescalerController<H> {
    hardware: H,
    active: PrescalerRatio,
}

impl<H: PrescalerHardware> PrescalerController<H> {
    pub fn new(mut hardware: H) -> Self {
        hardware.apply_mask(PrescalerRatio::FINEST.mask());
        Self {
            hardware,
            active: PrescalerRatio::FINEST,
        }
    }

    pub fn select(&mut self, ratio: PrescalerRatio) {
        self.hardware.apply_mask(ratio.mask());
        self.active = ratio;
    }

    pub fn active(&self) -> PrescalerRatio {
        self.active
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }
}

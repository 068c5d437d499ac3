//! Magma composition and derived rheology
//!
//! Silica, water and gas content plus temperature and pressure decide how
//! runny the magma is, how hard it pushes upward, and whether it can still
//! flow at all.

use serde::{Deserialize, Serialize};

use crate::config::{LayerProperties, MagmaConfig};

pub const MAX_SILICA: f32 = 1.0;
pub const MAX_WATER: f32 = 0.15;
pub const MAX_GAS: f32 = 0.25;
pub const MAX_TEMPERATURE: f32 = 1300.0;
pub const MAX_PRESSURE: f32 = 2.0;

pub const MIN_VISCOSITY: f32 = 0.01;
pub const MAX_VISCOSITY: f32 = 2.0;

/// Temperatures below this are treated as this in the Arrhenius term
const ARRHENIUS_FLOOR: f32 = 400.0;
const ARRHENIUS_ACTIVATION: f32 = 8000.0;

const TEMPERATURE_RELAX_RATE: f32 = 0.02;
const PRESSURE_RELAX_RATE: f32 = 0.05;
const DEGAS_PRESSURE: f32 = 0.5;
const DEGAS_RATE: f32 = 0.001;
const DEHYDRATE_TEMPERATURE: f32 = 900.0;
const DEHYDRATE_RATE: f32 = 0.0005;

/// Coarse heat band used for tinting the magma and its trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TemperatureBand {
    Cold,
    Warm,
    Hot,
    VeryHot,
    WhiteHot,
}

impl TemperatureBand {
    pub fn from_temperature(temperature: f32) -> Self {
        if temperature < 600.0 {
            TemperatureBand::Cold
        } else if temperature < 800.0 {
            TemperatureBand::Warm
        } else if temperature < 1000.0 {
            TemperatureBand::Hot
        } else if temperature < 1200.0 {
            TemperatureBand::VeryHot
        } else {
            TemperatureBand::WhiteHot
        }
    }
}

/// Chemical and thermodynamic state of the magma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub silica: f32,
    pub water: f32,
    pub gas: f32,
    pub temperature: f32,
    pub pressure: f32,
    melting_point: f32,
    min_pressure: f32,
    buoyancy_factor: f32,
}

impl Composition {
    /// Spawn composition from the magma tuning
    pub fn new(config: &MagmaConfig) -> Self {
        let mut composition = Self {
            silica: config.silica,
            water: config.water,
            gas: config.gas,
            temperature: config.temperature,
            pressure: config.pressure,
            melting_point: config.melting_point,
            min_pressure: config.min_pressure,
            buoyancy_factor: config.buoyancy_factor,
        };
        composition.clamp();
        composition
    }

    /// Build a composition with explicit values (clamped), default thresholds
    pub fn with_values(silica: f32, water: f32, gas: f32, temperature: f32, pressure: f32) -> Self {
        let mut composition = Self::new(&MagmaConfig::default());
        composition.silica = silica;
        composition.water = water;
        composition.gas = gas;
        composition.temperature = temperature;
        composition.pressure = pressure;
        composition.clamp();
        composition
    }

    /// Effective viscosity in [0.01, 2.0]
    pub fn viscosity(&self) -> f32 {
        let v = self.raw_viscosity();
        if v.is_nan() {
            return MAX_VISCOSITY;
        }
        v.clamp(MIN_VISCOSITY, MAX_VISCOSITY)
    }

    /// Silica, water and Arrhenius heat terms before clamping
    fn raw_viscosity(&self) -> f32 {
        let silica_term = 2.0_f32.powf(self.silica * 5.0);
        let water_term = 1.0 / (1.0 + self.water * 20.0);
        let heat_term = (ARRHENIUS_ACTIVATION / self.temperature.max(ARRHENIUS_FLOOR)).exp();
        silica_term * water_term * heat_term
    }

    /// Upward drive from dissolved gas; grows as pressure drops
    pub fn buoyancy(&self) -> f32 {
        self.gas * (2.0 - self.pressure) * self.buoyancy_factor
    }

    /// False once the magma is too cold or too decompressed to flow
    pub fn can_melt(&self) -> bool {
        self.temperature > self.melting_point && self.pressure > self.min_pressure
    }

    pub fn temperature_band(&self) -> TemperatureBand {
        TemperatureBand::from_temperature(self.temperature)
    }

    /// Relax toward the surrounding layer and lose volatiles
    pub fn update_from_environment(&mut self, layer: &LayerProperties, dt: f32) {
        let temp_rate = (TEMPERATURE_RELAX_RATE * dt).clamp(0.0, 1.0);
        let pressure_rate = (PRESSURE_RELAX_RATE * dt).clamp(0.0, 1.0);

        self.temperature += (layer.temperature - self.temperature) * temp_rate;
        self.pressure += (layer.pressure - self.pressure) * pressure_rate;

        // Degassing at low pressure
        if self.pressure < DEGAS_PRESSURE {
            self.gas -= DEGAS_RATE * dt;
        }
        if self.temperature > DEHYDRATE_TEMPERATURE {
            self.water -= DEHYDRATE_RATE * dt;
        }

        self.clamp();
    }

    pub fn add_water(&mut self, amount: f32) {
        if amount.is_finite() {
            self.water += amount;
            self.clamp();
        }
    }

    pub fn add_gas(&mut self, amount: f32) {
        if amount.is_finite() {
            self.gas += amount;
            self.clamp();
        }
    }

    pub fn add_heat(&mut self, amount: f32) {
        if amount.is_finite() {
            self.temperature += amount;
            self.clamp();
        }
    }

    pub fn increase_pressure(&mut self, amount: f32) {
        if amount.is_finite() {
            self.pressure += amount;
            self.clamp();
        }
    }

    pub fn cool(&mut self, amount: f32) {
        if amount.is_finite() {
            self.temperature -= amount;
            self.clamp();
        }
    }

    fn clamp(&mut self) {
        self.silica = clamp_finite(self.silica, MAX_SILICA);
        self.water = clamp_finite(self.water, MAX_WATER);
        self.gas = clamp_finite(self.gas, MAX_GAS);
        self.temperature = clamp_finite(self.temperature, MAX_TEMPERATURE);
        self.pressure = clamp_finite(self.pressure, MAX_PRESSURE);
    }
}

/// Clamp to [0, max]; NaN collapses to 0
#[inline]
fn clamp_finite(value: f32, max: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, max) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mantle() -> LayerProperties {
        LayerProperties {
            viscosity: 0.05,
            pressure: 1.5,
            temperature: 1200.0,
            density: 0.8,
        }
    }

    #[test]
    fn test_spawn_values() {
        let c = Composition::new(&MagmaConfig::default());
        assert_eq!(c.silica, 0.5);
        assert_eq!(c.water, 0.02);
        assert_eq!(c.gas, 0.01);
        assert_eq!(c.temperature, 1000.0);
        assert_eq!(c.pressure, 1.0);
        assert!(c.can_melt());
    }

    #[test]
    fn test_mantle_equilibration_moves_toward_layer() {
        let mut c = Composition::new(&MagmaConfig::default());
        let layer = mantle();

        let mut last_temp = c.temperature;
        let mut last_pressure = c.pressure;
        for _ in 0..200 {
            c.update_from_environment(&layer, 1.0);
            assert!(c.temperature >= last_temp);
            assert!(c.pressure >= last_pressure);
            assert!(c.temperature <= layer.temperature);
            assert!(c.pressure <= layer.pressure);
            last_temp = c.temperature;
            last_pressure = c.pressure;
        }
    }

    #[test]
    fn test_single_mantle_step_values() {
        let mut c = Composition::new(&MagmaConfig::default());
        c.update_from_environment(&mantle(), 1.0);
        assert!((c.temperature - 1004.0).abs() < 1e-3);
        assert!((c.pressure - 1.025).abs() < 1e-5);
        // Hot enough to lose water
        assert!((c.water - 0.0195).abs() < 1e-6);
        // Pressure high, gas kept
        assert_eq!(c.gas, 0.01);
    }

    #[test]
    fn test_degassing_below_half_pressure() {
        let mut c = Composition::with_values(0.5, 0.02, 0.1, 800.0, 0.45);
        let surface = LayerProperties {
            viscosity: 0.4,
            pressure: 0.3,
            temperature: 400.0,
            density: 1.5,
        };
        c.update_from_environment(&surface, 1.0);
        assert!(c.gas < 0.1);
    }

    #[test]
    fn test_can_melt_truth_table() {
        assert!(Composition::with_values(0.5, 0.0, 0.0, 601.0, 0.41).can_melt());
        assert!(!Composition::with_values(0.5, 0.0, 0.0, 600.0, 1.0).can_melt());
        assert!(!Composition::with_values(0.5, 0.0, 0.0, 1000.0, 0.4).can_melt());
        assert!(!Composition::with_values(0.5, 0.0, 0.0, 500.0, 0.2).can_melt());
    }

    #[test]
    fn test_additions_saturate_at_caps() {
        let mut c = Composition::new(&MagmaConfig::default());
        for _ in 0..10 {
            c.add_water(1.0);
            c.add_gas(1.0);
            c.add_heat(1000.0);
            c.increase_pressure(5.0);
        }
        assert_eq!(c.water, MAX_WATER);
        assert_eq!(c.gas, MAX_GAS);
        assert_eq!(c.temperature, MAX_TEMPERATURE);
        assert_eq!(c.pressure, MAX_PRESSURE);
    }

    #[test]
    fn test_zero_addition_is_noop() {
        let mut c = Composition::new(&MagmaConfig::default());
        let before = c.clone();
        c.add_water(0.0);
        c.add_gas(0.0);
        c.add_heat(0.0);
        c.increase_pressure(0.0);
        assert_eq!(c, before);
    }

    #[test]
    fn test_non_finite_amount_ignored() {
        let mut c = Composition::new(&MagmaConfig::default());
        let before = c.clone();
        c.add_heat(f32::NAN);
        c.add_gas(f32::INFINITY);
        assert_eq!(c, before);
    }

    #[test]
    fn test_gas_pocket_amount_clamps() {
        let mut c = Composition::new(&MagmaConfig::default());
        c.add_gas(0.3);
        assert_eq!(c.gas, 0.25);
    }

    #[test]
    fn test_buoyancy_rises_with_gas_and_low_pressure() {
        let low = Composition::with_values(0.5, 0.02, 0.05, 1000.0, 1.0);
        let more_gas = Composition::with_values(0.5, 0.02, 0.2, 1000.0, 1.0);
        let less_pressure = Composition::with_values(0.5, 0.02, 0.05, 1000.0, 0.5);
        assert!(more_gas.buoyancy() > low.buoyancy());
        assert!(less_pressure.buoyancy() > low.buoyancy());
        assert!((low.buoyancy() - 0.05 * 1.0 * 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_temperature_bands() {
        let band = TemperatureBand::from_temperature;
        // Below the melting point reads as the coldest band
        assert_eq!(band(550.0), TemperatureBand::Cold);
        assert_eq!(band(599.9), TemperatureBand::Cold);
        assert_eq!(band(600.0), TemperatureBand::Warm);
        assert_eq!(band(650.0), TemperatureBand::Warm);
        assert_eq!(band(800.0), TemperatureBand::Hot);
        assert_eq!(band(950.0), TemperatureBand::Hot);
        assert_eq!(band(1000.0), TemperatureBand::VeryHot);
        assert_eq!(band(1150.0), TemperatureBand::VeryHot);
        assert_eq!(band(1200.0), TemperatureBand::WhiteHot);
    }

    proptest! {
        #[test]
        fn viscosity_stays_in_bounds(
            silica in 0.0f32..=1.0,
            water in 0.0f32..=0.15,
            gas in 0.0f32..=0.25,
            temperature in 0.0f32..=1300.0,
            pressure in 0.0f32..=2.0,
        ) {
            let v = Composition::with_values(silica, water, gas, temperature, pressure).viscosity();
            prop_assert!(v.is_finite());
            prop_assert!((MIN_VISCOSITY..=MAX_VISCOSITY).contains(&v));
        }

        #[test]
        fn viscosity_monotonic(
            silica in 0.0f32..=0.9,
            water in 0.0f32..=0.1,
            temperature in 400.0f32..=1200.0,
            step in 0.01f32..=0.05,
        ) {
            // Compare before clamping; in-range compositions all clamp to the max
            let raw = |s, w, t| Composition::with_values(s, w, 0.0, t, 1.0).raw_viscosity();
            let base = raw(silica, water, temperature);
            prop_assert!(raw(silica + step, water, temperature) > base);
            prop_assert!(raw(silica, water + step, temperature) < base);
            prop_assert!(raw(silica, water, temperature + step * 1000.0) < base);
        }

        #[test]
        fn can_melt_matches_thresholds(
            temperature in 0.0f32..=1300.0,
            pressure in 0.0f32..=2.0,
        ) {
            let c = Composition::with_values(0.5, 0.02, 0.01, temperature, pressure);
            prop_assert_eq!(c.can_melt(), temperature > 600.0 && pressure > 0.4);
        }
    }
}

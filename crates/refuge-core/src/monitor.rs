//! Simulated environment sensors for a single shelter.
//!
//! Every tick random-walks temperature, humidity and CO₂ inside fixed bounds
//! and moves occupancy by a small step. CO₂ also follows occupancy: arrivals
//! push it up, departures let it fall. Air quality is derived from CO₂.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;

pub const TEMP_MIN: f64 = 18.0;
pub const TEMP_MAX: f64 = 28.0;
pub const HUMIDITY_MIN: f64 = 30.0;
pub const HUMIDITY_MAX: f64 = 70.0;
pub const CO2_MIN: f64 = 400.0;
pub const CO2_MAX: f64 = 2000.0;
pub const OCCUPANCY_MAX: u32 = 50;

const TEMP_STEP: f64 = 0.5;
const HUMIDITY_STEP: f64 = 3.0;
const CO2_STEP: f64 = 50.0;
const CO2_PER_ARRIVAL: f64 = 20.0;
const CO2_PER_DEPARTURE: f64 = 10.0;

/// Air quality bands derived from CO₂ concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AirQuality {
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

impl AirQuality {
    pub fn from_co2(ppm: u32) -> Self {
        match ppm {
            p if p > 1500 => AirQuality::VeryPoor,
            p if p > 1000 => AirQuality::Poor,
            p if p > 700 => AirQuality::Moderate,
            _ => AirQuality::Good,
        }
    }
}

impl fmt::Display for AirQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AirQuality::Good => "good",
            AirQuality::Moderate => "moderate",
            AirQuality::Poor => "poor",
            AirQuality::VeryPoor => "very poor",
        };
        f.write_str(label)
    }
}

/// One sample of the shelter's sensors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentReading {
    /// °C, one decimal
    pub temperature: f64,
    /// Relative humidity, whole percent
    pub humidity: u32,
    pub air_quality: AirQuality,
    pub co2_ppm: u32,
    pub occupancy: u32,
}

/// Random-walk sensor simulator.
#[derive(Debug, Clone)]
pub struct EnvironmentMonitor {
    rng: StdRng,
    reading: EnvironmentReading,
}

impl EnvironmentMonitor {
    /// Start from a random reading drawn inside the bounds.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let co2_ppm = rng.gen_range(CO2_MIN..=CO2_MAX).round() as u32;
        let reading = EnvironmentReading {
            temperature: round1(rng.gen_range(TEMP_MIN..=TEMP_MAX)),
            humidity: rng.gen_range(HUMIDITY_MIN..=HUMIDITY_MAX).round() as u32,
            air_quality: AirQuality::from_co2(co2_ppm),
            co2_ppm,
            occupancy: rng.gen_range(0..=OCCUPANCY_MAX),
        };
        Self { rng, reading }
    }

    pub fn reading(&self) -> EnvironmentReading {
        self.reading
    }

    /// Advance one tick and return the new reading.
    pub fn tick(&mut self) -> EnvironmentReading {
        let prev = self.reading;

        let step: i64 = self.rng.gen_range(-2..=2);
        let occupancy =
            (i64::from(prev.occupancy) + step).clamp(0, i64::from(OCCUPANCY_MAX)) as u32;

        let mut co2 = self.walk(f64::from(prev.co2_ppm), CO2_MIN, CO2_MAX, CO2_STEP);
        if occupancy > prev.occupancy {
            co2 += CO2_PER_ARRIVAL * f64::from(occupancy - prev.occupancy);
        } else if occupancy < prev.occupancy {
            co2 -= CO2_PER_DEPARTURE * f64::from(prev.occupancy - occupancy);
        }
        let co2_ppm = co2.clamp(CO2_MIN, CO2_MAX).round() as u32;

        self.reading = EnvironmentReading {
            temperature: self.walk(prev.temperature, TEMP_MIN, TEMP_MAX, TEMP_STEP),
            humidity: self
                .walk(f64::from(prev.humidity), HUMIDITY_MIN, HUMIDITY_MAX, HUMIDITY_STEP)
                .round() as u32,
            air_quality: AirQuality::from_co2(co2_ppm),
            co2_ppm,
            occupancy,
        };
        self.reading
    }

    fn walk(&mut self, value: f64, min: f64, max: f64, max_change: f64) -> f64 {
        let change = self.rng.gen_range(-max_change..=max_change);
        round1((value + change).clamp(min, max))
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_quality_bands() {
        assert_eq!(AirQuality::from_co2(400), AirQuality::Good);
        assert_eq!(AirQuality::from_co2(700), AirQuality::Good);
        assert_eq!(AirQuality::from_co2(701), AirQuality::Moderate);
        assert_eq!(AirQuality::from_co2(1001), AirQuality::Poor);
        assert_eq!(AirQuality::from_co2(1501), AirQuality::VeryPoor);
    }

    #[test]
    fn readings_stay_in_bounds() {
        let mut monitor = EnvironmentMonitor::new(11);
        for _ in 0..1000 {
            let prev = monitor.reading();
            let r = monitor.tick();
            assert!((TEMP_MIN..=TEMP_MAX).contains(&r.temperature));
            assert!((HUMIDITY_MIN as u32..=HUMIDITY_MAX as u32).contains(&r.humidity));
            assert!((CO2_MIN as u32..=CO2_MAX as u32).contains(&r.co2_ppm));
            assert!(r.occupancy <= OCCUPANCY_MAX);
            assert!(r.occupancy.abs_diff(prev.occupancy) <= 2);
            assert_eq!(r.air_quality, AirQuality::from_co2(r.co2_ppm));
        }
    }

    #[test]
    fn deterministic_for_seed() {
        let mut a = EnvironmentMonitor::new(5);
        let mut b = EnvironmentMonitor::new(5);
        for _ in 0..10 {
            assert_eq!(a.tick(), b.tick());
        }
    }
}

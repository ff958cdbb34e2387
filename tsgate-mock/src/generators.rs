//! Synthetic plant sensors.

use std::f64::consts::PI;

use chrono::{DateTime, Timelike, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use tsgate_core::GatewayError;

use crate::GeneratorRegistry;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn noise(rng: &mut StdRng, range: f64) -> f64 {
    rng.random_range(-range..=range)
}

fn power(_ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    28.0 + noise(rng, 2.0)
}

fn power_setpoint(_ts: DateTime<Utc>, _rng: &mut StdRng) -> f64 {
    30.0
}

fn rod_power(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    power(ts, rng) * 0.33
}

/// Idle overnight, peak during the day shift, reduced in the evening, with a
/// small drift inside each hour.
fn furnace_temperature(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let hour = ts.hour();
    let drift = f64::from(ts.minute()) / 59.0 * 5.0;
    let base = match hour {
        8..=15 => 550.0 + drift,
        16..=19 => 500.0 - drift,
        _ => 425.0,
    };
    round2(base + noise(rng, 2.5)).clamp(380.0, 620.0)
}

/// Daily cosine between 40% and 70%, lowest at 02:00 and highest at 14:00.
fn room_humidity(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let angle = f64::from((ts.hour() + 22) % 24) / 24.0 * 2.0 * PI;
    let (low, high) = (40.0, 70.0);
    let amplitude = (high - low) / 2.0;
    let base = low + amplitude - amplitude * angle.cos();
    round2(base + noise(rng, 1.5)).clamp(0.0, 100.0)
}

fn shift_of(ts: DateTime<Utc>) -> usize {
    match ts.hour() {
        0..=7 => 0,
        8..=15 => 1,
        _ => 2,
    }
}

fn valve_a(_ts: DateTime<Utc>, _rng: &mut StdRng) -> f64 {
    0.0
}

fn valve_b(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let range = [6.0, 4.0, 6.0][shift_of(ts)];
    round2(200.0 + noise(rng, range)).max(200.0)
}

fn valve_c(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let base = [9.1, 9.0, 9.0][shift_of(ts)];
    round2(base + noise(rng, 0.5))
}

fn air_temperature_a(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let range = [90.0, 120.0, 80.0][shift_of(ts)];
    round2(90.0 + noise(rng, range)).min(200.0)
}

fn air_temperature_b(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let base = [200.0, 170.0, 185.0][shift_of(ts)];
    round2(base + noise(rng, 10.0)).min(200.0)
}

fn air_temperature_c(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let base = [70.0, 60.0, 64.0][shift_of(ts)];
    round2(base + noise(rng, 5.0))
}

/// 0 off, 1 on, 2 standby, 3 error. Mostly on between 08:00 and 18:00.
fn device_status(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let roll: f64 = rng.random();
    if (8..18).contains(&ts.hour()) {
        match roll {
            r if r < 0.01 => 3.0,
            r if r < 0.10 => 2.0,
            _ => 1.0,
        }
    } else {
        match roll {
            r if r < 0.005 => 3.0,
            r if r < 0.7 => 0.0,
            _ => 2.0,
        }
    }
}

fn gas_pressure(night: f64, day: f64, range: f64) -> impl Fn(DateTime<Utc>, &mut StdRng) -> f64 {
    move |ts: DateTime<Utc>, rng: &mut StdRng| {
        let base = if ts.hour() < 8 { night } else { day };
        round2(base + noise(rng, range))
    }
}

fn holder_mode(ts: DateTime<Utc>, _rng: &mut StdRng) -> f64 {
    if ts.hour() < 8 { 1.0 } else { 0.0 }
}

/// Holders sink from 200 at midnight to 150 late in the evening.
fn holder_position(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let base = match ts.hour() {
        0..=1 => 200.0,
        2..=3 => 195.0,
        4..=7 => 190.0,
        8..=9 => 185.0,
        10..=11 => 180.0,
        12..=13 => 175.0,
        14..=15 => 170.0,
        16..=17 => 165.0,
        18..=19 => 160.0,
        20..=21 => 155.0,
        _ => 150.0,
    };
    round2(base + noise(rng, 8.0))
}

fn metal_output_intensity(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let base = [0.5, 22.0, 30.0][shift_of(ts)];
    round2(base + noise(rng, 0.5)).max(0.0)
}

/// Release amount per phase of the day: `[early, late night, morning, midday, evening]`.
fn release_amount(levels: [f64; 5]) -> impl Fn(DateTime<Utc>, &mut StdRng) -> f64 {
    move |ts: DateTime<Utc>, rng: &mut StdRng| {
        let base = match ts.hour() {
            0..=2 | 6..=8 => levels[0],
            3..=5 | 15..=23 => levels[1],
            9..=11 => levels[2],
            12..=14 => levels[3],
            _ => levels[4],
        };
        round2(base + noise(rng, 30.0)).max(0.0)
    }
}

fn ring_release(_ts: DateTime<Utc>, _rng: &mut StdRng) -> f64 {
    0.0
}

/// Raised in about one minute out of twenty.
fn ring_raise(_ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    if rng.random_bool(0.05) { 1.0 } else { 0.0 }
}

fn high_voltage(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let base = [184.0, 186.0, 185.0][shift_of(ts)];
    round2(base + noise(rng, 1.0))
}

fn voltage_step(ts: DateTime<Utc>, rng: &mut StdRng) -> f64 {
    let base = [35.0, 37.0, 39.0][shift_of(ts)];
    round2(base + noise(rng, 1.0))
}

impl GeneratorRegistry {
    /// Registry with the smelter plant's sensors.
    ///
    /// Families are registered in file-name order of the digital twin's
    /// generator modules: device status, furnace temperature, gas pressure,
    /// holders, metal output, power, release amounts, rings, room humidity,
    /// ventilation, then voltages.
    ///
    /// # Errors
    /// Only if a built-in pattern fails to compile.
    pub fn plant() -> Result<Self, GatewayError> {
        let mut reg = Self::new();
        reg.register("device_([A-Za-z0-9]+_)?status", device_status)?
            .register("system_state_([0-9]+)", device_status)?
            .register("furnace.*temperature", furnace_temperature)?
            .register("oven_[A-Za-z0-9]+_temp", furnace_temperature)?
            .register("GasPressureUnderFurnaceA", gas_pressure(-80.0, -100.0, 10.0))?
            .register("GasPressureUnderFurnaceB", gas_pressure(-76.0, -95.0, 9.0))?
            .register("GasPressureUnderFurnaceC", gas_pressure(-78.0, -98.0, 9.0))?
            .register("HolderMode[A-C]", holder_mode)?
            .register("CurrentHolderPosition[A-C]", holder_position)?
            .register("MetalOutputIntensity", metal_output_intensity)?
            .register("ActivePower", power)?
            .register("ReactivePower", power)?
            .register("Power[A-C]", rod_power)?
            .register("PowerSetpoint", power_setpoint)?
            .register(
                "ReleaseAmountA",
                release_amount([200.0, 100.0, 300.0, 380.0, 170.0]),
            )?
            .register(
                "ReleaseAmountB",
                release_amount([190.0, 95.0, 295.0, 379.0, 175.0]),
            )?
            .register(
                "ReleaseAmountC",
                release_amount([189.0, 99.0, 280.0, 370.0, 160.0]),
            )?
            .register("UpperRingRelease[A-C]", ring_release)?
            .register("LowerRingRelease[A-C]", ring_release)?
            .register("UpperRingRaise[A-C]", ring_raise)?
            .register("room_([A-Za-z0-9]+_)?humidity", room_humidity)?
            .register("env_sensor_hum", room_humidity)?
            .register("VentialtionValveForMantelA", valve_a)?
            .register("VentialtionValveForMantelB", valve_b)?
            .register("VentialtionValveForMantelC", valve_c)?
            .register("AirTemperatureMantelA", air_temperature_a)?
            .register("AirTemperatureMantelB", air_temperature_b)?
            .register("AirTemperatureMantelC", air_temperature_c)?
            .register("HighVoltage[A-C]", high_voltage)?
            .register("VoltageStep[A-C]", voltage_step)?;
        Ok(reg)
    }
}

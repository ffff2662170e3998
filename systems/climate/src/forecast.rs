//! Seeded seven-day weather forecast derived from current observations.

use data_farm_core::NasaData;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of days covered by a forecast.
pub const FORECAST_DAYS: usize = 7;

const DAY_LABELS: [&str; FORECAST_DAYS] = [
    "Today", "Tomorrow", "Day 3", "Day 4", "Day 5", "Day 6", "Day 7",
];

/// Sky condition expected for a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Clear skies.
    Sunny,
    /// Broken cloud cover.
    PartlyCloudy,
    /// Overcast.
    Cloudy,
    /// Light showers.
    LightRain,
    /// Sustained heavy rainfall.
    HeavyRain,
    /// Convective storms.
    Thunderstorm,
}

impl Condition {
    /// Every condition the generator may draw.
    pub const ALL: [Condition; 6] = [
        Condition::Sunny,
        Condition::PartlyCloudy,
        Condition::Cloudy,
        Condition::LightRain,
        Condition::HeavyRain,
        Condition::Thunderstorm,
    ];

    /// Human readable name of the condition.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::LightRain => "Light Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

/// Farming recommendation attached to a forecast day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Advice {
    /// More than 15 mm of rain.
    HeavyRain,
    /// More than 5 mm of rain.
    LightRain,
    /// Little rain while the maximum exceeds 30 °C.
    DryAndHot,
    /// Maximum above 35 °C.
    ExtremeHeat,
    /// Wind above 25 km/h.
    HighWinds,
    /// Nothing noteworthy.
    Favorable,
}

impl Advice {
    /// Recommendation text shown to the farmer.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::HeavyRain => "Heavy rain expected. Avoid field work and check drainage systems.",
            Self::LightRain => {
                "Light rain forecasted. Good for irrigation, but monitor disease pressure."
            }
            Self::DryAndHot => {
                "Dry and hot conditions. Increase irrigation frequency to prevent stress."
            }
            Self::ExtremeHeat => "Extreme heat warning. Consider shade cloth and increased watering.",
            Self::HighWinds => "High winds expected. Avoid spraying and check for wind damage.",
            Self::Favorable => "Favorable conditions for field work and crop growth.",
        }
    }
}

/// Hazard flagged for a forecast day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Risk {
    /// Standing water from heavy rain.
    Flooding,
    /// Soil compacted by working it wet.
    SoilCompaction,
    /// Fungal disease following rain.
    Disease,
    /// Plants short of water.
    DroughtStress,
    /// Plants overheating.
    HeatStress,
    /// Direct damage from extreme heat.
    CropDamage,
    /// Broken or lodged plants.
    WindDamage,
    /// Sprays carried off target.
    SprayDrift,
    /// Humid air favouring pathogens.
    HighDiseasePressure,
    /// Soil moisture below 30 %.
    LowSoilMoisture,
    /// Soil moisture above 80 %.
    WaterloggedSoil,
}

impl Risk {
    /// Human readable name of the risk.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flooding => "Flooding risk",
            Self::SoilCompaction => "Soil compaction",
            Self::Disease => "Disease risk",
            Self::DroughtStress => "Drought stress",
            Self::HeatStress => "Heat stress",
            Self::CropDamage => "Crop damage",
            Self::WindDamage => "Wind damage",
            Self::SprayDrift => "Spray drift",
            Self::HighDiseasePressure => "High disease pressure",
            Self::LowSoilMoisture => "Low soil moisture",
            Self::WaterloggedSoil => "Waterlogged soil",
        }
    }
}

/// Daily temperature extremes in degrees Celsius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemperatureRange {
    /// Daily minimum.
    pub min: f32,
    /// Daily maximum.
    pub max: f32,
}

/// Forecast for a single day.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastDay {
    /// Relative day label such as "Today" or "Day 4".
    pub label: &'static str,
    /// Expected temperature extremes.
    pub temperature: TemperatureRange,
    /// Expected rainfall in millimetres.
    pub precipitation: f32,
    /// Relative humidity percentage, within [20, 95].
    pub humidity: f32,
    /// Wind speed in km/h.
    pub wind_speed: f32,
    /// Solar irradiance in W/m².
    pub solar_irradiance: f32,
    /// Sky condition.
    pub condition: Condition,
    /// Vegetation index projected for the day, within [0.1, 0.9].
    pub ndvi: f32,
    /// Soil moisture projected for the day, within [0, 100].
    pub soil_moisture: f32,
    /// Recommendation for the day.
    pub advice: Advice,
    /// Hazards flagged for the day.
    pub risks: Vec<Risk>,
}

/// Generates a seven-day forecast anchored on `current` observations.
///
/// Every day is drawn independently around the same baseline, so the same
/// observations and seed always yield the same forecast.
#[must_use]
pub fn generate_forecast(current: &NasaData, seed: u64) -> Vec<ForecastDay> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    DAY_LABELS
        .iter()
        .map(|label| forecast_day(label, current, &mut rng))
        .collect()
}

fn forecast_day(label: &'static str, current: &NasaData, rng: &mut ChaCha8Rng) -> ForecastDay {
    let variation = uniform(rng, -4.0, 4.0);
    let temperature = TemperatureRange {
        min: round(current.temperature + variation - 5.0),
        max: round(current.temperature + variation + 3.0),
    };
    let precipitation = round(current.precipitation + uniform(rng, 0.0, 15.0)).max(0.0);
    let humidity = round(current.relative_humidity + uniform(rng, -10.0, 10.0))
        .min(95.0)
        .max(20.0);
    let wind_speed = round(current.wind_speed + uniform(rng, -5.0, 5.0));
    let solar_irradiance = round(current.solar_irradiance + uniform(rng, -100.0, 100.0));
    let condition = Condition::ALL[rng.gen_range(0..Condition::ALL.len())];

    let mut ndvi = current.ndvi;
    if precipitation > 10.0 {
        ndvi += 0.05;
    }
    if temperature.max > 35.0 {
        ndvi -= 0.1;
    }
    if humidity > 80.0 {
        ndvi -= 0.05;
    }
    let ndvi = round((ndvi.min(0.9).max(0.1)) * 100.0) / 100.0;

    let evaporation = ((temperature.max - 25.0) * 0.5).max(0.0);
    let projected_moisture = (current.soil_moisture + precipitation * 2.0 - evaporation)
        .min(100.0)
        .max(0.0);

    let (advice, mut risks) = assess(precipitation, temperature.max, wind_speed);
    if humidity > 80.0 {
        risks.push(Risk::HighDiseasePressure);
    }
    // Thresholds apply to the projection before it is rounded for display.
    risks.extend(moisture_risk(projected_moisture));
    let soil_moisture = round(projected_moisture);

    ForecastDay {
        label,
        temperature,
        precipitation,
        humidity,
        wind_speed,
        solar_irradiance,
        condition,
        ndvi,
        soil_moisture,
        advice,
        risks,
    }
}

fn assess(precipitation: f32, max_temperature: f32, wind_speed: f32) -> (Advice, Vec<Risk>) {
    if precipitation > 15.0 {
        (Advice::HeavyRain, vec![Risk::Flooding, Risk::SoilCompaction])
    } else if precipitation > 5.0 {
        (Advice::LightRain, vec![Risk::Disease])
    } else if precipitation < 2.0 && max_temperature > 30.0 {
        (
            Advice::DryAndHot,
            vec![Risk::DroughtStress, Risk::HeatStress],
        )
    } else if max_temperature > 35.0 {
        (Advice::ExtremeHeat, vec![Risk::HeatStress, Risk::CropDamage])
    } else if wind_speed > 25.0 {
        (Advice::HighWinds, vec![Risk::WindDamage, Risk::SprayDrift])
    } else {
        (Advice::Favorable, Vec::new())
    }
}

fn moisture_risk(soil_moisture: f32) -> Option<Risk> {
    if soil_moisture < 30.0 {
        Some(Risk::LowSoilMoisture)
    } else if soil_moisture > 80.0 {
        Some(Risk::WaterloggedSoil)
    } else {
        None
    }
}

fn uniform(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    rng.gen_range(low..high)
}

/// Rounds halves toward positive infinity, so -2.5 becomes -2.
fn round(value: f32) -> f32 {
    (value + 0.5).floor()
}

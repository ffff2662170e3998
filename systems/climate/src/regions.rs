//! Canned agricultural regions shown on the global map.

use data_farm_core::NasaData;

/// Agricultural region with representative satellite observations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    /// Stable identifier used on the command line.
    pub id: &'static str,
    /// Display name of the region.
    pub name: &'static str,
    /// Latitude of the region's reference point in degrees.
    pub latitude: f32,
    /// Longitude of the region's reference point in degrees.
    pub longitude: f32,
    /// Representative observations for the region.
    pub data: NasaData,
    /// Climate classification of the region.
    pub climate_zone: &'static str,
    /// Crops that dominate the region's agriculture.
    pub primary_crops: &'static [&'static str],
    /// Challenges farmers in the region face.
    pub challenges: &'static [&'static str],
    /// Satellite missions that observe the region.
    pub missions: &'static [&'static str],
}

/// Every region available on the global map.
pub static REGIONS: [Region; 6] = [
    Region {
        id: "central_valley_usa",
        name: "Central Valley, USA",
        latitude: 36.7378,
        longitude: -119.7871,
        data: NasaData {
            soil_moisture: 45.0,
            temperature: 28.0,
            precipitation: 2.0,
            solar_irradiance: 750.0,
            wind_speed: 12.0,
            ndvi: 0.65,
            relative_humidity: 35.0,
        },
        climate_zone: "Mediterranean",
        primary_crops: &["Almonds", "Grapes", "Tomatoes", "Cotton"],
        challenges: &["Water scarcity", "Heat stress", "Soil salinity"],
        missions: &["SMAP", "MODIS", "Landsat-8"],
    },
    Region {
        id: "kyoto_japan",
        name: "Kyoto Prefecture, Japan",
        latitude: 35.0116,
        longitude: 135.7681,
        data: NasaData {
            soil_moisture: 75.0,
            temperature: 22.0,
            precipitation: 8.0,
            solar_irradiance: 450.0,
            wind_speed: 8.0,
            ndvi: 0.78,
            relative_humidity: 70.0,
        },
        climate_zone: "Temperate",
        primary_crops: &["Rice", "Tea", "Vegetables", "Fruits"],
        challenges: &["Limited land", "Seasonal flooding", "Urban encroachment"],
        missions: &["GCOM-C", "ALOS-2", "MODIS"],
    },
    Region {
        id: "sao_paulo_brazil",
        name: "São Paulo, Brazil",
        latitude: -23.5505,
        longitude: -46.6333,
        data: NasaData {
            soil_moisture: 60.0,
            temperature: 26.0,
            precipitation: 12.0,
            solar_irradiance: 600.0,
            wind_speed: 15.0,
            ndvi: 0.72,
            relative_humidity: 80.0,
        },
        climate_zone: "Tropical",
        primary_crops: &["Sugarcane", "Coffee", "Citrus", "Soybeans"],
        challenges: &["Deforestation", "Soil erosion", "Climate change"],
        missions: &["CBERS-4", "MODIS", "Landsat-8"],
    },
    Region {
        id: "punjab_india",
        name: "Punjab, India",
        latitude: 31.1471,
        longitude: 75.3412,
        data: NasaData {
            soil_moisture: 55.0,
            temperature: 32.0,
            precipitation: 5.0,
            solar_irradiance: 700.0,
            wind_speed: 10.0,
            ndvi: 0.68,
            relative_humidity: 60.0,
        },
        climate_zone: "Semi-arid",
        primary_crops: &["Wheat", "Rice", "Cotton", "Sugarcane"],
        challenges: &["Water depletion", "Soil degradation", "Pesticide overuse"],
        missions: &["RESOURCESAT-2", "MODIS", "Landsat-8"],
    },
    Region {
        id: "netherlands",
        name: "Netherlands",
        latitude: 52.1326,
        longitude: 5.2913,
        data: NasaData {
            soil_moisture: 80.0,
            temperature: 18.0,
            precipitation: 15.0,
            solar_irradiance: 400.0,
            wind_speed: 20.0,
            ndvi: 0.75,
            relative_humidity: 85.0,
        },
        climate_zone: "Temperate Oceanic",
        primary_crops: &["Tulips", "Dairy", "Vegetables", "Flowers"],
        challenges: &["Land scarcity", "Water management", "Climate adaptation"],
        missions: &["Sentinel-2", "MODIS", "Landsat-8"],
    },
    Region {
        id: "australia_murray",
        name: "Murray-Darling Basin, Australia",
        latitude: -34.9285,
        longitude: 138.6007,
        data: NasaData {
            soil_moisture: 35.0,
            temperature: 30.0,
            precipitation: 3.0,
            solar_irradiance: 800.0,
            wind_speed: 18.0,
            ndvi: 0.45,
            relative_humidity: 40.0,
        },
        climate_zone: "Arid",
        primary_crops: &["Wheat", "Cotton", "Citrus", "Grapes"],
        challenges: &["Drought", "Salinity", "Water allocation"],
        missions: &["Landsat-8", "MODIS", "SMAP"],
    },
];

/// Looks up a region by its identifier.
#[must_use]
pub fn find_region(id: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|region| region.id == id)
}

/// Satellite data layer used to color the global map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapLayer {
    /// Vegetation health.
    Ndvi,
    /// Soil moisture percentage.
    Moisture,
    /// Air temperature.
    Temperature,
    /// Daily precipitation.
    Precipitation,
}

/// Coarse classification of a layer value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    /// Above the upper threshold.
    High,
    /// Between the two thresholds.
    Medium,
    /// At or below the lower threshold.
    Low,
}

impl MapLayer {
    /// Every layer in map toolbar order.
    pub const ALL: [MapLayer; 4] = [
        MapLayer::Ndvi,
        MapLayer::Moisture,
        MapLayer::Temperature,
        MapLayer::Precipitation,
    ];

    /// Caption shown next to the active layer.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ndvi => "Vegetation Health (NDVI)",
            Self::Moisture => "Soil Moisture (%)",
            Self::Temperature => "Temperature (°C)",
            Self::Precipitation => "Precipitation (mm)",
        }
    }

    /// Value of this layer within the provided observations.
    #[must_use]
    pub const fn value(self, data: &NasaData) -> f32 {
        match self {
            Self::Ndvi => data.ndvi,
            Self::Moisture => data.soil_moisture,
            Self::Temperature => data.temperature,
            Self::Precipitation => data.precipitation,
        }
    }

    /// Places the observations into a band for this layer.
    #[must_use]
    pub fn classify(self, data: &NasaData) -> Band {
        let (upper, lower) = match self {
            Self::Ndvi => (0.7, 0.5),
            Self::Moisture => (60.0, 40.0),
            Self::Temperature => (30.0, 20.0),
            Self::Precipitation => (10.0, 5.0),
        };

        let value = self.value(data);
        if value > upper {
            Band::High
        } else if value > lower {
            Band::Medium
        } else {
            Band::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_identifiers_are_unique() {
        for (index, region) in REGIONS.iter().enumerate() {
            assert!(REGIONS[index + 1..]
                .iter()
                .all(|other| other.id != region.id));
        }
    }

    #[test]
    fn find_region_resolves_known_identifier() {
        let region = find_region("punjab_india").expect("punjab is catalogued");
        assert_eq!(region.name, "Punjab, India");
        assert!(find_region("atlantis").is_none());
    }

    #[test]
    fn thresholds_are_exclusive() {
        let data = NasaData {
            ndvi: 0.7,
            soil_moisture: 40.0,
            temperature: 30.5,
            precipitation: 5.0,
            ..NasaData::default()
        };
        assert_eq!(MapLayer::Ndvi.classify(&data), Band::Medium);
        assert_eq!(MapLayer::Moisture.classify(&data), Band::Low);
        assert_eq!(MapLayer::Temperature.classify(&data), Band::High);
        assert_eq!(MapLayer::Precipitation.classify(&data), Band::Low);
    }
}

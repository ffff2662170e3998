//! Research lab catalogue of field experiments.

use data_farm_core::Command;

/// Farming practice an experiment investigates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExperimentCategory {
    /// Watering strategies.
    Irrigation,
    /// Nutrient management.
    Fertilization,
    /// Sowing and plant arrangement.
    Planting,
    /// Harvest timing and quality.
    Harvesting,
    /// Long-term soil and climate outcomes.
    Sustainability,
}

impl ExperimentCategory {
    /// Every category in catalogue order.
    pub const ALL: [ExperimentCategory; 5] = [
        ExperimentCategory::Irrigation,
        ExperimentCategory::Fertilization,
        ExperimentCategory::Planting,
        ExperimentCategory::Harvesting,
        ExperimentCategory::Sustainability,
    ];

    /// Human readable name of the category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Irrigation => "Irrigation",
            Self::Fertilization => "Fertilization",
            Self::Planting => "Planting",
            Self::Harvesting => "Harvesting",
            Self::Sustainability => "Sustainability",
        }
    }

    /// Finds a category by its case-insensitive label.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(name))
    }
}

/// Field experiment the farmer can fund from the research lab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Experiment {
    /// Stable identifier used on the command line.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// What the experiment tests.
    pub description: &'static str,
    /// Practice under study.
    pub category: ExperimentCategory,
    /// Days until results arrive.
    pub duration_days: u32,
    /// Money paid up front.
    pub cost: u32,
    /// Material the trial needs.
    pub requirements: &'static [&'static str],
    /// Outcomes the trial is expected to show.
    pub expected_results: &'static [&'static str],
    /// How satellite observations feed the trial.
    pub satellite_use: &'static str,
}

impl Experiment {
    /// World command that funds this experiment.
    #[must_use]
    pub fn start_command(&self) -> Command {
        Command::StartExperiment {
            experiment: self.id,
            cost: self.cost,
            duration_days: self.duration_days,
        }
    }
}

/// Every experiment offered by the research lab.
pub static EXPERIMENTS: [Experiment; 8] = [
    Experiment {
        id: "drip_irrigation",
        name: "Drip Irrigation Optimization",
        description: "Test different drip irrigation patterns to optimize water usage and crop yield.",
        category: ExperimentCategory::Irrigation,
        duration_days: 14,
        cost: 500,
        requirements: &["Tomatoes", "Lettuce", "Soil moisture sensor"],
        expected_results: &[
            "25% water savings",
            "15% yield increase",
            "Reduced disease pressure",
        ],
        satellite_use: "Uses SMAP soil moisture data to optimize irrigation timing",
    },
    Experiment {
        id: "precision_fertilizer",
        name: "Precision Fertilizer Application",
        description: "Apply fertilizers based on NDVI zones to maximize efficiency and reduce waste.",
        category: ExperimentCategory::Fertilization,
        duration_days: 21,
        cost: 750,
        requirements: &["Corn", "Wheat", "NDVI mapping"],
        expected_results: &[
            "30% fertilizer reduction",
            "20% yield increase",
            "Improved soil health",
        ],
        satellite_use: "Uses MODIS NDVI data to create variable rate application maps",
    },
    Experiment {
        id: "cover_crops",
        name: "Cover Crop Integration",
        description: "Study the impact of cover crops on soil health and water retention.",
        category: ExperimentCategory::Sustainability,
        duration_days: 60,
        cost: 300,
        requirements: &["Clover seeds", "Soil testing kit"],
        expected_results: &[
            "Improved soil structure",
            "Reduced erosion",
            "Increased organic matter",
        ],
        satellite_use: "Monitors soil moisture and NDVI changes over time",
    },
    Experiment {
        id: "companion_planting",
        name: "Companion Planting Study",
        description: "Test beneficial plant combinations to improve pest control and yield.",
        category: ExperimentCategory::Planting,
        duration_days: 45,
        cost: 200,
        requirements: &["Tomatoes", "Basil", "Marigolds"],
        expected_results: &[
            "Reduced pest damage",
            "Improved flavor",
            "Better space utilization",
        ],
        satellite_use: "Tracks NDVI patterns to measure plant health interactions",
    },
    Experiment {
        id: "harvest_timing",
        name: "Optimal Harvest Timing",
        description: "Use satellite data to determine the perfect harvest time for maximum quality.",
        category: ExperimentCategory::Harvesting,
        duration_days: 7,
        cost: 150,
        requirements: &["Mature crops", "Quality testing equipment"],
        expected_results: &[
            "Improved crop quality",
            "Better storage life",
            "Higher market value",
        ],
        satellite_use: "Uses NDVI decline patterns to predict optimal harvest timing",
    },
    Experiment {
        id: "carbon_sequestration",
        name: "Carbon Sequestration Study",
        description: "Measure how different farming practices affect carbon storage in soil.",
        category: ExperimentCategory::Sustainability,
        duration_days: 90,
        cost: 1_000,
        requirements: &["Soil carbon analyzer", "Multiple crop types"],
        expected_results: &[
            "Increased soil carbon",
            "Climate benefits",
            "Improved soil fertility",
        ],
        satellite_use: "Uses satellite data to model carbon flux and soil health",
    },
    Experiment {
        id: "drought_resistance",
        name: "Drought-Resistant Varieties",
        description: "Test crop varieties under water stress conditions using controlled irrigation.",
        category: ExperimentCategory::Irrigation,
        duration_days: 30,
        cost: 400,
        requirements: &["Multiple crop varieties", "Water stress simulation"],
        expected_results: &[
            "Identified drought-tolerant varieties",
            "Water use efficiency data",
        ],
        satellite_use: "Uses SMAP data to simulate drought conditions and monitor plant response",
    },
    Experiment {
        id: "organic_fertilizer",
        name: "Organic Fertilizer Comparison",
        description: "Compare the effectiveness of different organic fertilizers on crop growth.",
        category: ExperimentCategory::Fertilization,
        duration_days: 35,
        cost: 350,
        requirements: &["Compost", "Manure", "Fish emulsion", "Testing plots"],
        expected_results: &[
            "Nutrient release patterns",
            "Soil health improvements",
            "Yield comparisons",
        ],
        satellite_use: "Monitors NDVI changes to track nutrient availability and plant response",
    },
];

/// Looks up an experiment by identifier.
#[must_use]
pub fn find_experiment(id: &str) -> Option<&'static Experiment> {
    EXPERIMENTS.iter().find(|experiment| experiment.id == id)
}

/// Experiments in `category`, or the whole catalogue when `None`.
pub fn experiments_in(
    category: Option<ExperimentCategory>,
) -> impl Iterator<Item = &'static Experiment> {
    EXPERIMENTS
        .iter()
        .filter(move |experiment| category.map_or(true, |wanted| experiment.category == wanted))
}

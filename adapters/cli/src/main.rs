#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Data Farm experience.

mod config;
mod script;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use data_farm_core::{Event, NasaData};
use data_farm_rendering::{Color, Presentation, RenderingBackend, Scene};
use data_farm_rendering_macroquad::MacroquadBackend;
use data_farm_system_climate::{
    experiments_in, find_region, generate_forecast, ExperimentCategory, MapLayer, Region, REGIONS,
};

use self::{config::FarmConfig, simulation::Simulation};

const DEFAULT_REGION: &str = "central_valley_usa";

#[derive(Debug, Parser)]
#[command(
    name = "data-farm",
    about = "Explore farming with satellite data",
    version
)]
struct Cli {
    /// Optional TOML file overriding movement tuning and the farm layout.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the farm in a window (default)
    Play {
        /// Region whose observations drive the farm.
        #[arg(long)]
        region: Option<String>,
        /// Synchronise presentation with the display refresh rate.
        #[arg(long)]
        vsync: Option<bool>,
        /// Print the frame rate once per second.
        #[arg(long)]
        show_fps: bool,
    },
    /// Run a scripted key sequence without a window and print the final farm state
    Simulate {
        /// Comma separated steps such as `down:10,tool:plant,use,day:3`.
        #[arg(long)]
        script: String,
        /// Region whose observations drive the farm.
        #[arg(long)]
        region: Option<String>,
        /// Simulated duration of each frame in milliseconds.
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,
    },
    /// Print a seven-day forecast for a region
    Forecast {
        /// Region to forecast.
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
        /// Seed for the forecast generator.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// List the agricultural regions and their map layer bands
    Regions,
    /// List the research lab's experiments
    Research {
        /// Only list experiments in this category, such as `irrigation`.
        #[arg(long)]
        category: Option<String>,
    },
}

/// Entry point for the Data Farm command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Play {
        region: None,
        vsync: None,
        show_fps: false,
    });

    match command {
        Command::Play {
            region,
            vsync,
            show_fps,
        } => {
            let config = FarmConfig::load(cli.config.as_deref())?;
            let conditions = resolve_conditions(region.as_deref())?;
            play(config, conditions, vsync, show_fps)
        }
        Command::Simulate {
            script,
            region,
            frame_ms,
        } => {
            let config = FarmConfig::load(cli.config.as_deref())?;
            let conditions = resolve_conditions(region.as_deref())?;
            simulate(config, conditions, &script, Duration::from_millis(frame_ms))
        }
        Command::Forecast { region, seed } => forecast(&region, seed),
        Command::Regions => {
            list_regions();
            Ok(())
        }
        Command::Research { category } => list_experiments(category.as_deref()),
    }
}

fn resolve_conditions(region: Option<&str>) -> Result<NasaData> {
    match region {
        Some(id) => Ok(lookup_region(id)?.data),
        None => Ok(NasaData::default()),
    }
}

fn lookup_region(id: &str) -> Result<&'static Region> {
    find_region(id).with_context(|| {
        let known: Vec<_> = REGIONS.iter().map(|region| region.id).collect();
        format!("unknown region `{id}` (known: {})", known.join(", "))
    })
}

fn play(
    config: FarmConfig,
    conditions: NasaData,
    vsync: Option<bool>,
    show_fps: bool,
) -> Result<()> {
    let layout = config
        .layout
        .build()
        .context("failed to build farm layout")?;
    let mut simulation = Simulation::new(layout, config.motion, config.player.start, conditions);

    let mut scene = Scene::new(
        simulation.layout(),
        &simulation.player(),
        simulation.motion_config().player_size,
    );
    scene.sync_tiles(simulation.tiles());
    scene.hud = simulation.hud_line();

    let presentation = Presentation::new(
        config.window.title.clone(),
        Color::from_rgb_u8(34, 49, 29),
        scene,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(vsync.unwrap_or(config.window.vsync))
        .with_show_fps(show_fps || config.window.show_fps);

    backend.run(presentation, move |dt, input, scene| {
        for event in simulation.advance_frame(dt, input) {
            log_event(&event);
        }
        scene.sync_player(&simulation.player());
        scene.sync_tiles(simulation.tiles());
        scene.hud = simulation.hud_line();
    })
}

fn simulate(config: FarmConfig, conditions: NasaData, script: &str, dt: Duration) -> Result<()> {
    let steps = script::parse(script).context("invalid --script")?;
    let layout = config
        .layout
        .build()
        .context("failed to build farm layout")?;
    let mut simulation = Simulation::new(layout, config.motion, config.player.start, conditions);

    for input in script::frames(&steps) {
        for event in simulation.advance_frame(dt, input) {
            log_event(&event);
            match event {
                Event::ToolUsed { tool, tile } => {
                    println!("{} applied to tile {}", tool.label(), tile.get());
                }
                Event::ToolRejected { tool, tile, .. } => {
                    println!("{} rejected for tile {}", tool.label(), tile.get());
                }
                Event::CropHarvested {
                    tile,
                    crop,
                    earnings,
                } => {
                    println!(
                        "{} harvested from tile {} for ${earnings}",
                        crop.label(),
                        tile.get()
                    );
                }
                Event::CropWithered { tile, crop } => {
                    println!("{} withered on tile {}", crop.label(), tile.get());
                }
                Event::ExperimentStarted { experiment, .. } => {
                    println!("experiment {experiment} started");
                }
                Event::ExperimentRejected { experiment, .. } => {
                    println!("experiment {experiment} rejected");
                }
                Event::ExperimentCompleted { experiment, xp } => {
                    println!("experiment {experiment} completed (+{xp} xp)");
                }
                _ => {}
            }
        }
    }
    simulation.teardown();

    let player = simulation.player();
    println!(
        "position: ({}, {})",
        player.position.x(),
        player.position.y()
    );
    println!("facing: {:?}", player.facing);
    match player.active_tile {
        Some(tile) => println!("active tile: {}", tile.get()),
        None => println!("active tile: none"),
    }
    println!("ticks: {}", simulation.tick_index());

    let resources = simulation.resources();
    let planted = simulation
        .tiles()
        .iter()
        .filter(|tile| tile.is_planted())
        .count();
    println!("money: ${}", resources.money);
    println!("level: {} ({} xp)", resources.level, resources.xp);
    println!("date: {} day {}", resources.season.label(), resources.day);
    println!("planted plots: {planted}");
    Ok(())
}

fn forecast(region: &str, seed: u64) -> Result<()> {
    let region = lookup_region(region)?;
    println!("{} ({})", region.name, region.climate_zone);

    for day in generate_forecast(&region.data, seed) {
        println!(
            "{:<9} {:<14} {:>3}..{:>3}°C  rain {:>3}mm  humidity {:>3}%  wind {:>3}km/h  sun {:>4}W/m²  NDVI {:.2}  moisture {:>3}%",
            day.label,
            day.condition.label(),
            day.temperature.min,
            day.temperature.max,
            day.precipitation,
            day.humidity,
            day.wind_speed,
            day.solar_irradiance,
            day.ndvi,
            day.soil_moisture,
        );
        println!("          {}", day.advice.text());
        if !day.risks.is_empty() {
            let risks: Vec<_> = day.risks.iter().map(|risk| risk.label()).collect();
            println!("          risks: {}", risks.join(", "));
        }
    }
    Ok(())
}

fn list_regions() {
    for region in &REGIONS {
        println!(
            "{:<20} {} [{:.2}, {:.2}] {}",
            region.id, region.name, region.latitude, region.longitude, region.climate_zone
        );
        println!("    crops: {}", region.primary_crops.join(", "));
        println!("    challenges: {}", region.challenges.join(", "));
        println!("    missions: {}", region.missions.join(", "));
        let bands: Vec<_> = MapLayer::ALL
            .iter()
            .map(|layer| {
                format!(
                    "{} {} ({:?})",
                    layer.label(),
                    layer.value(&region.data),
                    layer.classify(&region.data)
                )
            })
            .collect();
        println!("    layers: {}", bands.join("; "));
    }
}

fn list_experiments(category: Option<&str>) -> Result<()> {
    let category = match category {
        Some(name) => Some(ExperimentCategory::parse(name).with_context(|| {
            let known: Vec<_> = ExperimentCategory::ALL
                .iter()
                .map(|category| category.label())
                .collect();
            format!("unknown category `{name}` (known: {})", known.join(", "))
        })?),
        None => None,
    };

    for experiment in experiments_in(category) {
        println!(
            "{:<22} {} [{}] {} days, ${}",
            experiment.id,
            experiment.name,
            experiment.category.label(),
            experiment.duration_days,
            experiment.cost
        );
        println!("    {}", experiment.description);
        println!("    needs: {}", experiment.requirements.join(", "));
        println!("    expects: {}", experiment.expected_results.join(", "));
        println!("    satellite: {}", experiment.satellite_use);
    }
    Ok(())
}

fn log_event(event: &Event) {
    match event {
        Event::ToolUsed { tool, tile } => {
            log::info!("{} used on tile {}", tool.label(), tile.get());
        }
        Event::ToolRejected { tool, tile, reason } => {
            log::warn!(
                "{} rejected for tile {}: {reason:?}",
                tool.label(),
                tile.get()
            );
        }
        Event::ActiveTileChanged { current, .. } => {
            log::debug!("active tile now {current:?}");
        }
        Event::CropHarvested {
            tile,
            crop,
            earnings,
        } => {
            log::info!(
                "{} harvested from tile {} for ${earnings}",
                crop.label(),
                tile.get()
            );
        }
        Event::CropWithered { tile, crop } => {
            log::warn!("{} withered on tile {}", crop.label(), tile.get());
        }
        Event::LeveledUp { level } => log::info!("reached level {level}"),
        Event::DayStarted { day, season } => {
            log::info!("{} day {day} begins", season.label());
        }
        Event::ExperimentStarted {
            experiment,
            completes_after,
        } => {
            log::info!("experiment {experiment} running until day count {completes_after}");
        }
        Event::ExperimentRejected { experiment, reason } => {
            log::warn!("experiment {experiment} rejected: {reason:?}");
        }
        Event::ExperimentCompleted { experiment, xp } => {
            log::info!("experiment {experiment} completed for {xp} xp");
        }
        _ => {}
    }
}

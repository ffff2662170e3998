//! Plot husbandry, farmer supplies and research bookkeeping.

use data_farm_core::{
    level_for_xp, Crop, Event, ExperimentError, NasaData, Resources, TileIndex, TileState, Tool,
    ToolError, DAYS_PER_SEASON, FULL_GROWTH,
};

const PLANT_ENERGY: u32 = 5;
const WATER_PER_USE: u32 = 10;
const WATER_ENERGY: u32 = 2;
const FERTILIZER_COST: u32 = 8;
const FERTILIZE_ENERGY: u32 = 3;
const HARVEST_ENERGY: u32 = 5;
const DRY_DAY_DAMAGE: u8 = 25;
/// Rainfall that waters every plot on its own.
const RAIN_WATERING_MM: f32 = 5.0;
const EXPERIMENT_XP_PER_DAY: u32 = 5;

/// Research experiment that has been funded and is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveExperiment {
    /// Catalogue identifier of the experiment.
    pub id: &'static str,
    /// Day count at which the experiment completes.
    pub completes_after: u32,
    /// Length of the experiment in days.
    pub duration_days: u32,
}

#[derive(Debug)]
pub(crate) struct Farm {
    tiles: Vec<TileState>,
    resources: Resources,
    seed: Crop,
    experiments: Vec<ActiveExperiment>,
    days_elapsed: u32,
}

struct ToolOutcome {
    tile: TileState,
    resources: Resources,
    harvest: Option<(Crop, u32)>,
}

impl Farm {
    pub(crate) fn new(tile_count: u32) -> Self {
        Self {
            tiles: vec![TileState::default(); tile_count as usize],
            resources: Resources::default(),
            seed: Crop::Wheat,
            experiments: Vec::new(),
            days_elapsed: 0,
        }
    }

    pub(crate) fn tile_count(&self) -> u32 {
        self.tiles.len() as u32
    }

    pub(crate) fn tiles(&self) -> &[TileState] {
        &self.tiles
    }

    pub(crate) fn resources(&self) -> Resources {
        self.resources
    }

    pub(crate) fn seed(&self) -> Crop {
        self.seed
    }

    pub(crate) fn experiments(&self) -> &[ActiveExperiment] {
        &self.experiments
    }

    pub(crate) fn days_elapsed(&self) -> u32 {
        self.days_elapsed
    }

    /// Grows or shrinks the farm; surviving plots keep their state.
    pub(crate) fn resize(&mut self, tile_count: u32) {
        self.tiles.resize(tile_count as usize, TileState::default());
    }

    pub(crate) fn select_seed(&mut self, crop: Crop, out_events: &mut Vec<Event>) {
        if self.seed != crop {
            self.seed = crop;
            out_events.push(Event::SeedSelected { crop });
        }
    }

    pub(crate) fn use_tool(&mut self, tool: Tool, tile: TileIndex, out_events: &mut Vec<Event>) {
        let slot = tile.get() as usize;
        let Some(current) = self.tiles.get(slot).copied() else {
            out_events.push(Event::ToolRejected {
                tool,
                tile,
                reason: ToolError::UnknownTile,
            });
            return;
        };

        let outcome = match self.plan_tool(tool, current) {
            Ok(outcome) => outcome,
            Err(reason) => {
                log::debug!("{} rejected on tile {}: {reason:?}", tool.label(), tile.get());
                out_events.push(Event::ToolRejected { tool, tile, reason });
                return;
            }
        };

        log::debug!("{} applied to tile {}", tool.label(), tile.get());
        out_events.push(Event::ToolUsed { tool, tile });
        if outcome.tile != current {
            self.tiles[slot] = outcome.tile;
            out_events.push(Event::TileChanged {
                tile,
                state: outcome.tile,
            });
        }
        if let Some((crop, earnings)) = outcome.harvest {
            out_events.push(Event::CropHarvested {
                tile,
                crop,
                earnings,
            });
        }
        self.commit_resources(outcome.resources, out_events);
    }

    fn plan_tool(&self, tool: Tool, tile: TileState) -> Result<ToolOutcome, ToolError> {
        let mut resources = self.resources;
        let mut next = tile;
        let mut harvest = None;

        match tool {
            Tool::Plant => {
                if tile.is_planted() {
                    return Err(ToolError::AlreadyPlanted);
                }
                spend_money(&mut resources, self.seed.seed_cost())?;
                spend_energy(&mut resources, PLANT_ENERGY)?;
                next = TileState::sown(self.seed);
            }
            Tool::Water => {
                if !tile.is_planted() {
                    return Err(ToolError::NotPlanted);
                }
                if tile.watered {
                    return Err(ToolError::AlreadyWatered);
                }
                resources.water = resources
                    .water
                    .checked_sub(WATER_PER_USE)
                    .ok_or(ToolError::NotEnoughWater)?;
                spend_energy(&mut resources, WATER_ENERGY)?;
                next.watered = true;
            }
            Tool::Fertilize => {
                if !tile.is_planted() {
                    return Err(ToolError::NotPlanted);
                }
                if tile.fertilized {
                    return Err(ToolError::AlreadyFertilized);
                }
                spend_money(&mut resources, FERTILIZER_COST)?;
                spend_energy(&mut resources, FERTILIZE_ENERGY)?;
                next.fertilized = true;
            }
            Tool::Harvest => {
                let Some(crop) = tile.crop else {
                    return Err(ToolError::NotPlanted);
                };
                if !tile.is_ready() {
                    return Err(ToolError::NotReady);
                }
                spend_energy(&mut resources, HARVEST_ENERGY)?;
                let earnings = crop.sale_price() * u32::from(tile.health) / 100;
                resources.money = resources.money.saturating_add(earnings);
                next = TileState::default();
                harvest = Some((crop, earnings));
            }
            Tool::Inspect => {}
        }

        resources.xp = resources.xp.saturating_add(tool_xp(tool));
        Ok(ToolOutcome {
            tile: next,
            resources,
            harvest,
        })
    }

    /// Closes the day: plots grow or dry out, supplies refill, research advances.
    pub(crate) fn end_day(&mut self, conditions: &NasaData, out_events: &mut Vec<Event>) {
        let rained = conditions.precipitation > RAIN_WATERING_MM;

        for (slot, tile) in self.tiles.iter_mut().enumerate() {
            let Some(crop) = tile.crop else {
                continue;
            };
            let before = *tile;
            let index = TileIndex::new(slot as u32);

            if tile.watered || rained {
                tile.growth = grow(tile.growth, crop, tile.fertilized);
            } else {
                tile.health = tile.health.saturating_sub(DRY_DAY_DAMAGE);
            }
            tile.watered = false;

            if tile.health == 0 {
                *tile = TileState::default();
                out_events.push(Event::CropWithered { tile: index, crop });
            }
            if *tile != before {
                out_events.push(Event::TileChanged {
                    tile: index,
                    state: *tile,
                });
            }
        }

        self.days_elapsed = self.days_elapsed.saturating_add(1);
        let mut next = self.resources;
        if next.day >= DAYS_PER_SEASON {
            next.day = 1;
            next.season = next.season.next();
        } else {
            next.day += 1;
        }
        next.water = next.max_water;
        next.energy = next.max_energy;
        out_events.push(Event::DayStarted {
            day: next.day,
            season: next.season,
        });

        let days = self.days_elapsed;
        let (finished, running): (Vec<_>, Vec<_>) = self
            .experiments
            .drain(..)
            .partition(|experiment| days >= experiment.completes_after);
        self.experiments = running;
        for experiment in finished {
            let xp = experiment.duration_days.saturating_mul(EXPERIMENT_XP_PER_DAY);
            next.xp = next.xp.saturating_add(xp);
            log::debug!("experiment {} completed", experiment.id);
            out_events.push(Event::ExperimentCompleted {
                experiment: experiment.id,
                xp,
            });
        }

        self.commit_resources(next, out_events);
    }

    pub(crate) fn start_experiment(
        &mut self,
        experiment: &'static str,
        cost: u32,
        duration_days: u32,
        out_events: &mut Vec<Event>,
    ) {
        if self.experiments.iter().any(|running| running.id == experiment) {
            out_events.push(Event::ExperimentRejected {
                experiment,
                reason: ExperimentError::AlreadyRunning,
            });
            return;
        }

        let mut next = self.resources;
        let Some(money) = next.money.checked_sub(cost) else {
            out_events.push(Event::ExperimentRejected {
                experiment,
                reason: ExperimentError::NotEnoughMoney,
            });
            return;
        };
        next.money = money;

        let completes_after = self.days_elapsed.saturating_add(duration_days);
        self.experiments.push(ActiveExperiment {
            id: experiment,
            completes_after,
            duration_days,
        });
        out_events.push(Event::ExperimentStarted {
            experiment,
            completes_after,
        });
        self.commit_resources(next, out_events);
    }

    fn commit_resources(&mut self, mut next: Resources, out_events: &mut Vec<Event>) {
        next.level = level_for_xp(next.xp);
        if next == self.resources {
            return;
        }

        let leveled_up = next.level > self.resources.level;
        self.resources = next;
        out_events.push(Event::ResourcesChanged { resources: next });
        if leveled_up {
            out_events.push(Event::LeveledUp { level: next.level });
        }
    }

    #[cfg(test)]
    pub(crate) fn grant_money(&mut self, amount: u32) {
        self.resources.money = self.resources.money.saturating_add(amount);
    }
}

fn spend_money(resources: &mut Resources, amount: u32) -> Result<(), ToolError> {
    resources.money = resources
        .money
        .checked_sub(amount)
        .ok_or(ToolError::NotEnoughMoney)?;
    Ok(())
}

fn spend_energy(resources: &mut Resources, amount: u32) -> Result<(), ToolError> {
    resources.energy = resources
        .energy
        .checked_sub(amount)
        .ok_or(ToolError::NotEnoughEnergy)?;
    Ok(())
}

const fn tool_xp(tool: Tool) -> u32 {
    match tool {
        Tool::Plant => 5,
        Tool::Water => 2,
        Tool::Fertilize => 3,
        Tool::Harvest => 10,
        Tool::Inspect => 0,
    }
}

/// Growth after one watered day; fertilizer adds half a step.
fn grow(growth: u8, crop: Crop, fertilized: bool) -> u8 {
    let days = crop.days_to_maturity().max(1);
    let mut step = (u32::from(FULL_GROWTH) + days - 1) / days;
    if fertilized {
        step += step / 2;
    }
    (u32::from(growth) + step).min(u32::from(FULL_GROWTH)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lettuce_matures_after_four_watered_days() {
        let mut growth = 0;
        for _ in 0..3 {
            growth = grow(growth, Crop::Lettuce, false);
        }
        assert_eq!(growth, 75);
        assert_eq!(grow(growth, Crop::Lettuce, false), FULL_GROWTH);
    }

    #[test]
    fn fertilizer_speeds_growth_and_growth_saturates() {
        assert_eq!(grow(0, Crop::Wheat, false), 10);
        assert_eq!(grow(0, Crop::Wheat, true), 15);
        assert_eq!(grow(95, Crop::Corn, true), FULL_GROWTH);
    }

    #[test]
    fn resize_keeps_surviving_plots() {
        let mut farm = Farm::new(4);
        let mut events = Vec::new();
        farm.use_tool(Tool::Plant, TileIndex::new(1), &mut events);

        farm.resize(2);
        assert_eq!(farm.tile_count(), 2);
        assert!(farm.tiles()[1].is_planted());

        farm.resize(3);
        assert!(!farm.tiles()[2].is_planted());
    }
}

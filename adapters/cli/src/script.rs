//! Scripted key sequences driving the headless `simulate` command.
//!
//! A script is a comma separated list of steps:
//!
//! * `down:10` holds the down key for ten frames,
//! * `down+left:4` holds several keys at once,
//! * `idle:3` holds nothing for three frames,
//! * `tool:water` picks a tool and `use` applies it to the active tile,
//! * `seed:corn` picks the crop sown by the plant tool,
//! * `day` ends the day and `day:3` ends three in a row,
//! * `research:cover_crops` funds an experiment from the research lab.
//!
//! Every step takes at least one frame. Keys held by a step are released on
//! the first frame of the step that follows it.

use std::{num::ParseIntError, slice};

use data_farm_core::{Crop, FacingDirection, KeyEvent, Tool};
use data_farm_rendering::FrameInput;
use data_farm_system_climate::find_experiment;
use thiserror::Error;

/// Single instruction within a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Hold `directions` for `frames` frames.
    Hold {
        directions: Vec<FacingDirection>,
        frames: u32,
    },
    /// Pick a tool from the toolbar.
    Select(Tool),
    /// Use the held tool.
    Use,
    /// Pick the crop to sow.
    Seed(Crop),
    /// End this many days, one per frame.
    EndDay(u32),
    /// Fund the catalogued experiment with this identifier.
    Research(&'static str),
}

/// Errors raised while parsing a script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The script contained no steps.
    #[error("script is empty")]
    Empty,
    /// A movement step did not name a frame count.
    #[error("step `{0}` is missing a frame count")]
    MissingFrames(String),
    /// A frame count was not a non-negative integer.
    #[error("step `{step}` has an invalid frame count")]
    InvalidFrames {
        step: String,
        #[source]
        source: ParseIntError,
    },
    /// A direction name was not recognised.
    #[error("unknown direction `{0}`")]
    UnknownDirection(String),
    /// A tool name was not recognised.
    #[error("unknown tool `{0}`")]
    UnknownTool(String),
    /// A crop name was not recognised.
    #[error("unknown crop `{0}`")]
    UnknownCrop(String),
    /// An experiment identifier is not in the research catalogue.
    #[error("unknown experiment `{0}`")]
    UnknownExperiment(String),
}

/// Parses a script such as `down:10,right:5`.
pub(crate) fn parse(script: &str) -> Result<Vec<Step>, ScriptError> {
    let steps = script
        .split(',')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(parse_step)
        .collect::<Result<Vec<_>, _>>()?;

    if steps.is_empty() {
        return Err(ScriptError::Empty);
    }
    Ok(steps)
}

fn parse_step(step: &str) -> Result<Step, ScriptError> {
    if step.eq_ignore_ascii_case("use") {
        return Ok(Step::Use);
    }
    if step.eq_ignore_ascii_case("day") {
        return Ok(Step::EndDay(1));
    }

    let (head, tail) = step
        .split_once(':')
        .ok_or_else(|| ScriptError::MissingFrames(step.to_owned()))?;
    let head = head.trim();
    let tail = tail.trim();

    if head.eq_ignore_ascii_case("tool") {
        return parse_tool(tail).map(Step::Select);
    }
    if head.eq_ignore_ascii_case("seed") {
        return parse_crop(tail).map(Step::Seed);
    }
    if head.eq_ignore_ascii_case("research") {
        return find_experiment(tail)
            .map(|experiment| Step::Research(experiment.id))
            .ok_or_else(|| ScriptError::UnknownExperiment(tail.to_owned()));
    }

    let frames = tail.parse().map_err(|source| ScriptError::InvalidFrames {
        step: step.to_owned(),
        source,
    })?;
    if head.eq_ignore_ascii_case("day") {
        return Ok(Step::EndDay(frames));
    }
    let directions = if head.eq_ignore_ascii_case("idle") {
        Vec::new()
    } else {
        head.split('+')
            .map(|name| parse_direction(name.trim()))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Step::Hold { directions, frames })
}

fn parse_direction(name: &str) -> Result<FacingDirection, ScriptError> {
    FacingDirection::EVALUATION_ORDER
        .into_iter()
        .find(|direction| {
            direction_name(*direction).eq_ignore_ascii_case(name)
                || direction
                    .key_bindings()
                    .iter()
                    .any(|binding| binding.eq_ignore_ascii_case(name))
        })
        .ok_or_else(|| ScriptError::UnknownDirection(name.to_owned()))
}

fn parse_tool(name: &str) -> Result<Tool, ScriptError> {
    Tool::ALL
        .into_iter()
        .find(|tool| tool.label().eq_ignore_ascii_case(name))
        .ok_or_else(|| ScriptError::UnknownTool(name.to_owned()))
}

fn parse_crop(name: &str) -> Result<Crop, ScriptError> {
    Crop::ALL
        .into_iter()
        .find(|crop| crop.label().eq_ignore_ascii_case(name))
        .ok_or_else(|| ScriptError::UnknownCrop(name.to_owned()))
}

fn direction_name(direction: FacingDirection) -> &'static str {
    match direction {
        FacingDirection::Up => "up",
        FacingDirection::Down => "down",
        FacingDirection::Left => "left",
        FacingDirection::Right => "right",
    }
}

const NO_KEYS: &[FacingDirection] = &[];

/// Expands parsed steps lazily into the frame inputs an adapter would have produced.
pub(crate) fn frames(steps: &[Step]) -> Frames<'_> {
    Frames {
        steps: steps.iter(),
        held: &[],
        repeat: FrameInput::default(),
        remaining: 0,
    }
}

/// Iterator over the frames of a parsed script.
#[derive(Debug)]
pub(crate) struct Frames<'a> {
    steps: slice::Iter<'a, Step>,
    held: &'a [FacingDirection],
    repeat: FrameInput,
    remaining: u32,
}

impl Frames<'_> {
    fn release_held(&mut self) -> Vec<KeyEvent> {
        std::mem::take(&mut self.held)
            .iter()
            .map(|direction| KeyEvent::Released(key_name(*direction)))
            .collect()
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = FrameInput;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining > 0 {
            self.remaining -= 1;
            return Some(self.repeat.clone());
        }

        loop {
            let step = self.steps.next()?;
            let (template, count, presses): (FrameInput, u32, &'a [FacingDirection]) = match step {
                Step::Hold { directions, frames } => {
                    (FrameInput::default(), *frames, directions.as_slice())
                }
                Step::Select(tool) => (
                    FrameInput {
                        select_tool: Some(*tool),
                        ..FrameInput::default()
                    },
                    1,
                    NO_KEYS,
                ),
                Step::Use => (
                    FrameInput {
                        use_tool: true,
                        ..FrameInput::default()
                    },
                    1,
                    NO_KEYS,
                ),
                Step::Seed(crop) => (
                    FrameInput {
                        select_seed: Some(*crop),
                        ..FrameInput::default()
                    },
                    1,
                    NO_KEYS,
                ),
                Step::EndDay(days) => (
                    FrameInput {
                        end_day: true,
                        ..FrameInput::default()
                    },
                    *days,
                    NO_KEYS,
                ),
                Step::Research(id) => (
                    FrameInput {
                        start_experiment: Some((*id).to_owned()),
                        ..FrameInput::default()
                    },
                    1,
                    NO_KEYS,
                ),
            };
            if count == 0 {
                continue;
            }

            let mut first = template.clone();
            first.key_events = self.release_held();
            first.key_events.extend(
                presses
                    .iter()
                    .map(|direction| KeyEvent::Pressed(key_name(*direction))),
            );
            self.held = presses;
            self.repeat = template;
            self.remaining = count - 1;
            return Some(first);
        }
    }
}

fn key_name(direction: FacingDirection) -> String {
    direction.key_bindings()[0].to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_movement_steps() {
        let steps = parse("down:10, right:5").expect("valid script");

        assert_eq!(
            steps,
            vec![
                Step::Hold {
                    directions: vec![FacingDirection::Down],
                    frames: 10,
                },
                Step::Hold {
                    directions: vec![FacingDirection::Right],
                    frames: 5,
                },
            ]
        );
    }

    #[test]
    fn parses_combined_and_tool_steps() {
        let steps = parse("down+ArrowLeft:3,idle:2,tool:Water,use").expect("valid script");

        assert_eq!(
            steps,
            vec![
                Step::Hold {
                    directions: vec![FacingDirection::Down, FacingDirection::Left],
                    frames: 3,
                },
                Step::Hold {
                    directions: Vec::new(),
                    frames: 2,
                },
                Step::Select(Tool::Water),
                Step::Use,
            ]
        );
    }

    #[test]
    fn rejects_malformed_steps() {
        assert_eq!(parse(" , "), Err(ScriptError::Empty));
        assert_eq!(
            parse("down"),
            Err(ScriptError::MissingFrames("down".to_owned()))
        );
        assert_eq!(
            parse("sideways:3"),
            Err(ScriptError::UnknownDirection("sideways".to_owned()))
        );
        assert_eq!(
            parse("tool:shovel"),
            Err(ScriptError::UnknownTool("shovel".to_owned()))
        );
        assert!(matches!(
            parse("up:-1"),
            Err(ScriptError::InvalidFrames { .. })
        ));
    }

    #[test]
    fn parses_farm_steps() {
        let steps = parse("seed:Corn, day, day:3, research:harvest_timing").expect("valid script");

        assert_eq!(
            steps,
            vec![
                Step::Seed(Crop::Corn),
                Step::EndDay(1),
                Step::EndDay(3),
                Step::Research("harvest_timing"),
            ]
        );
        assert_eq!(
            parse("seed:cactus"),
            Err(ScriptError::UnknownCrop("cactus".to_owned()))
        );
        assert_eq!(
            parse("research:cold_fusion"),
            Err(ScriptError::UnknownExperiment("cold_fusion".to_owned()))
        );
    }

    #[test]
    fn hold_takes_exactly_its_frame_count() {
        let frames: Vec<_> = frames(&[Step::Hold {
            directions: vec![FacingDirection::Up],
            frames: 3,
        }])
        .collect();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].key_events, vec![KeyEvent::Pressed("w".to_owned())]);
        assert!(frames[1].key_events.is_empty());
        assert!(frames[2].key_events.is_empty());
    }

    #[test]
    fn release_rides_on_the_next_step() {
        let steps = parse("down:2,right:1,use").expect("valid script");
        let frames: Vec<_> = frames(&steps).collect();

        assert_eq!(frames.len(), 4);
        assert_eq!(
            frames[2].key_events,
            vec![
                KeyEvent::Released("s".to_owned()),
                KeyEvent::Pressed("d".to_owned()),
            ]
        );
        assert_eq!(frames[3].key_events, vec![KeyEvent::Released("d".to_owned())]);
        assert!(frames[3].use_tool);
    }

    #[test]
    fn zero_length_holds_are_skipped() {
        let steps = parse("up:1,left:0,idle:1").expect("valid script");
        let frames: Vec<_> = frames(&steps).collect();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].key_events, vec![KeyEvent::Released("w".to_owned())]);
    }

    #[test]
    fn long_holds_are_expanded_lazily() {
        let steps = [Step::Hold {
            directions: vec![FacingDirection::Down],
            frames: u32::MAX,
        }];
        let mut frames = frames(&steps);

        assert_eq!(
            frames.next().map(|frame| frame.key_events),
            Some(vec![KeyEvent::Pressed("s".to_owned())])
        );
        assert_eq!(frames.nth(1_000), Some(FrameInput::default()));
    }

    #[test]
    fn repeated_days_end_once_per_frame() {
        let frames: Vec<_> = frames(&[Step::EndDay(3)]).collect();

        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|frame| frame.end_day));
    }
}

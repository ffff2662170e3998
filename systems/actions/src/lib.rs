#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure tool system that targets farm interactions at the active tile.

use data_farm_core::{Command, Event, PlayerSnapshot, Tool};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionInput {
    /// Tool the player picked from the toolbar on this frame.
    pub select_tool: Option<Tool>,
    /// Indicates whether the player asked to put the held tool away.
    pub put_away: bool,
    /// Indicates whether the player triggered the held tool on this frame.
    pub use_tool: bool,
}

/// Tool system that translates toolbar input and proximity into tool commands.
#[derive(Debug, Default, Clone)]
pub struct Actions {
    selected: Option<Tool>,
}

impl Actions {
    /// Creates a new tool system with no tool held.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Tool the system believes the farmer is holding.
    #[must_use]
    pub const fn selected(&self) -> Option<Tool> {
        self.selected
    }

    /// Consumes world events and adapter-derived input to emit tool commands.
    ///
    /// A tool is only used when one is held and the farmer stands next to a
    /// tile; otherwise the request is dropped silently.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: ActionInput,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::ToolSelected { tool } = event {
                self.selected = *tool;
            }
        }

        let mut held = self.selected;
        if input.put_away {
            held = None;
        }
        if let Some(tool) = input.select_tool {
            held = Some(tool);
        }
        if held != self.selected {
            out.push(Command::SelectTool { tool: held });
        }

        if !input.use_tool {
            return;
        }

        if let (Some(tool), Some(tile)) = (held, player.active_tile) {
            out.push(Command::UseTool { tool, tile });
        }
    }
}

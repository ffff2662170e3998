use data_farm_core::{Command, Event, PlayerSnapshot, TileIndex, Tool};
use data_farm_system_actions::{ActionInput, Actions};

fn next_to(tile: u32) -> PlayerSnapshot {
    PlayerSnapshot {
        active_tile: Some(TileIndex::new(tile)),
        ..PlayerSnapshot::default()
    }
}

#[test]
fn selecting_a_tool_emits_select_command() {
    let mut actions = Actions::new();
    let mut commands = Vec::new();

    actions.handle(
        &[],
        ActionInput {
            select_tool: Some(Tool::Plant),
            ..ActionInput::default()
        },
        &PlayerSnapshot::default(),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SelectTool {
            tool: Some(Tool::Plant)
        }]
    );
}

#[test]
fn use_targets_active_tile_with_held_tool() {
    let mut actions = Actions::new();
    let mut commands = Vec::new();

    actions.handle(
        &[Event::ToolSelected {
            tool: Some(Tool::Water),
        }],
        ActionInput {
            use_tool: true,
            ..ActionInput::default()
        },
        &next_to(5),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::UseTool {
            tool: Tool::Water,
            tile: TileIndex::new(5),
        }],
        "held tool should apply to the tile under the farmer's feet",
    );
}

#[test]
fn use_ignored_without_active_tile() {
    let mut actions = Actions::new();
    let mut commands = Vec::new();

    actions.handle(
        &[Event::ToolSelected {
            tool: Some(Tool::Harvest),
        }],
        ActionInput {
            use_tool: true,
            ..ActionInput::default()
        },
        &PlayerSnapshot::default(),
        &mut commands,
    );

    assert!(commands.is_empty(), "no tile in range, nothing to target");
}

#[test]
fn use_ignored_without_held_tool() {
    let mut actions = Actions::new();
    let mut commands = Vec::new();

    actions.handle(
        &[],
        ActionInput {
            use_tool: true,
            ..ActionInput::default()
        },
        &next_to(1),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn selection_and_use_on_same_frame_apply_new_tool() {
    let mut actions = Actions::new();
    let mut commands = Vec::new();

    actions.handle(
        &[],
        ActionInput {
            select_tool: Some(Tool::Inspect),
            use_tool: true,
            ..ActionInput::default()
        },
        &next_to(2),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![
            Command::SelectTool {
                tool: Some(Tool::Inspect)
            },
            Command::UseTool {
                tool: Tool::Inspect,
                tile: TileIndex::new(2),
            },
        ]
    );
}

#[test]
fn put_away_clears_held_tool() {
    let mut actions = Actions::new();
    let mut commands = Vec::new();

    actions.handle(
        &[Event::ToolSelected {
            tool: Some(Tool::Fertilize),
        }],
        ActionInput {
            put_away: true,
            use_tool: true,
            ..ActionInput::default()
        },
        &next_to(0),
        &mut commands,
    );

    assert_eq!(commands, vec![Command::SelectTool { tool: None }]);
    assert_eq!(actions.selected(), Some(Tool::Fertilize));
}

#[test]
fn reselecting_held_tool_is_silent() {
    let mut actions = Actions::new();
    let mut commands = Vec::new();

    actions.handle(
        &[Event::ToolSelected {
            tool: Some(Tool::Plant),
        }],
        ActionInput {
            select_tool: Some(Tool::Plant),
            ..ActionInput::default()
        },
        &next_to(0),
        &mut commands,
    );

    assert!(commands.is_empty());
}

use std::process::{Command, Output};

fn data_farm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_data-farm"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch data-farm binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn held_key_moves_the_farmer_once_per_frame() {
    let output = data_farm(&["simulate", "--script", "down:10"]);
    assert!(output.status.success());

    let report = stdout(&output);
    assert!(report.contains("position: (300, 250)"), "{report}");
    assert!(report.contains("facing: Down"), "{report}");
    assert!(report.contains("ticks: 10"), "{report}");
}

#[test]
fn scripted_season_grows_and_sells_a_crop() {
    let output = data_farm(&[
        "simulate",
        "--script",
        "seed:lettuce,up:1,tool:plant,use,tool:water,use,day,use,day,use,day,use,day,tool:harvest,use",
    ]);
    assert!(output.status.success());

    let report = stdout(&output);
    assert!(report.contains("Plant applied to tile 10"), "{report}");
    assert!(report.contains("Lettuce harvested from tile 10 for $20"), "{report}");
    assert!(report.contains("money: $115"), "{report}");
    assert!(report.contains("date: Spring day 5"), "{report}");
    assert!(report.contains("planted plots: 0"), "{report}");
}

#[test]
fn malformed_script_fails_without_running() {
    let output = data_farm(&["simulate", "--script", "sideways:3"]);

    assert!(!output.status.success());
    let errors = String::from_utf8_lossy(&output.stderr);
    assert!(errors.contains("invalid --script"), "{errors}");
    assert!(output.stdout.is_empty());
}

#[test]
fn research_listing_filters_by_category() {
    let output = data_farm(&["research", "--category", "irrigation"]);
    assert!(output.status.success());

    let listing = stdout(&output);
    assert!(listing.contains("drip_irrigation"), "{listing}");
    assert!(listing.contains("drought_resistance"), "{listing}");
    assert!(!listing.contains("cover_crops"), "{listing}");

    assert!(!data_farm(&["research", "--category", "weeding"]).status.success());
}

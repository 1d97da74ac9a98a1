//! CLI Integration Tests
//!
//! Runs parsed command lines against files in a temporary directory.

use clap::Parser;
use designer_cli::{run, Cli};
use designer_core::{decode, ProjectDocument};
use std::fs;
use tempfile::TempDir;

const MARKUP: &str = r#"<Canvas xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation">
  <Window Name="main" Width="400" Height="300" Canvas.Left="0" Canvas.Top="0">
    <Button Name="ok" Width="120" Height="40" Canvas.Left="20" Canvas.Top="20" Content="OK" />
  </Window>
  <Slider Name="volume" Width="200" Height="30" Canvas.Left="0" Canvas.Top="320" Value="80" />
</Canvas>"#;

fn run_args(args: &[&str]) -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(std::iter::once("designer").chain(args.iter().copied()))?;
    run(&cli)
}

fn path_str(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[test]
fn test_import_then_export_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let markup = path_str(&dir, "layout.xaml");
    let project = path_str(&dir, "project.json");
    let exported = path_str(&dir, "exported.xaml");
    fs::write(&markup, MARKUP).expect("write markup");

    run_args(&["import", &markup, "-o", &project]).expect("import");
    let snapshot = ProjectDocument::from_json(&fs::read_to_string(&project).expect("read json"))
        .expect("valid snapshot");
    assert_eq!(snapshot.elements.len(), 3);
    assert_eq!(snapshot.roots.len(), 2);

    run_args(&["export", &project, "-o", &exported]).expect("export");
    let text = fs::read_to_string(&exported).expect("read exported");
    assert_eq!(text.trim_end(), MARKUP);
}

#[test]
fn test_fmt_normalises_hand_written_markup() {
    let dir = TempDir::new().expect("temp dir");
    let input = path_str(&dir, "messy.xaml");
    let output = path_str(&dir, "clean.xaml");
    fs::write(
        &input,
        "<?xml version=\"1.0\"?>\n<Canvas>\n<!-- note -->\n<CheckBox Name='agree' Content=\"I agree\"/>\n</Canvas>",
    )
    .expect("write input");

    run_args(&["fmt", &input, "-o", &output]).expect("fmt");
    let text = fs::read_to_string(&output).expect("read output");
    assert!(text.starts_with("<Canvas xmlns="));
    assert!(text.contains("  <CheckBox Name=\"agree\" Width=\"120\" Height=\"40\" Canvas.Left=\"100\" Canvas.Top=\"100\" Content=\"I agree\" />"));
    assert_eq!(decode(&text).len(), 1);
}

#[test]
fn test_fmt_emit_z_index_flag() {
    let dir = TempDir::new().expect("temp dir");
    let input = path_str(&dir, "in.xaml");
    let output = path_str(&dir, "out.xaml");
    fs::write(&input, MARKUP).expect("write input");

    run_args(&["fmt", &input, "-o", &output, "--emit-z-index"]).expect("fmt");
    let text = fs::read_to_string(&output).expect("read output");
    assert!(text.contains("Canvas.ZIndex=\"1\""));
    assert!(text.contains("Canvas.ZIndex=\"3\""));
}

#[test]
fn test_strict_flag_rejects_broken_markup() {
    let dir = TempDir::new().expect("temp dir");
    let input = path_str(&dir, "broken.xaml");
    let output = path_str(&dir, "out.xaml");
    fs::write(&input, "<Canvas><Window>").expect("write input");

    assert!(run_args(&["fmt", &input, "-o", &output, "--strict"]).is_err());
    assert!(!dir.path().join("out.xaml").exists());

    run_args(&["fmt", &input, "-o", &output]).expect("tolerant fmt");
    assert!(dir.path().join("out.xaml").exists());
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let missing = path_str(&dir, "nope.xaml");
    let err = run_args(&["fmt", &missing]).expect_err("missing file");
    assert!(err.to_string().contains("Failed to read"));
}

#[test]
fn test_config_file_is_applied() {
    let dir = TempDir::new().expect("temp dir");
    let config = path_str(&dir, "designer.json");
    let input = path_str(&dir, "in.xaml");
    let output = path_str(&dir, "out.xaml");
    fs::write(&config, r#"{"markup":{"nesting":"flatten"}}"#).expect("write config");
    fs::write(&input, MARKUP).expect("write input");

    run_args(&["fmt", &input, "-o", &output, "--config", &config]).expect("fmt");
    let text = fs::read_to_string(&output).expect("read output");
    assert!(text.contains("\n  <Button Name=\"ok\""));
    assert!(!text.contains("</Window>"));
}

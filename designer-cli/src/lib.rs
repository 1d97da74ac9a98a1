//! # Designer CLI
//!
//! Command-line front end for the UI designer. Converts between JSON
//! project snapshots and XAML-style markup, and normalises markup files.
//!
//! ## Usage
//!
//! ```bash
//! designer export project.json -o layout.xaml
//! designer import layout.xaml -o project.json
//! designer fmt layout.xaml --emit-z-index
//! ```
//!
//! Output goes to stdout unless `-o` is given. Logs go to stderr.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use designer_core::{
    decode_with, encode_with, DesignerConfig, EditorState, Nesting, ProjectDocument,
};

/// Command-line arguments for the designer.
#[derive(Debug, Clone, Parser)]
#[command(name = "designer")]
#[command(about = "Convert between designer projects and XAML markup")]
#[command(version)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Designer settings shared by all subcommands.
    #[command(flatten)]
    pub settings: Settings,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Write the markup for a JSON project snapshot.
    Export {
        /// Project snapshot to read.
        input: PathBuf,
        /// Markup file to write (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a JSON project snapshot from markup.
    Import {
        /// Markup file to read.
        input: PathBuf,
        /// Snapshot file to write (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode and re-encode markup in canonical form.
    Fmt {
        /// Markup file to read.
        input: PathBuf,
        /// Markup file to write (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Nesting modes accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NestingArg {
    /// Nested tags become children.
    Tree,
    /// Every tag becomes a root.
    Flatten,
}

impl From<NestingArg> for Nesting {
    fn from(arg: NestingArg) -> Self {
        match arg {
            NestingArg::Tree => Self::Tree,
            NestingArg::Flatten => Self::Flatten,
        }
    }
}

/// Designer settings. Flags override values from `--config`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Settings {
    /// JSON configuration file
    #[arg(long, global = true, env = "DESIGNER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Grid pitch used when snapping moves
    #[arg(long, global = true, env = "DESIGNER_GRID_SIZE")]
    pub grid_size: Option<i32>,

    /// Disable grid snapping
    #[arg(long, global = true)]
    pub no_snap: bool,

    /// How nested tags map to the element tree on import
    #[arg(long, global = true, value_enum, env = "DESIGNER_NESTING")]
    pub nesting: Option<NestingArg>,

    /// Write Canvas.ZIndex so stacking order survives a round trip
    #[arg(long, global = true)]
    pub emit_z_index: bool,

    /// Fail on structurally broken markup instead of recovering
    #[arg(long, global = true)]
    pub strict: bool,
}

impl Settings {
    /// Resolve the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the `--config` file cannot be read or parsed.
    pub fn resolve(&self) -> anyhow::Result<DesignerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                DesignerConfig::from_json(&json)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => DesignerConfig::default(),
        };
        if let Some(size) = self.grid_size {
            config.grid.size = size;
        }
        if self.no_snap {
            config.grid.enabled = false;
        }
        if let Some(nesting) = self.nesting {
            config.markup.nesting = nesting.into();
        }
        config.markup.emit_z_index |= self.emit_z_index;
        config.markup.strict |= self.strict;
        Ok(config)
    }
}

/// Render a JSON project snapshot as markup.
///
/// # Errors
///
/// Returns an error if the snapshot is malformed or inconsistent.
pub fn export_markup(json: &str, config: &DesignerConfig) -> anyhow::Result<String> {
    let state = ProjectDocument::from_json(json)?.into_state()?;
    tracing::debug!("Exporting {} elements", state.document.len());
    Ok(state.markup(&config.markup))
}

/// Build a JSON project snapshot from markup.
///
/// # Errors
///
/// Returns an error if strict decoding rejects the markup.
pub fn import_markup(text: &str, config: &DesignerConfig) -> anyhow::Result<String> {
    let mut state = EditorState::with_config(config);
    state.sync_from_markup(text, &config.markup)?;
    tracing::debug!("Imported {} elements", state.document.len());
    Ok(ProjectDocument::now(&state).to_json()?)
}

/// Decode and re-encode markup.
///
/// # Errors
///
/// Returns an error if strict decoding rejects the markup.
pub fn format_markup(text: &str, config: &DesignerConfig) -> anyhow::Result<String> {
    let document = decode_with(text, &config.markup)?;
    Ok(encode_with(&document, &config.markup))
}

/// Run a parsed command line.
///
/// # Errors
///
/// Returns an error on I/O failure or when the input cannot be converted.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.settings.resolve()?;
    let (input, output, convert): (_, _, fn(&str, &DesignerConfig) -> anyhow::Result<String>) =
        match &cli.command {
            Commands::Export { input, output } => (input, output, export_markup),
            Commands::Import { input, output } => (input, output, import_markup),
            Commands::Fmt { input, output } => (input, output, format_markup),
        };

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let converted =
        convert(&text, &config).with_context(|| format!("Failed to convert {}", input.display()))?;
    write_output(output.as_deref(), &converted)
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{content}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}").context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

// src/main.rs
// ============================================================================
// H5VIEW CLI
// ============================================================================
//
// Uso:
//   h5view tree scan.nxs
//   h5view show scan.nxs entry/data/data --axis 1 --slice 20 --min 10
//   h5view show scan.nxs entry/data/counts --display table
//   h5view save-data scan.nxs entry/data/counts counts.csv
//   h5view save-image scan.nxs entry/data/data plane.tif --slice 5
//   h5view render scan.nxs entry/data/data preview.png --cmap inferno
//   h5view browse ~/data
//
// ============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use h5view::{
    browser::DirectoryBrowser,
    tree::{hdf_subtree, open_tree},
    Colormap, Controls, DisplayType, Frame, Hdf5Source, SaveOutcome, Viewer, ViewerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "h5view")]
#[command(about = "Inspect HDF5/NeXus files: tree, values, tables, slices and images")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the group/dataset hierarchy
    Tree {
        file: PathBuf,

        /// Start from this group instead of the root
        #[arg(long)]
        path: Option<String>,

        /// Print JSON instead of a text tree
        #[arg(long)]
        json: bool,
    },

    /// Display one dataset the way the viewer would
    Show {
        file: PathBuf,
        key: String,

        #[command(flatten)]
        view: ViewArgs,

        /// Maximum table rows to print
        #[arg(long, default_value_t = 20)]
        rows: usize,
    },

    /// Save the displayed 1D/2D data as CSV
    SaveData {
        file: PathBuf,
        key: String,
        output: PathBuf,
    },

    /// Save the displayed 3D plane (tif, jpg, png or csv)
    SaveImage {
        file: PathBuf,
        key: String,
        output: PathBuf,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Write a colormapped PNG preview of the displayed image
    Render {
        file: PathBuf,
        key: String,
        output: PathBuf,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// List a directory as the file picker shows it
    Browse {
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Show every file, not only hdf/nxs/h5
        #[arg(long)]
        all: bool,

        /// Include hidden entries
        #[arg(long)]
        hidden: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    /// plot or table
    #[arg(long, default_value = "plot")]
    display: DisplayType,

    /// Slicing axis for 3D data (0, 1, 2)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    axis: u8,

    /// Slice index along the axis
    #[arg(long, default_value_t = 0)]
    slice: usize,

    /// Lower contrast level (0-254)
    #[arg(long, default_value_t = 0)]
    min: u8,

    /// Upper contrast level (1-255)
    #[arg(long, default_value_t = 255)]
    max: u8,

    /// gray, inferno, afmhot, viridis, magma
    #[arg(long, default_value = "gray")]
    cmap: Colormap,

    /// Plot marker
    #[arg(long, default_value = ",")]
    marker: String,
}

impl Default for ViewArgs {
    fn default() -> Self {
        let c = Controls::default();
        Self {
            display: c.display,
            axis: c.axis as u8,
            slice: c.slice,
            min: c.min,
            max: c.max,
            cmap: c.cmap,
            marker: c.marker,
        }
    }
}

impl ViewArgs {
    fn controls(&self, file: &Path, key: &str) -> Controls {
        Controls {
            file: file.to_string_lossy().into_owned(),
            key: key.to_string(),
            slice: self.slice,
            axis: self.axis as usize,
            cmap: self.cmap,
            display: self.display,
            marker: self.marker.clone(),
            min: self.min,
            max: self.max,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        Command::Tree { file, path, json } => cmd_tree(&config, &file, path.as_deref(), json),
        Command::Show { file, key, view, rows } => cmd_show(config, &file, &key, &view, rows),
        Command::SaveData { file, key, output } => {
            let view = ViewArgs { display: DisplayType::Table, ..ViewArgs::default() };
            let viewer = run_viewer(config, &file, &key, &view)?;
            let outcome = viewer
                .request_save_data(&output)
                .with_context(|| format!("{} is not 1D/2D data", key))?;
            report(outcome)
        }
        Command::SaveImage { file, key, output, view } => {
            let viewer = run_viewer(config, &file, &key, &view)?;
            let outcome = viewer
                .request_save_image(&output)
                .with_context(|| format!("{} is not a 3D dataset", key))?;
            report(outcome)
        }
        Command::Render { file, key, output, view } => {
            let viewer = run_viewer(config, &file, &key, &view)?;
            let (image, _) = viewer
                .frame()
                .image()
                .with_context(|| format!("{} is not displayed as an image", key))?;
            view.cmap
                .render(image.view())
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("  ✓ {} ({})", output.display(), view.cmap);
            Ok(())
        }
        Command::Browse { dir, all, hidden } => cmd_browse(&config, &dir, all, hidden),
    }
}

fn open_source(config: &ViewerConfig, file: &Path) -> Result<Hdf5Source> {
    let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    if !config.accepts(&name) {
        anyhow::bail!("Input must be hdf, nxs, or h5 format!");
    }
    Hdf5Source::open(file).with_context(|| format!("Failed to open {}", file.display()))
}

/// Un refresco del visor con los controles de la línea de comandos
fn run_viewer(config: ViewerConfig, file: &Path, key: &str, view: &ViewArgs) -> Result<Viewer> {
    let source = open_source(&config, file)?;
    let mut viewer = Viewer::new(config);
    viewer.set_controls(view.controls(file, key));
    viewer.refresh(&source);

    for notice in viewer.take_notices() {
        println!("  ! {}", notice);
    }
    Ok(viewer)
}

fn report(outcome: SaveOutcome) -> Result<()> {
    if !outcome.is_saved() {
        anyhow::bail!("{}", outcome);
    }
    println!("  ✓ {}", outcome);
    Ok(())
}

fn cmd_tree(config: &ViewerConfig, file: &Path, path: Option<&str>, json: bool) -> Result<()> {
    let (source, mut tree) = open_tree(file, &config.input_extensions)?;
    if let Some(path) = path {
        tree = hdf_subtree(&source, path)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", tree.render());
    }
    Ok(())
}

fn cmd_show(config: ViewerConfig, file: &Path, key: &str, view: &ViewArgs, rows: usize) -> Result<()> {
    let viewer = run_viewer(config, file, key, view)?;
    let controls = viewer.controls();

    println!("═══════════════════════════════════════════════════════════════");
    println!("  {} :: {}", file.display(), key);
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Value:   {}", viewer.value_text());
    println!("  Display: {}", viewer.frame().summary());
    if viewer.widgets().slice {
        println!(
            "  Axis {} slice {} (max {}), levels [{}, {}]",
            controls.axis,
            controls.slice,
            viewer.widgets().slice_max,
            controls.min,
            controls.max
        );
    }
    println!("═══════════════════════════════════════════════════════════════");

    match viewer.frame() {
        Frame::Table { table: Some(table), .. } => print!("{}", table.render(rows)),
        Frame::Plot { series, .. } => {
            for (x, y) in series.x.iter().zip(&series.y).take(rows) {
                println!("{:>14} {:>14}", x, y);
            }
            if series.len() > rows {
                println!("... ({} more points)", series.len() - rows);
            }
        }
        _ => {}
    }
    Ok(())
}

fn cmd_browse(config: &ViewerConfig, dir: &Path, all: bool, hidden: bool) -> Result<()> {
    let mut browser = DirectoryBrowser::new(dir).show_hidden(hidden);
    if !all {
        browser = browser.with_extensions(&config.input_extensions);
    }

    let entries = browser
        .entries()
        .with_context(|| format!("Cannot list {}", browser.path().display()))?;

    println!("{}", browser.path().display());
    for entry in entries {
        let marker = if entry.is_dir { "/" } else { "" };
        println!("  {}{}", entry.name, marker);
    }
    Ok(())
}

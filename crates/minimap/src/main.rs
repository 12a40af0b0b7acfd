// Chunk: docs/chunks/probe_cli - Layout probe binary
//!
//! lite-notebook: runs the minimap pipeline on a notebook file and reports
//! the resulting geometry.
//!
//! Cell heights are estimated from line counts, so the numbers show what the
//! minimap would do for a typical layout of the document. Set `RUST_LOG` for
//! engine diagnostics on stderr.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lite_notebook::{
    CellListView, DisplayList, ListViewOptions, MemoryStorage, QueryOverrides, RowSlot, SettingsBus,
    StaticLayout,
};
use lite_notebook_cells::load_ipynb;
use lite_notebook_input::{ScrollEvent, ViewportSize};

/// Inspect notebook minimap layout
#[derive(Parser)]
#[command(name = "lite-notebook", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lay out a notebook, scroll it and paint its minimap.
    Probe(ProbeArgs),
}

#[derive(Args)]
struct ProbeArgs {
    /// Path to an .ipynb file
    notebook: PathBuf,

    /// Container width in pixels
    #[arg(long, default_value_t = 1280.0)]
    viewport_width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 800.0)]
    viewport_height: f32,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    device_pixel_ratio: f32,

    /// Scroll position as a fraction of the scrollable range
    #[arg(long, default_value_t = 0.0, value_parser = parse_fraction)]
    scroll: f32,

    /// Settings query string, e.g. "minimap_width=200&minimap_debug=1"
    #[arg(long, default_value = "")]
    query: String,

    /// Write the painted display list as JSON
    #[arg(long)]
    dump_display_list: Option<PathBuf>,
}

fn parse_fraction(value: &str) -> Result<f32, String> {
    let fraction: f32 = value.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(format!("{} is not between 0 and 1", fraction))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Probe(args) => probe(args),
    }
}

fn probe(args: ProbeArgs) -> Result<()> {
    let notebook = load_ipynb(&args.notebook)
        .with_context(|| format!("failed to load {}", args.notebook.display()))?;
    let layout = StaticLayout::estimate(&notebook);

    let options = ListViewOptions {
        overrides: QueryOverrides::parse(&args.query),
        ..ListViewOptions::default()
    };
    let mut view = CellListView::new(
        notebook,
        layout,
        Rc::new(MemoryStorage::new()),
        Arc::new(SettingsBus::new()),
        options,
    );

    let viewport = ViewportSize::new(args.viewport_width, args.viewport_height)
        .with_device_pixel_ratio(args.device_pixel_ratio);
    let now = Instant::now();
    view.mount(viewport, now);

    let content_height = view
        .minimap_data()
        .map_or(0.0, |data| data.notebook_content_height);
    let max_scroll = (content_height - args.viewport_height).max(0.0);
    view.on_scroll(ScrollEvent::new(args.scroll * max_scroll), now);
    // Let the post-mount hydration passes run
    view.tick(now + Duration::from_secs(2));

    let mut canvas = DisplayList::new();
    let stats = view.paint(&mut canvas);

    let data = view.minimap_data().context("no minimap frame was computed")?;
    let thumb = view.minimap_viewport();
    let slots = view.row_slots();
    let placeholders = slots.iter().filter(|slot| !slot.is_hydrated()).count();

    println!("notebook        {}", args.notebook.display());
    println!("rows            {}", data.rows.len());
    println!("content height  {:.0}px", data.notebook_content_height);
    println!("track height    {:.0}px", data.total_content_height);
    println!("rail height     {:.0}px", data.rail_height);
    println!("scale           {:.4}", data.scale);
    println!("scroll top      {:.0}px (ratio {:.3})", view.scroll_top(), thumb.ratio);
    println!("track scroll    {:.1}px", thumb.mini_scroll_top);
    println!("thumb           top {:.1}px height {:.1}px", thumb.thumb_top, thumb.thumb_height);
    println!(
        "hydrated        {} of {} ({} placeholders)",
        view.hydrated().len(),
        slots.len(),
        placeholders
    );
    if let Some(RowSlot::Placeholder { id, height }) = slots.iter().find(|slot| !slot.is_hydrated()) {
        println!("first placeholder {} ({:.0}px)", id, height);
    }

    match stats {
        Some(stats) => {
            println!("rows painted    {}", stats.rows_painted);
            println!(
                "lines drawn     {}{}",
                stats.lines_drawn,
                if stats.line_cap_hit { " (cap hit)" } else { "" }
            );
            println!("backing store   {}x{}", canvas.backing_width, canvas.backing_height);
        }
        None => println!("minimap hidden (disabled or viewport too small)"),
    }

    if let Some(path) = args.dump_display_list {
        let json = serde_json::to_string_pretty(&canvas).context("failed to encode display list")?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        println!("display list    {}", path.display());
    }

    Ok(())
}

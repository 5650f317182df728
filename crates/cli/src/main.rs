//! Riparia CLI - country-subset vector ETL with river-proximity ranking

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use riparia_core::io::{read_csv_table, read_geojson_layer};
use riparia_core::Workspace;
use riparia_pipeline::prelude::*;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "riparia")]
#[command(author, version, about = "Country-subset vector ETL with river-proximity ranking", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full extraction / reprojection / proximity / ranking pipeline
    Run {
        /// Directory holding the world dataset (Cities.geojson, Country.geojson,
        /// Lakes.geojson, Rivers.geojson and the population rank CSV)
        world_dir: PathBuf,
        /// Boundary feature to extract
        #[arg(long, default_value = "Canada")]
        region: String,
        /// Name field on the boundary layer
        #[arg(long, default_value = "CNTRY_NAME")]
        region_field: String,
        /// Proximity threshold distance
        #[arg(short, long, default_value = "25")]
        distance: f64,
        /// Distance unit: miles, kilometers, meters
        #[arg(short, long, default_value = "miles")]
        unit: String,
        /// Well-known id of the target projection
        #[arg(long, default_value = "102002")]
        target_srid: u32,
        /// Population rank CSV (defaults to canadianCitiesPop.csv in the world dir)
        #[arg(long)]
        rank_csv: Option<PathBuf>,
        /// Rank-order column joined against object ids
        #[arg(long, default_value = "Rank")]
        rank_column: String,
        /// Output workspace name
        #[arg(long, default_value = "canada.gdb")]
        workspace: String,
    },
    /// Show information about the world dataset's source layers
    Info {
        /// Directory holding the world dataset
        world_dir: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

const SOURCE_LAYERS: [&str; 4] = ["Cities", "Country", "Lakes", "Rivers"];

/// Load whichever source layers exist in the world directory.
///
/// A missing file is not an error here: the pipeline's own presence check
/// reports it as a missing source, naming the stage and layer.
fn load_world(world_dir: &Path) -> Workspace {
    let pb = spinner("Reading world layers...");
    let mut world = Workspace::create(world_dir, "World");
    for name in SOURCE_LAYERS {
        let path = world_dir.join(format!("{}.geojson", name));
        match read_geojson_layer(&path, name) {
            Ok(layer) => {
                info!("loaded {} ({} records)", name, layer.len());
                world.insert_layer(layer);
            }
            Err(e) => info!("skipping {}: {}", name, e),
        }
    }
    pb.finish_and_clear();
    world
}

fn banner(config: &RunConfig) {
    println!("\nThis run derives a {}-scoped subset of the world layers,", config.region_name);
    println!("clips cities, boundary, lakes and rivers to the {} polygon,", config.region_name);
    println!("reports each derived layer and reprojects it to {},", config.target_crs().name());
    println!(
        "buffers the cities by {} {} to find those within {} {} of a river,",
        config.buffer_distance, config.buffer_unit, config.buffer_distance, config.buffer_unit
    );
    println!(
        "and joins the population rank table onto the far-from-river cities,"
    );
    println!("deleting every record left without a rank.");
    println!("\n---Pipeline starting---");
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            world_dir,
            region,
            region_field,
            distance,
            unit,
            target_srid,
            rank_csv,
            rank_column,
            workspace,
        } => {
            let unit: DistanceUnit = unit
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("invalid --unit")?;

            let config = RunConfig {
                workspace_location: world_dir.clone(),
                workspace_name: workspace,
                region_field,
                region_name: region,
                buffer_distance: distance,
                buffer_unit: unit,
                target_srid,
                rank_key_column: rank_column,
                ..RunConfig::default()
            };

            banner(&config);
            let started = Instant::now();

            let world = load_world(&world_dir);

            let mut active = Workspace::create(&config.workspace_location, &config.workspace_name);
            println!(
                "\n{} created in {}",
                config.workspace_name,
                config.workspace_location.display()
            );

            let rank_csv = rank_csv
                .unwrap_or_else(|| world_dir.join(format!("{}.csv", config.rank_table)));
            let table = read_csv_table(&rank_csv, &config.rank_table)
                .with_context(|| format!("failed to read rank table {}", rank_csv.display()))?;
            active.insert_table(table);

            let mut engine = MemoryEngine::new(world, active);

            // ── Stage 1: region extraction ───────────────────────────
            extract_region(&mut engine, &config)?;
            println!("\nFeatures clipped to the {} boundary", config.region_name);

            // ── Stage 2: layer catalog and reprojection ──────────────
            let catalog = catalog_and_reproject(&mut engine, &config)?;
            println!("\nFeatures extracted to {}\n", config.workspace_name);
            for entry in &catalog {
                println!(
                    "{} is a {} feature containing {} record(s)",
                    entry.name, entry.geometry_type, entry.record_count
                );
            }
            println!(
                "\nFeature classes projected to {}",
                config.target_crs().name()
            );

            // ── Stage 3: proximity classification ────────────────────
            let proximity = classify_proximity(&mut engine, &config)?;
            println!(
                "\n{} cities are within {} {} of a river",
                proximity.near_count, config.buffer_distance, config.buffer_unit
            );
            println!(
                "\n{} and {} created and extracted to {}",
                config.outputs.ranked, config.outputs.near, config.workspace_name
            );

            // ── Stage 4: ranking refinement ──────────────────────────
            let ranking = refine_ranking(&mut engine, &config)?;
            println!(
                "\n{} within {} {} of a river have been deleted",
                config.outputs.ranked, config.buffer_distance, config.buffer_unit
            );
            println!(
                "\nIncluding null records, {} contains {} records",
                config.outputs.ranked, ranking.pre_join_count
            );
            println!(
                "\nNull records have been deleted from {}",
                config.outputs.ranked
            );
            println!(
                "\n{} now contains {} records",
                config.outputs.ranked, ranking.final_count
            );

            let elapsed = started.elapsed();
            let minutes = elapsed.as_secs() / 60;
            let seconds = elapsed.as_secs() % 60;
            println!(
                "\n---The pipeline finished in {} minutes {} seconds---",
                minutes, seconds
            );
        }

        Commands::Info { world_dir } => {
            for name in SOURCE_LAYERS {
                let path = world_dir.join(format!("{}.geojson", name));
                match read_geojson_layer(&path, name) {
                    Ok(layer) => println!(
                        "{} is a {} feature containing {} record(s)",
                        layer.name(),
                        layer.geometry_type(),
                        layer.len()
                    ),
                    Err(e) => println!("{}: unavailable ({})", name, e),
                }
            }
        }
    }

    Ok(())
}

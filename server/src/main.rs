use anyhow::Context;
use bridge::server::FeatureBridge;
use catalog::config::CatalogConfig;
use catalog::generator::{build_catalog, GeneratorConfig};
use clap::Parser;
use eclipsecore::feature_source::MemorySource;
use eclipsecore::geometry::MapPoint;
use eclipsecore::panel::PanelFields;
use eclipsecore::query::SpatialQuery;
use eclipsecore::FeatureSource;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod bridge;
mod catalog;

#[derive(Parser)]
#[command(author, version, about = "Local eclipse path catalogue and feature endpoint")]
struct Args {
    /// Load the catalogue from YAML (or a saved `.json` service response)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Number of synthetic paths generated when no catalogue is given
    #[arg(long, default_value_t = 40)]
    synthetic: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Print the paths intersecting `--at` (or every path) and exit
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Query point as `LON,LAT`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    at: Option<MapPoint>,
    /// Keep the feature endpoint alive for the viewer
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = 9000)]
    port: u16,
}

fn parse_point(text: &str) -> Result<MapPoint, String> {
    let (lon, lat) = text
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT, got {text}"))?;
    let lon = lon.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let lat = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(MapPoint::new(lon, lat))
}

fn load_source(args: &Args) -> anyhow::Result<MemorySource> {
    if let Some(path) = &args.catalog {
        return Ok(CatalogConfig::load(path)?.into_source());
    }
    let features = build_catalog(&GeneratorConfig {
        count: args.synthetic,
        seed: args.seed,
        ..Default::default()
    })?;
    Ok(MemorySource::new(features))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let source = load_source(&args)?;
    let bridge = FeatureBridge::new();
    bridge.publish(source.clone())?;

    if args.offline {
        let query = args.at.map(SpatialQuery::at).unwrap_or_else(SpatialQuery::all);
        let features = source.query(&query).context("querying catalog")?;
        println!("Offline query -> {} eclipse paths", features.len());
        for feature in &features {
            let fields = PanelFields::from_record(&feature.record);
            println!(
                "{} {} {} {} | duration {} | width {} | magnitude {} | saros {}",
                feature.id,
                fields.type_label,
                fields.date,
                fields.time,
                fields.duration,
                fields.width,
                fields.magnitude,
                fields.saros
            );
        }
    }
    if args.serve {
        bridge.serve(args.port)?;
        bridge.publish_status("feature endpoint running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        let metrics = bridge.metrics().snapshot();
        bridge.publish_status(&format!(
            "served {} queries ({} rejected)",
            metrics.applied, metrics.failed
        ));
    }

    Ok(())
}

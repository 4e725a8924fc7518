use clap::{Parser, ValueEnum};
use nearby_places::adapters::{GooglePlacesClient, DEFAULT_PLACES_ENDPOINT};
use nearby_places::config::{resolve_api_key, API_KEY_ENV};
use nearby_places::core::{Category, LatLng, PriceRange, Query};
use nearby_places::utils::display::{render_list, write_csv};
use nearby_places::utils::logger;
use nearby_places::utils::validation::{validate_path, validate_url};
use nearby_places::{Aggregator, PlacesError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "places-search")]
#[command(about = "Run a single nearby search and print the ranked places")]
struct Args {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// Search radius in meters
    #[arg(long, default_value = "1000")]
    radius: u32,

    /// Comma-separated place types
    #[arg(long, value_delimiter = ',', default_value = "restaurant")]
    types: Vec<String>,

    #[arg(long, default_value = "0")]
    minprice: u8,

    #[arg(long, default_value = "4")]
    maxprice: u8,

    #[arg(long, default_value = "30")]
    limit: usize,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    #[arg(long, default_value = DEFAULT_PLACES_ENDPOINT)]
    endpoint: String,

    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long)]
    timeout_seconds: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

async fn run(args: Args) -> nearby_places::Result<()> {
    validate_url("endpoint", &args.endpoint)?;
    if let Some(path) = &args.output {
        validate_path("output", path)?;
    }

    let query = Query::new(
        LatLng::new(args.lat, args.lng),
        args.radius,
        args.types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(Category::from)
            .collect(),
        PriceRange::new(args.minprice, args.maxprice)?,
        args.limit,
    )?;

    let client = GooglePlacesClient::with_timeout(
        args.endpoint.clone(),
        args.timeout_seconds.map(Duration::from_secs),
    )?;
    let aggregator = Aggregator::new(client, resolve_api_key(args.api_key.as_deref()));

    tracing::info!("🔍 Searching {} categories", query.categories.len());
    let results = aggregator.search(&query).await?;

    let mut buffer = Vec::new();
    match args.format {
        OutputFormat::Table => buffer.extend_from_slice(render_list(&results).as_bytes()),
        OutputFormat::Json => serde_json::to_writer_pretty(&mut buffer, &results)?,
        OutputFormat::Csv => write_csv(&results, &mut buffer)?,
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &buffer)?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => print!("{}", String::from_utf8_lossy(&buffer)),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(args).await {
        tracing::error!(
            "❌ Search failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        let exit_code = match e {
            PlacesError::MissingApiKey => 3,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

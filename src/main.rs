use clap::Parser;
use nearby_places::config::SearchDefaults;
use nearby_places::core::ConfigProvider;
use nearby_places::utils::{logger, validation::Validate};
use nearby_places::utils::validation::validate_socket_addr;
use nearby_places::{server, AppState, CliConfig, PlacesError, TomlConfig};

fn exit_with(e: &PlacesError) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting nearby-places server");

    // 載入配置：有 --config 時以 TOML 為準
    let (provider, defaults): (Box<dyn ConfigProvider>, SearchDefaults) = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut toml = TomlConfig::from_file(path).unwrap_or_else(|e| exit_with(&e));
            if toml.places.api_key.is_none() {
                toml.places.api_key = cli.api_key.clone();
            }
            if let Err(e) = toml.validate() {
                exit_with(&e);
            }
            let defaults = toml.defaults.clone();
            (Box::new(toml), defaults)
        }
        None => {
            if let Err(e) = cli.validate() {
                exit_with(&e);
            }
            (Box::new(cli.clone()), SearchDefaults::default())
        }
    };

    let addr = validate_socket_addr("bind", provider.bind_address()).unwrap_or_else(|e| exit_with(&e));

    let state = AppState::from_config(provider.as_ref())?.with_defaults(defaults);

    if let Err(e) = server::serve(state, addr).await {
        tracing::error!(
            "❌ Server failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(3);
    }

    Ok(())
}

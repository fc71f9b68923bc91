mod cli;

use mediashelf::{
    catalog::CatalogService,
    config::{self, CatalogMode},
    server,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

/// Apply `--host`/`--port` on top of the `[server]` section.
fn apply_overrides(config: &mut config::Config, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    apply_overrides(&mut config, host, port);

    tracing::info!("Starting mediashelf server");
    tracing::info!(
        "Server will listen on {}:{} ({:?} catalog, {} libraries)",
        config.server.host,
        config.server.port,
        config.catalog.mode,
        config.libraries.len()
    );

    server::start_server(config).await
}

async fn list_path(
    config_path: Option<&std::path::Path>,
    library: usize,
    path: &str,
    hidden: bool,
    page: i64,
    size: i64,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    // A one-shot listing never waits for a full walk.
    config.catalog.mode = CatalogMode::OnDemand;

    std::fs::create_dir_all(&config.catalog.icon_cache_dir).with_context(|| {
        format!(
            "Failed to create icon cache directory: {:?}",
            config.catalog.icon_cache_dir
        )
    })?;

    let catalog = CatalogService::from_config(&config)?;
    let entries = catalog
        .list_library_path(library, path, hidden, page, size)
        .await?;

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediashelf=trace,mediashelf_common=debug,tower_http=debug".to_string()
        } else {
            "mediashelf=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::List {
            library,
            path,
            hidden,
            page,
            size,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_path(
                cli.config.as_deref(),
                library,
                path.as_deref().unwrap_or(""),
                hidden,
                page,
                size,
            ))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mediashelf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Catalog mode: {:?}", config.catalog.mode);
            println!("  TMDB enabled: {}", !config.tmdb.api_key.is_empty());
            println!("  Libraries: {}", config.libraries.len());
            for (id, library) in config.libraries.iter().enumerate() {
                println!("    [{}] {} -> {:?}", id, library.name, library.path);
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Catalog mode: {:?}", config.catalog.mode);
        }
    }

    Ok(())
}

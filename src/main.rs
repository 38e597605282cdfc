//! FC Product Configurator - command-line entry point
//!
//! Drives the configurator library the way the browser front end does:
//! select a product, pick options, read back the price and the shareable URL.

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use fc_configurator::cli::{Cli, Commands};
use fc_configurator::routing::{self, Route};
use fc_configurator::share::ShareParams;
use fc_configurator::storage::{read_saved_configuration, saved_configuration_ids};
use fc_configurator::{AppConfig, Catalog, Configurator};

/// Initialize logging; `RUST_LOG` overrides the default `info` level
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logger();
    debug!("FC configurator starting up");

    let cli = Cli::parse_args();

    if let Commands::Validate { config } = &cli.command {
        info!("Validating configuration file: {:?}", config);
        match AppConfig::load_from_file(config).and_then(|c| c.validate()) {
            Ok(()) => println!("✓ Configuration file is valid: {:?}", config),
            Err(e) => {
                error!("Configuration validation failed: {:#}", e);
                eprintln!("✗ Configuration validation failed: {:#}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let app_config = AppConfig::load_or_default(cli.config.as_deref())?;
    app_config.validate()?;
    let catalog = app_config.load_catalog()?;

    match cli.command {
        Commands::Products => print_catalog(&catalog),
        Commands::Quote {
            product,
            color,
            material,
            features,
            save,
        } => {
            let mut configurator =
                Configurator::new(catalog, Box::new(app_config.file_store()));
            run_quote(
                &mut configurator,
                &product,
                color.as_deref(),
                material.as_deref(),
                &features,
            );
            println!("{}", configurator.summary());
            println!("Share: {}", configurator.shareable_url(&app_config.base_url));

            if save {
                let outcome = configurator.save_configuration();
                match outcome.config_id() {
                    Some(id) => println!("✓ Saved configuration {}", id),
                    None => {
                        eprintln!("✗ {}", outcome.error().unwrap_or("Save failed"));
                        std::process::exit(1);
                    }
                }
            }
        }
        Commands::Open { url } => {
            let mut configurator =
                Configurator::new(catalog, Box::new(app_config.file_store()));
            run_open(&mut configurator, &url, &app_config.base_url)?;
        }
        Commands::Saved { id } => {
            let store = app_config.file_store();
            match id {
                Some(id) => {
                    let id = Uuid::parse_str(&id)
                        .with_context(|| format!("Invalid configuration id: {}", id))?;
                    let saved = read_saved_configuration(&store, &id)?
                        .with_context(|| format!("No saved configuration {}", id))?;
                    println!("{}", serde_json::to_string_pretty(&saved)?);
                }
                None => {
                    let ids = saved_configuration_ids(&store)?;
                    if ids.is_empty() {
                        println!("No saved configurations in {:?}", store.dir());
                    }
                    for id in ids {
                        if let Some(config) = read_saved_configuration(&store, &id)? {
                            println!(
                                "{}  {:<8} {:>9.2}",
                                id,
                                config.product_id.as_deref().unwrap_or("-"),
                                config.total_price
                            );
                        }
                    }
                }
            }
        }
        Commands::Validate { .. } => {}
    }

    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    for product in catalog.products() {
        println!("{} - {} ({:.2})", product.id, product.name, product.base_price);
        let groups = [
            ("colors", &product.options.colors),
            ("materials", &product.options.materials),
            ("features", &product.options.features),
        ];
        for (label, options) in groups {
            let listed: Vec<String> = options
                .iter()
                .map(|o| format!("{} +{:.2}", o.id, o.price_delta()))
                .collect();
            println!("    {:<10} {}", label, listed.join(", "));
        }
    }
}

/// Walk the wizard with the given choices, advancing while each step allows it
fn run_quote(
    configurator: &mut Configurator,
    product: &str,
    color: Option<&str>,
    material: Option<&str>,
    features: &[String],
) {
    configurator.select_product_by_id(product);
    if configurator.can_proceed() {
        configurator.next_step();
    }

    if let Some(color) = color {
        configurator.select_color_by_id(color);
    }
    if configurator.can_proceed() {
        configurator.next_step();
    }

    if let Some(material) = material {
        configurator.select_material_by_id(material);
    }
    if configurator.can_proceed() {
        configurator.next_step();
    }

    for feature in features {
        if !configurator.is_feature_selected(feature) {
            configurator.toggle_feature_by_id(feature);
        }
    }
}

fn run_open(configurator: &mut Configurator, url: &str, base_url: &str) -> Result<()> {
    let navigation = routing::navigate(url, configurator.state())?;
    if let Some(from) = navigation.redirected_from {
        println!("{} requires a product, showing the configurator", from.title());
    }
    println!("== {} ==", navigation.title());

    match navigation.route {
        Route::Configurator => {
            let params = navigation
                .query
                .as_deref()
                .map(ShareParams::from_query)
                .unwrap_or_default();
            if params.product().is_some() && !configurator.load_configuration(&params) {
                eprintln!("✗ Could not load configuration from {}", url);
                std::process::exit(1);
            }
            println!("{}", configurator.summary());
            let share = configurator.shareable_url(base_url);
            if !share.is_empty() {
                println!("Share: {}", share);
            }
        }
        Route::Home | Route::Summary => println!("{}", configurator.summary()),
        Route::NotFound => {
            eprintln!("✗ Page not found: {}", url);
            std::process::exit(1);
        }
    }
    Ok(())
}

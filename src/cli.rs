use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FC Product Configurator - configure, price and share products
#[derive(Parser)]
#[command(name = "fc-configurator")]
#[command(about = "Configure a product, see its price and share it as a URL")]
#[command(version)]
pub struct Cli {
    /// Path to an application config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the catalog with option prices
    Products,
    /// Configure a product and print its price and shareable URL
    Quote {
        /// Product id (unknown ids fall back to the first product)
        #[arg(short, long)]
        product: String,
        /// Color id
        #[arg(long)]
        color: Option<String>,
        /// Material id
        #[arg(short, long)]
        material: Option<String>,
        /// Feature id (repeatable)
        #[arg(short, long = "feature")]
        features: Vec<String>,
        /// Save the configuration to the local store
        #[arg(short, long)]
        save: bool,
    },
    /// Open a shareable URL, fragment or query string
    Open {
        /// e.g. "http://localhost:8080/#/configurator?product=suit&color=grey"
        url: String,
    },
    /// List saved configurations, or print one
    Saved {
        /// Configuration id to print
        id: Option<String>,
    },
    /// Validate an application config file
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

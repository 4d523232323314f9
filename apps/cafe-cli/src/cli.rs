//! Command-line definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cafe")]
#[command(version)]
#[command(about = "Café catalog client")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL; overrides the config file and CAFE_API_URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Logs in and stores the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Creates an account and logs in with it
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Forgets the stored token
    Logout,
    /// Shows the session resolved from the stored token
    Status,
    /// Lists the first page of products
    Products {
        /// Section the list by category
        #[arg(long)]
        grouped: bool,
    },
    /// Works with a single product
    Product {
        #[command(subcommand)]
        command: ProductCommand,
    },
    /// Lists product categories
    Categories,
    /// Manages the client configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ProductCommand {
    /// Shows one product
    Show {
        #[arg(value_name = "PRODUCT_ID")]
        id: String,
    },
    /// Creates a product, or updates it when --id is given
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: String,
        /// Category id (uses the first category if not provided)
        #[arg(long)]
        category: Option<String>,
        /// Photo to upload once the product is saved
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
        #[arg(long, requires = "image")]
        mime: Option<String>,
    },
    /// Uploads a photo for an existing product
    UploadImage {
        #[arg(value_name = "PRODUCT_ID")]
        id: String,
        #[arg(value_name = "PATH")]
        path: PathBuf,
        #[arg(long)]
        mime: Option<String>,
    },
    /// Deletes a product (not supported by this client)
    Delete {
        #[arg(value_name = "PRODUCT_ID")]
        id: String,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommand {
    /// Prints the effective configuration
    Show,
    /// Writes the effective configuration to the config file
    Init,
}

impl Command {
    /// Commands that only touch local configuration.
    pub fn is_offline(&self) -> bool {
        matches!(self, Command::Config { .. })
    }

    /// Commands that need a logged-in session.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Command::Products { .. } | Command::Product { .. } | Command::Categories
        )
    }
}

//! Command-line driver for the stock ledger.

use std::{fs::File, io, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use stockledger::{
    auth::{AccessGate, Principal, jwt::JwtVerifier},
    config::InventoryConfig,
    core::store::MemoryStore,
    csv_io,
    persist::sqlite::SqliteInventoryStore,
    product::{ProductInput, RawStock},
    runtime::handle::{InventoryHandle, spawn_inventory},
    types::ProductId,
};

/// Track product stock and its change history
#[derive(Parser, Debug)]
#[command(name = "stockledger")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database file (overrides STOCKLEDGER_DATABASE)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Bearer token for mutating commands
    #[arg(long, env = "STOCKLEDGER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every product
    List,
    /// Find products whose name contains QUERY
    Search {
        query: String,
        /// Only products in this exact category
        #[arg(long)]
        category: Option<String>,
    },
    /// List distinct categories
    Categories,
    /// Add a product
    Add(ProductArgs),
    /// Replace every attribute of a product
    Update {
        id: ProductId,
        #[command(flatten)]
        attrs: ProductArgs,
    },
    /// Delete a product
    Delete { id: ProductId },
    /// Show stock history, newest first
    History { id: ProductId },
    /// Import products from a CSV file
    Import { file: PathBuf },
    /// Export products as CSV (stdout when no file is given)
    Export { file: Option<PathBuf> },
    /// Issue a token for PRINCIPAL using the configured secret
    Token { principal: i64 },
}

#[derive(Args, Debug)]
struct ProductArgs {
    #[arg(long)]
    name: String,
    #[arg(long, allow_hyphen_values = true)]
    stock: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    unit: Option<String>,
    #[arg(long)]
    image: Option<String>,
}

impl From<ProductArgs> for ProductInput {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            category: args.category,
            brand: args.brand,
            stock: RawStock::Text(args.stock),
            unit: args.unit,
            image: args.image,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = InventoryConfig::from_env()?;
    if cli.database.is_some() {
        config.database = cli.database;
    }

    let jwt = JwtVerifier::new(&config.auth);
    if let Command::Token { principal } = cli.command {
        println!("{}", jwt.issue(Principal { id: principal })?);
        return Ok(());
    }

    let gate = AccessGate::new(jwt);
    let handle = match &config.database {
        Some(path) => spawn_inventory(SqliteInventoryStore::open(path)?, gate, config.runtime),
        None => {
            log::warn!("no database configured, using a throwaway in-memory store");
            spawn_inventory(MemoryStore::new(), gate, config.runtime)
        }
    };

    let header = cli.token.map(|t| format!("Bearer {t}"));
    let result = dispatch(&handle, header.as_deref(), cli.command).await;
    handle.shutdown().await?;
    result
}

async fn dispatch(
    handle: &InventoryHandle,
    credential: Option<&str>,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::List => print_json(&handle.list_products().await?),
        Command::Search { query, category } => {
            print_json(&handle.search_products(query, category).await?)
        }
        Command::Categories => print_json(&handle.list_categories().await?),
        Command::Add(attrs) => {
            let id = handle.create_product(credential, attrs.into()).await?;
            print_json(&serde_json::json!({ "id": id }))
        }
        Command::Update { id, attrs } => {
            let outcome = handle.update_product(credential, id, attrs.into()).await?;
            print_json(&serde_json::json!({ "updated": id, "history": outcome.history }))
        }
        Command::Delete { id } => {
            handle.delete_product(credential, id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Command::History { id } => print_json(&handle.get_history(id).await?),
        Command::Import { file } => {
            let rows = csv_io::read_rows(File::open(&file)?)?;
            let summary = handle.import_rows(credential, rows).await?;
            print_json(&summary)
        }
        Command::Export { file } => {
            let products = handle.export_products().await?;
            match file {
                Some(path) => csv_io::write_products(File::create(path)?, &products)?,
                None => csv_io::write_products(io::stdout().lock(), &products)?,
            }
            Ok(())
        }
        Command::Token { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

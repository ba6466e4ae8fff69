use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use dotenvy::dotenv;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use configs::AppConfig;
use models::{fields_from_value, parse_id, ProductFields};
use service::{DynProductCatalog, ProductCatalog, ProductStore, StoreOptions};

const USAGE: &str = "usage: products [list | get <id> | add <json> | update <id> <json> | delete <id> | demo]";

#[derive(Debug)]
enum Command {
    List,
    Get(u64),
    Add(ProductFields),
    Update(u64, ProductFields),
    Delete(u64),
    Demo,
}

fn parse_fields(raw: &str) -> anyhow::Result<ProductFields> {
    let value: serde_json::Value = serde_json::from_str(raw).context("product fields are not valid JSON")?;
    Ok(fields_from_value(value)?)
}

fn parse_command(args: &[String]) -> anyhow::Result<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = match args.as_slice() {
        [] | ["demo"] => Command::Demo,
        ["list"] => Command::List,
        ["get", id] => Command::Get(parse_id(id)?),
        ["add", raw] => Command::Add(parse_fields(raw)?),
        ["update", id, raw] => Command::Update(parse_id(id)?, parse_fields(raw)?),
        ["delete", id] => Command::Delete(parse_id(id)?),
        _ => return Err(anyhow!(USAGE)),
    };
    Ok(command)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Add a sample product, show the list, delete it, show the list again.
async fn demo(catalog: &dyn ProductCatalog) -> anyhow::Result<()> {
    let sample = fields_from_value(json!({
        "title": "Zapatilla",
        "description": "Con cordones fluor",
        "price": 10000,
        "thumbnail": "nike.jpg",
        "code": "za-001",
        "stock": 50
    }))?;
    let created = catalog.add(sample).await?;
    info!(event = "demo_added", id = created.id, "sample product added");

    println!("Products before delete:");
    print_json(&catalog.list().await?)?;

    print_json(&catalog.delete(created.id).await?)?;

    println!("Products after delete:");
    print_json(&catalog.list().await?)?;
    Ok(())
}

async fn run(cfg: &AppConfig, command: Command) -> anyhow::Result<()> {
    let path = PathBuf::from(&cfg.store.path);
    let options = StoreOptions::from(&cfg.store);
    service::runtime::ensure_data_dir(&path).await?;

    let catalog: DynProductCatalog = Arc::new(ProductStore::with_options(&path, options));
    info!(event = "store_open", path = %path.display(), ?options, "product store ready");

    match command {
        Command::List => print_json(&catalog.list().await?)?,
        Command::Get(id) => match catalog.get_by_id(id).await? {
            Some(product) => print_json(&product)?,
            None => bail!("product not found with id: {id}"),
        },
        Command::Add(fields) => print_json(&catalog.add(fields).await?)?,
        Command::Update(id, fields) => print_json(&catalog.update(id, fields).await?)?,
        Command::Delete(id) => print_json(&catalog.delete(id).await?)?,
        Command::Demo => demo(catalog.as_ref()).await?,
    }
    Ok(())
}

fn init_logging(format: &str) {
    common::utils::logging::init_logging(format);
    info!(service = "products", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    // load .env first so RUST_LOG, CONFIG_PATH and PRODUCTS_PATH apply
    dotenv().ok();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_logging("compact");
            error!(service = "products", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&cfg.logging.format);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(e) => {
            error!(service = "products", event = "bad_arguments", error = %e, "{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let run_id = Uuid::new_v4();
    info!(service = "products", event = "start", %run_id, version = env!("CARGO_PKG_VERSION"), "products command starting");

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "products", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(&cfg, command)) {
        Ok(()) => {
            info!(service = "products", event = "stop", %run_id, "products command finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "products", event = "run_failed", %run_id, error = %e, "products command failed");
            ExitCode::FAILURE
        }
    }
}

use clap::Parser;
use clinic_overlay::api::ClinicApi;
use clinic_overlay::config::{ClinicConfig, ClinicHome};
use clinic_overlay::error::{ClinicError, Result};
use clinic_overlay::model::{Entity, Namespace};
use clinic_overlay::overlay::OverlayStore;
use clinic_overlay::seeds;
use clinic_overlay::store::fs::FsBackend;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

mod args;
mod print;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: ClinicApi<FsBackend>,
    json: bool,
}

/// Run `$handler` with the seed of whichever entity `$entity` names.
macro_rules! with_entity {
    ($entity:expr, $handler:ident, $ctx:expr $(, $arg:expr)*) => {
        match $entity.parse::<Namespace>()? {
            Namespace::Appointments => $handler($ctx, seeds::appointments() $(, $arg)*),
            Namespace::Invoices => $handler($ctx, seeds::invoices() $(, $arg)*),
            Namespace::Patients => $handler($ctx, seeds::patients() $(, $arg)*),
        }
    };
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::List { entity } => with_entity!(entity, handle_list, &ctx),
        Commands::Create { entity, record } => {
            with_entity!(entity, handle_create, &ctx, &record)
        }
        Commands::Update { entity, id, patch } => {
            with_entity!(entity, handle_update, &ctx, &id, &patch)
        }
        Commands::Delete { entity, id } => with_entity!(entity, handle_delete, &ctx, &id),
        Commands::Clear { entity } => handle_clear(&ctx, entity.parse()?),
        Commands::Tombstones { entity } => with_entity!(entity, handle_tombstones, &ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = ClinicHome::resolve()?;
    init_logging(&home.config, cli.verbose);

    let store = OverlayStore::new(home.backend()).with_pretty_json(home.config.pretty_json);
    Ok(AppContext {
        api: ClinicApi::new(store),
        json: cli.json,
    })
}

fn init_logging(config: &ClinicConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn to_values<T: Entity>(records: &[T]) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|r| serde_json::to_value(r).map_err(ClinicError::Serialization))
        .collect()
}

fn output<T: Entity>(ctx: &AppContext, records: &[T]) -> Result<()> {
    let values = to_values(records)?;
    if ctx.json {
        print::print_json(&Value::Array(values));
    } else {
        print::print_table(&values);
    }
    Ok(())
}

fn handle_list<T: Entity>(ctx: &AppContext, seed: &[T]) -> Result<()> {
    let records = ctx.api.list(seed);
    output(ctx, &records)
}

fn handle_create<T: Entity>(ctx: &AppContext, seed: &[T], record: &str) -> Result<()> {
    let record: T = serde_json::from_str(record)?;
    let created = ctx.api.create(seed, record)?;
    if !ctx.json {
        print::print_success(&format!("Created {} ({})", created.id(), T::NAMESPACE));
    }
    output(ctx, std::slice::from_ref(&created))
}

fn handle_update<T: Entity>(ctx: &AppContext, seed: &[T], id: &str, patch: &str) -> Result<()> {
    let patch: Value = serde_json::from_str(patch)?;
    match ctx.api.update(seed, id, &patch)? {
        Some(updated) => {
            if !ctx.json {
                print::print_success(&format!("Updated {} ({})", id, T::NAMESPACE));
            }
            output(ctx, std::slice::from_ref(&updated))
        }
        None => Err(ClinicError::Api(format!(
            "No record with id {} in {}",
            id,
            T::NAMESPACE
        ))),
    }
}

fn handle_delete<T: Entity>(ctx: &AppContext, seed: &[T], id: &str) -> Result<()> {
    if ctx.api.delete(seed, id)? {
        print::print_success(&format!("Deleted {} ({})", id, T::NAMESPACE));
        Ok(())
    } else {
        Err(ClinicError::Api(format!(
            "No record with id {} in {}",
            id,
            T::NAMESPACE
        )))
    }
}

fn handle_clear(ctx: &AppContext, ns: Namespace) -> Result<()> {
    ctx.api.clear(ns)?;
    print::print_success(&format!("Cleared local changes for {}", ns));
    Ok(())
}

fn handle_tombstones<T: Entity>(ctx: &AppContext, _seed: &[T]) -> Result<()> {
    let deleted = ctx.api.overlay::<T>().deleted_ids;
    if ctx.json {
        print::print_json(&Value::from(deleted));
    } else if deleted.is_empty() {
        print::print_info("No deleted records.");
    } else {
        for id in deleted {
            println!("{}", id);
        }
    }
    Ok(())
}

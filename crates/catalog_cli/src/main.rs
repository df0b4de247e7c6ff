//! Catalog command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto catalog services over one SQLite connection.
//! - Print responses as JSON on stdout and errors with their kind on stderr.

mod args;

use anyhow::Context;
use args::{BookCommand, CategoryArgs, CategoryCommand, CliArgs, Command, CreateBookArgs};
use catalog_core::db::open_db;
use catalog_core::{
    core_version, default_log_level, init_logging, BookService, CatalogError, CategoryRequest,
    CategoryService, CreateBookRequest, ErrorKind, SqliteCatalogStore,
};
use clap::Parser;
use serde_json::Value;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = CliArgs::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let kind = err.downcast_ref::<CatalogError>().map(CatalogError::kind);
            match kind {
                Some(kind) => eprintln!("error kind={kind}: {err:#}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::from(exit_code(kind))
        }
    }
}

fn run(cli: CliArgs) -> anyhow::Result<String> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &absolute(log_dir)?).context("failed to initialize logging")?;
    }

    let value = match cli.command {
        Command::Version => Value::String(core_version().to_string()),
        Command::Book(command) => {
            let mut conn = open_db(&cli.db)
                .with_context(|| format!("failed to open `{}`", cli.db.display()))?;
            let mut service = BookService::new(SqliteCatalogStore::try_new(&mut conn)?);
            run_book(&mut service, command)?
        }
        Command::Category(command) => {
            let mut conn = open_db(&cli.db)
                .with_context(|| format!("failed to open `{}`", cli.db.display()))?;
            let mut service = CategoryService::new(SqliteCatalogStore::try_new(&mut conn)?);
            run_category(&mut service, command)?
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}

fn run_book(
    service: &mut BookService<SqliteCatalogStore<'_>>,
    command: BookCommand,
) -> anyhow::Result<Value> {
    let value = match command {
        BookCommand::Create(args) => serde_json::to_value(service.create(&book_request(args))?)?,
        BookCommand::Get { id } => serde_json::to_value(service.get_by_id(id)?)?,
        BookCommand::List => serde_json::to_value(service.list_all()?)?,
        BookCommand::Delete { id } => {
            service.delete(id)?;
            serde_json::json!({ "deleted": id })
        }
    };
    Ok(value)
}

fn run_category(
    service: &mut CategoryService<SqliteCatalogStore<'_>>,
    command: CategoryCommand,
) -> anyhow::Result<Value> {
    let value = match command {
        CategoryCommand::Create(args) => {
            serde_json::to_value(service.create(&category_request(args))?)?
        }
        CategoryCommand::Get { id } => serde_json::to_value(service.get_by_id(id)?)?,
        CategoryCommand::List => serde_json::to_value(service.list_all()?)?,
        CategoryCommand::Update { id, fields } => {
            serde_json::to_value(service.update(id, &category_request(fields))?)?
        }
        CategoryCommand::Delete { id } => {
            service.delete(id)?;
            serde_json::json!({ "deleted": id })
        }
    };
    Ok(value)
}

fn book_request(args: CreateBookArgs) -> CreateBookRequest {
    CreateBookRequest {
        title: args.title,
        author: args.author,
        isbn: args.isbn,
        publication_year: args.publication_year,
        category_id: args.category_id,
        category_name: args.category_name,
    }
}

fn category_request(args: CategoryArgs) -> CategoryRequest {
    CategoryRequest {
        name: args.name,
        description: args.description,
    }
}

fn absolute(path: &Path) -> anyhow::Result<std::path::PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.join(path))
}

fn exit_code(kind: Option<ErrorKind>) -> u8 {
    match kind {
        Some(ErrorKind::InvalidRequest) => 2,
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::Conflict) => 4,
        Some(ErrorKind::Internal) | None => 1,
    }
}

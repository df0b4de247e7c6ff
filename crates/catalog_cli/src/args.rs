//! Command-line arguments and environment fallbacks.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Book and category catalog", version)]
pub struct CliArgs {
    #[arg(
        long,
        env = "CATALOG_DB_PATH",
        value_name = "FILE",
        default_value = "catalog.sqlite3",
        help = "SQLite database file",
        global = true
    )]
    pub db: PathBuf,

    #[arg(
        long,
        env = "CATALOG_LOG_LEVEL",
        value_name = "LEVEL",
        help = "Log level (trace|debug|info|warn|error); defaults by build mode",
        global = true
    )]
    pub log_level: Option<String>,

    #[arg(
        long,
        env = "CATALOG_LOG_DIR",
        value_name = "DIR",
        help = "Directory for rolling log files; logging is off when unset",
        global = true
    )]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Book operations
    #[command(subcommand)]
    Book(BookCommand),
    /// Category operations
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Print the core version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum BookCommand {
    /// Create a book; the category is selected by id or by name
    Create(CreateBookArgs),
    Get {
        id: i64,
    },
    List,
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct CreateBookArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub author: String,
    #[arg(long)]
    pub isbn: String,
    #[arg(long = "year", value_name = "YEAR", allow_negative_numbers = true)]
    pub publication_year: i32,
    #[arg(long)]
    pub category_id: Option<i64>,
    #[arg(long)]
    pub category_name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    Create(CategoryArgs),
    Get {
        id: i64,
    },
    List,
    /// Replace name and description of a category
    Update {
        id: i64,
        #[command(flatten)]
        fields: CategoryArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct CategoryArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
}

//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve named resources to URLs
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Print each resolution step
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: nearest resloc.toml)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Home directory for home-relative lookups (overrides config and RESLOC_HOME)
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub home: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve a name and print its locator
    #[command(visible_alias = "r")]
    Resolve {
        /// Resource name, file path or URL
        name: String,

        /// Print name, locator and matching step as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a name and print the resource text
    #[command(visible_alias = "c")]
    Cat {
        /// Resource name, file path or URL
        name: String,
    },

    /// Resolve a name and print its path relative to the home directory
    Relative {
        /// Resource name, file path or URL
        name: String,
    },

    /// Derive the resource name for a qualified type name and resolve it
    TypeName {
        /// Qualified name, e.g. `my_app::config::Settings` or `org.example.Settings`
        qualified: String,
    },
}

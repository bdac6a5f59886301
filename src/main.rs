//! resbridge - resolve logical cloud objects from Kubernetes resources
//!
//! The binary front end over the composition engine: resolve a composite
//! schema against a cluster instance, optionally enrich it with related
//! Service/Ingress connection info, and print the composed object.

use anyhow::Result;
use clap::{Parser, Subcommand};

use resbridge::cli::{self, OutputFormat, ResolveRequest};

/// Resolve logical cloud objects from Kubernetes resources
#[derive(Parser, Debug)]
#[command(name = "resbridge")]
#[command(about = "Resolve logical cloud objects from Kubernetes resources", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a logical object and print it
    Resolve {
        /// Schema name (catalog or user manifest) or a manifest file path
        #[arg(long, short = 's')]
        schema: String,

        /// Instance name
        name: String,

        /// Namespace (defaults to the configured namespace)
        #[arg(long, short = 'n')]
        namespace: Option<String>,

        /// External field values as key=value (value may be JSON)
        #[arg(long = "external", short = 'e', value_name = "KEY=VALUE")]
        externals: Vec<String>,

        /// Enrich with related kinds (comma separated; empty uses the
        /// configured set)
        #[arg(long, value_name = "KINDS", num_args = 0..=1, default_missing_value = "")]
        enrich: Option<String>,

        /// Output format
        #[arg(long, short = 'o', value_enum, default_value = "json")]
        output: OutputFormat,
    },
    /// Schema management
    Schema {
        #[command(subcommand)]
        subcommand: SchemaSubcommand,
    },
}

/// Schema management subcommands
#[derive(Subcommand, Debug)]
enum SchemaSubcommand {
    /// List available schemas
    List,
    /// Show one schema in full
    Show {
        /// Schema name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    cli::init_logging(args.debug);

    match args.command {
        Command::Resolve {
            schema,
            name,
            namespace,
            externals,
            enrich,
            output,
        } => {
            cli::handle_resolve(ResolveRequest {
                schema,
                name,
                namespace,
                externals,
                enrich,
                output,
            })
            .await
        }
        Command::Schema { subcommand } => match subcommand {
            SchemaSubcommand::List => cli::handle_schema_list(),
            SchemaSubcommand::Show { name } => cli::handle_schema_show(&name),
        },
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use rise_compiler::{Compiler, StandardCompiler};
use rise_config::Definition;
use rise_pipeline::{CompiledApi, Handle, Handles};

/// Rise - compile declarative GraphQL resolvers into pipeline templates
#[derive(Parser)]
#[command(name = "rise")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Compile a definition and print the resolver artifacts
  Compile {
    /// Path to the definition file (JSON or YAML)
    definition: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    handles: HandleArgs,
  },

  /// Compile a definition and report problems without printing artifacts
  Check {
    /// Path to the definition file (JSON or YAML)
    definition: PathBuf,

    #[command(flatten)]
    handles: HandleArgs,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
  Json,
  Yaml,
}

/// Names of the externally provisioned resources steps depend on.
#[derive(clap::Args)]
struct HandleArgs {
  /// Schema handle name
  #[arg(long, default_value = "api-schema")]
  schema_handle: String,

  /// Key-value store data source name
  #[arg(long, default_value = "DynamoDataSource")]
  store_handle: String,

  /// Event bus data source name
  #[arg(long, default_value = "EventBridgeDataSource")]
  bus_handle: String,
}

impl From<HandleArgs> for Handles {
  fn from(args: HandleArgs) -> Self {
    Handles {
      schema: Handle::new(args.schema_handle),
      store: Handle::new(args.store_handle),
      bus: Handle::new(args.bus_handle),
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match cli.command {
    Some(Commands::Compile {
      definition,
      format,
      output,
      handles,
    }) => {
      let api = compile(&definition, handles.into())?;
      let rendered = render(&api, format)?;
      match output {
        Some(path) => {
          std::fs::write(&path, rendered)
            .with_context(|| format!("failed to write output: {}", path.display()))?;
          eprintln!("Wrote {} fields to {}", api.fields.len(), path.display());
        }
        None => println!("{rendered}"),
      }
    }
    Some(Commands::Check {
      definition,
      handles,
    }) => {
      let api = compile(&definition, handles.into())?;
      let steps = api.steps().count();
      eprintln!(
        "{}: {} fields, {} pipeline steps",
        api.name,
        api.fields.len(),
        steps
      );
    }
    None => {
      println!("rise - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_logging(verbose: u8) {
  let level = match verbose {
    0 => "info",
    1 => "debug",
    _ => "trace",
  };
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(verbose >= 2)
    .with_writer(std::io::stderr)
    .init();
}

fn compile(path: &Path, handles: Handles) -> Result<CompiledApi> {
  let definition = Definition::load(path)
    .with_context(|| format!("failed to load definition: {}", path.display()))?;
  debug!(path = %path.display(), app = %definition.config.name, "compiling definition");

  let compiler = StandardCompiler::new(handles).context("failed to create compiler")?;
  compiler
    .compile(&definition)
    .with_context(|| format!("failed to compile definition: {}", path.display()))
}

fn render(api: &CompiledApi, format: OutputFormat) -> Result<String> {
  let rendered = match format {
    OutputFormat::Json => serde_json::to_string_pretty(api).context("failed to serialize output")?,
    OutputFormat::Yaml => serde_yaml::to_string(api).context("failed to serialize output")?,
  };
  Ok(rendered)
}

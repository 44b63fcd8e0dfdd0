//! SimpyUI CLI — copy animated React components into your project.

mod commands;
mod config;
mod installer;
mod logging;

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{Args, CommandFactory, Parser, Subcommand};
use simpyui_registry::{RegistrySource, DEFAULT_REGISTRY_URL};

use commands::add::AddOptions;

#[derive(Parser)]
#[command(
    name = "simpyui",
    version,
    about = "Add SimpyUI components to your React project",
    after_help = "Run `simpyui <component>` as a shorthand for `simpyui add <component>`."
)]
struct Cli {
    /// Registry document URL or local path
    #[arg(long, global = true, env = "SIMPYUI_REGISTRY", default_value = DEFAULT_REGISTRY_URL)]
    registry: String,
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true)]
    cwd: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create components.json for this project
    Init {
        /// Accept detected defaults without prompting
        #[arg(short, long)]
        yes: bool,
        /// Overwrite an existing components.json without asking
        #[arg(long)]
        force: bool,
    },
    /// Add components and their dependencies
    Add(AddArgs),
    /// List available components
    #[command(visible_alias = "ls")]
    List,
    /// Show what `add` would write and install, without changing anything
    Diff {
        /// Component slugs
        names: Vec<String>,
    },
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Component slugs
    names: Vec<String>,
    /// Add every component in the registry
    #[arg(long)]
    all: bool,
    /// Print the package install command instead of running it
    #[arg(long)]
    skip_install: bool,
}

impl AddArgs {
    fn options(&self) -> AddOptions {
        AddOptions {
            all: self.all,
            skip_install: self.skip_install,
        }
    }
}

/// `simpyui <component...> [flags]`, parsed with the `add` arguments.
#[derive(Parser, Debug)]
#[command(name = "simpyui", no_binary_name = true)]
struct Shorthand {
    #[command(flatten)]
    add: AddArgs,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: {e:#}");
    }

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let project_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("reading current directory")?,
    };

    match cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }

        Some(Commands::Init { yes, force }) => commands::init::run(&project_dir, yes, force),

        Some(Commands::Add(args)) => {
            commands::add::check_usage(&args.names, args.all)?;
            let source = open_source(&cli.registry)?;
            let registry = commands::load_registry(source.as_ref())?;
            commands::add::run(
                &project_dir,
                source.as_ref(),
                &registry,
                &args.names,
                args.options(),
            )
        }

        Some(Commands::List) => {
            let source = open_source(&cli.registry)?;
            let registry = commands::load_registry(source.as_ref())?;
            commands::list::run(&registry)
        }

        Some(Commands::Diff { names }) => {
            if names.is_empty() {
                bail!("no components specified\n\nUsage: simpyui diff <component...>");
            }
            let source = open_source(&cli.registry)?;
            let registry = commands::load_registry(source.as_ref())?;
            commands::diff::run(&project_dir, &registry, &names)
        }

        Some(Commands::External(raw)) => {
            let Some(first) = raw.first().cloned() else {
                bail!("no command given\n\nRun `simpyui --help` for usage.");
            };
            let args = parse_shorthand(&raw)?;
            let source = open_source(&cli.registry)?;
            let registry = commands::load_registry(source.as_ref())?;
            if !registry.contains(&first) {
                bail!(
                    "unknown command or component '{first}'\n\n\
                     Run `simpyui list` to see available components or `simpyui --help` for usage."
                );
            }
            commands::add::run(
                &project_dir,
                source.as_ref(),
                &registry,
                &args.names,
                args.options(),
            )
        }
    }
}

fn parse_shorthand(raw: &[String]) -> anyhow::Result<AddArgs> {
    match Shorthand::try_parse_from(raw) {
        Ok(shorthand) => Ok(shorthand.add),
        Err(e) => {
            let rendered = e.render().to_string();
            let message = rendered.trim().trim_start_matches("error: ");
            let first_line = message.lines().next().unwrap_or(message);
            bail!("{first_line}\n\nRun `simpyui add --help` for the accepted flags.")
        }
    }
}

fn open_source(location: &str) -> anyhow::Result<Box<dyn RegistrySource>> {
    simpyui_registry::open(location).with_context(|| format!("opening registry {location}"))
}

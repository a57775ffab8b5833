//! Frostline CLI
//!
//! Freezes the bundled demo application into static HTML files.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Frostline.
#[derive(Parser)]
#[command(
    name = "frostline",
    version,
    about = "Freeze a web application into a static site"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "frostline.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Freeze every route of the application into static files
    Freeze {
        /// Output directory (overrides `destination`)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Route names to leave out of the default route list
        #[arg(long)]
        exclude: Vec<String>,
        /// Do not follow routes linked from rendered pages
        #[arg(long)]
        no_discovery: bool,
    },
    /// List the named routes of the application
    Routes,
    /// Serve a frozen site for preview
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
        /// Directory to serve
        #[arg(short, long, default_value = "build")]
        dir: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    frostline::init_tracing(cli.verbose);

    match cli.command {
        Commands::Freeze {
            output,
            exclude,
            no_discovery,
        } => {
            frostline::cmd::freeze::run(&cli.config, output.as_deref(), &exclude, no_discovery)
                .await?;
        }
        Commands::Routes => {
            frostline::cmd::routes::run(&cli.config)?;
        }
        Commands::Serve { port, dir } => {
            frostline::cmd::serve::run(&dir, port).await?;
        }
    }

    Ok(())
}

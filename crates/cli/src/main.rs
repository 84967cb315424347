mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gatefold")]
#[command(version, about = "Gatefold record player pages for album releases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a release directory from the audio files in it
    Init {
        /// Path to the release directory
        path: PathBuf,

        /// Artist name written to gatefold.toml
        #[arg(long)]
        artist: Option<String>,

        /// Release title written to gatefold.toml
        #[arg(long)]
        title: Option<String>,
    },

    /// Validate release configuration and files
    Validate {
        /// Path to release directory
        path: PathBuf,
    },

    /// Preview the page locally with hot reload
    Preview {
        /// Path to release directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// wasm-pack output directory for gatefold-web, served at /pkg
        #[arg(long)]
        pkg: Option<PathBuf>,
    },

    /// Build the static page
    Build {
        /// Path to release directory
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,

        /// wasm-pack output directory for gatefold-web, copied to <output>/pkg
        #[arg(long)]
        pkg: Option<PathBuf>,

        /// Serve audio from this base URL instead of /audio
        #[arg(long)]
        audio_base_url: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            path,
            artist,
            title,
        } => commands::init::run(path, artist, title).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Preview { path, port, pkg } => commands::preview::run(path, port, pkg).await,
        Command::Build {
            path,
            output,
            pkg,
            audio_base_url,
        } => commands::build::run(path, output, pkg, audio_base_url).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "gatefold", &mut io::stdout());
            Ok(())
        }
    }
}

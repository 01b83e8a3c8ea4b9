mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blog-mirror")]
#[command(version, about = "Mirror a WordPress blog as a static site", long_about = None)]
struct Cli {
    /// Path to the site configuration
    #[arg(short, long, global = true, default_value = blog_mirror_core::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Crawl the source blog into the JSON dataset and download its images
    Crawl,

    /// Generate the static site from the JSON dataset
    Generate,

    /// Serve the generated site locally
    Serve {
        /// Port to serve on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
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
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Crawl => commands::crawl::run(cli.config).await,
        Command::Generate => commands::generate::run(cli.config).await,
        Command::Serve { port } => commands::serve::run(cli.config, port).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "blog-mirror", &mut io::stdout());
            Ok(())
        }
    }
}

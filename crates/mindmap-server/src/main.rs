use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "mindmap")]
#[command(about = "Chat with an LLM and turn its replies into mind maps", long_about = None)]
struct Cli {
    /// Configuration file (defaults to <config dir>/mindmap-chat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Chat in the terminal using the stored API key
    Chat {
        /// Write the latest mind map as SVG after every reply
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Manage the stored API key
    Credential {
        #[command(subcommand)]
        action: CredentialAction,
    },
    /// Render a markdown outline file to SVG
    Render {
        outline: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Export a markdown outline file to PNG
    Export {
        outline: PathBuf,
        /// Output file (defaults to the configured file name, mindmap.png)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CredentialAction {
    /// Validate a key and store it (prompts when omitted)
    Set { key: Option<String> },
    /// Show whether a key is stored (masked)
    Show,
    /// Remove the stored key
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = commands::Context::load(cli.config)?;

    match cli.command {
        Commands::Serve { host, port } => commands::serve::run(context, host, port).await?,
        Commands::Chat { svg } => commands::chat::run(context, svg).await?,
        Commands::Credential { action } => match action {
            CredentialAction::Set { key } => commands::credential::set(context, key).await?,
            CredentialAction::Show => commands::credential::show(context).await?,
            CredentialAction::Clear => commands::credential::clear(context).await?,
        },
        Commands::Render { outline, out } => commands::diagram::render(context, &outline, &out)?,
        Commands::Export { outline, out } => {
            commands::diagram::export(context, &outline, out.as_deref())?
        }
    }

    Ok(())
}

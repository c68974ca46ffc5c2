use anyhow::{Result, bail};
use mindmap_application::ChatSession;
use mindmap_core::credential::{Credential, CredentialStore};
use mindmap_core::error::MindmapError;
use mindmap_diagram::{DiagramRenderer, DiagramSurface};
use mindmap_infrastructure::FileCredentialStore;
use mindmap_server::app::build_chat_usecase;
use mindmap_server::error::{INVALID_CREDENTIAL_MESSAGE, MISSING_CREDENTIAL_MESSAGE};
use mindmap_server::logging::{CLI_LOG_FILTER, init_logging};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{CREDENTIAL_ENV, Context};

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

pub async fn run(context: Context, svg_out: Option<PathBuf>) -> Result<()> {
    let logs_dir = context.paths.logs_dir().ok();
    let _guard = init_logging(CLI_LOG_FILTER, logs_dir.as_deref())?;

    let Some(credential) = resolve_credential(&context).await? else {
        bail!("{MISSING_CREDENTIAL_MESSAGE} (mindmap credential set, or {CREDENTIAL_ENV})");
    };

    let usecase = Arc::new(build_chat_usecase(&context.config)?);
    let mut session = match ChatSession::start(usecase, credential).await {
        Ok(session) => session,
        Err(MindmapError::InvalidCredential) => bail!(INVALID_CREDENTIAL_MESSAGE),
        Err(e) => return Err(e.into()),
    };

    let renderer = DiagramRenderer::from_config(&context.config.render);
    let mut surface = DiagramSurface::from_config(&context.config.render);

    println!("Type a message (or /quit).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if QUIT_COMMANDS.contains(&message) {
            break;
        }

        match session.send(message).await {
            Ok(reply) => {
                println!("\n{}\n", reply.response);
                if let Some(path) = &svg_out {
                    write_svg(&renderer, &mut surface, &reply.outline, path).await;
                }
            }
            Err(MindmapError::InvalidCredential) => {
                eprintln!("{INVALID_CREDENTIAL_MESSAGE}");
                break;
            }
            Err(e) => {
                tracing::error!("[Chat] Exchange failed: {}", e);
                eprintln!("{}", mindmap_application::FAILED_REPLY_NOTICE);
            }
        }
    }

    Ok(())
}

/// Stored credential first, then the environment.
async fn resolve_credential(context: &Context) -> Result<Option<Credential>> {
    let store = FileCredentialStore::new(&context.paths)?;
    if let Some(credential) = store.load_credential().await?
        && !credential.is_empty()
    {
        return Ok(Some(credential));
    }
    Ok(std::env::var(CREDENTIAL_ENV)
        .ok()
        .map(Credential::new)
        .filter(|credential| !credential.is_empty()))
}

async fn write_svg(
    renderer: &DiagramRenderer,
    surface: &mut DiagramSurface,
    outline: &mindmap_core::outline::Outline,
    path: &Path,
) {
    if let Err(e) = renderer.render(surface, outline) {
        eprintln!("Mind map not updated: {e}");
        return;
    }
    if let Some(svg) = surface.standalone_svg()
        && let Err(e) = tokio::fs::write(path, svg).await
    {
        eprintln!("Failed to write {}: {e}", path.display());
    }
}

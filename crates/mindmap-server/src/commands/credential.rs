use anyhow::{Context as _, Result, bail};
use mindmap_core::credential::{Credential, CredentialStore};
use mindmap_core::upstream::CredentialValidator;
use mindmap_infrastructure::FileCredentialStore;
use mindmap_interaction::DeepSeekApiAgent;
use mindmap_server::error::{INVALID_CREDENTIAL_MESSAGE, MISSING_CREDENTIAL_MESSAGE};
use std::io::Write;

use super::Context;

/// Validates the key with the provider and stores it only when accepted.
pub async fn set(context: Context, key: Option<String>) -> Result<()> {
    let credential = match key {
        Some(key) => Credential::new(key),
        None => Credential::new(prompt("输入Deepseek API Key: ")?),
    };
    if credential.is_empty() {
        bail!(MISSING_CREDENTIAL_MESSAGE);
    }

    let agent = DeepSeekApiAgent::new(&context.config.upstream)?;
    if !agent.validate(&credential).await {
        bail!(INVALID_CREDENTIAL_MESSAGE);
    }

    let store = FileCredentialStore::new(&context.paths)?;
    store.save_credential(&credential).await?;
    println!("API Key saved to {}", store.path().display());
    Ok(())
}

pub async fn show(context: Context) -> Result<()> {
    let store = FileCredentialStore::new(&context.paths)?;
    match store.load_credential().await? {
        Some(credential) => println!("{} ({})", mask(credential.expose()), store.path().display()),
        None => println!("No API Key stored"),
    }
    Ok(())
}

pub async fn clear(context: Context) -> Result<()> {
    let store = FileCredentialStore::new(&context.paths)?;
    store.clear_credential().await?;
    println!("API Key removed");
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read API Key")?;
    Ok(line.trim().to_string())
}

/// Keeps the last four characters of a key.
pub fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

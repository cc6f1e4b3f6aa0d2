//! Key subcommand handlers.

use promptlift_config::{Config, CREDENTIAL_ENV_VAR};

use crate::cli::KeyAction;
use crate::context::{credential_store, detached_relay, surface};

pub(crate) fn handle_key_command(action: KeyAction, config: &Config) -> anyhow::Result<()> {
    match action {
        KeyAction::Set { key } => key_set(&key, config),
        KeyAction::Show => key_show(config),
        KeyAction::Clear => key_clear(config),
    }
}

fn key_set(key: &str, config: &Config) -> anyhow::Result<()> {
    let mut surface = surface(config, detached_relay())?;
    let saved = surface.save_credential(key)?;
    println!("API key saved ({})", saved.masked());
    Ok(())
}

fn key_show(config: &Config) -> anyhow::Result<()> {
    let store = credential_store(config);
    let Some(effective) = store.resolve(config.gemini.api_key.as_deref())? else {
        println!("No API key set. Run `promptlift key set <KEY>` or export {}.", CREDENTIAL_ENV_VAR);
        return Ok(());
    };

    let source = if std::env::var(CREDENTIAL_ENV_VAR).is_ok_and(|v| !v.trim().is_empty()) {
        CREDENTIAL_ENV_VAR.to_string()
    } else if config.gemini.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
        "config file".to_string()
    } else {
        store.inner().path().display().to_string()
    };
    println!("{} (from {})", effective.masked(), source);
    Ok(())
}

fn key_clear(config: &Config) -> anyhow::Result<()> {
    let mut surface = surface(config, detached_relay())?;
    surface.clear_credential()?;
    println!("API key removed");
    if std::env::var(CREDENTIAL_ENV_VAR).is_ok() {
        println!("Note: {} is still set in the environment", CREDENTIAL_ENV_VAR);
    }
    Ok(())
}

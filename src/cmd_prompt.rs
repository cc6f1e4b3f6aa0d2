//! Prompt subcommand handlers: import, enhance, polish, insert, copy.

use tracing::info;

use promptlift_config::Config;
use promptlift_relay::ImportOutcome;

use crate::clipboard::SystemClipboard;
use crate::context::{detached_relay, surface, TabLink};

pub(crate) async fn prompt_import(config: &Config, tab: Option<&str>) -> anyhow::Result<()> {
    let link = TabLink::open(config, tab).await?;
    let mut surface = surface(config, link.relay.clone())?;
    let outcome = surface.import_prompt(&link.url).await?;
    println!("{}", outcome.message());
    Ok(())
}

pub(crate) async fn prompt_enhance(
    config: &Config,
    tab: Option<&str>,
    text: Option<String>,
) -> anyhow::Result<()> {
    let enhanced = match text {
        Some(text) => {
            let mut surface = surface(config, detached_relay())?;
            if surface.set_imported(text) == ImportOutcome::Empty {
                println!("{}", ImportOutcome::Empty.message());
                return Ok(());
            }
            let enhanced = surface.enhance().await?.to_string();
            enhanced
        }
        None => {
            let link = TabLink::open(config, tab).await?;
            let mut surface = surface(config, link.relay.clone())?;
            if surface.import_prompt(&link.url).await? == ImportOutcome::Empty {
                println!("{}", ImportOutcome::Empty.message());
                return Ok(());
            }
            let enhanced = surface.enhance().await?.to_string();
            enhanced
        }
    };
    println!("{}", enhanced);
    Ok(())
}

/// Import, enhance, optionally copy, then insert unless `dry_run`.
pub(crate) async fn prompt_polish(
    config: &Config,
    tab: Option<&str>,
    dry_run: bool,
    copy: bool,
) -> anyhow::Result<()> {
    let link = TabLink::open(config, tab).await?;
    let mut surface = surface(config, link.relay.clone())?;

    let outcome = surface.import_prompt(&link.url).await?;
    if outcome == ImportOutcome::Empty {
        println!("{}", outcome.message());
        return Ok(());
    }
    println!("{}", surface.enhance().await?);

    if copy {
        let mut clipboard = SystemClipboard::new()?;
        surface.copy_text(&mut clipboard)?;
    }
    if dry_run {
        info!("Dry run, leaving the tab untouched");
        return Ok(());
    }
    surface.insert().await?;
    Ok(())
}

pub(crate) async fn prompt_insert(
    config: &Config,
    tab: Option<&str>,
    text: &str,
) -> anyhow::Result<()> {
    let link = TabLink::open(config, tab).await?;
    let mut surface = surface(config, link.relay.clone())?;
    surface.set_enhanced(text)?;
    surface.insert().await?;
    println!("Inserted into {}", link.url);
    Ok(())
}

pub(crate) fn prompt_copy(config: &Config, text: &str) -> anyhow::Result<()> {
    let mut surface = surface(config, detached_relay())?;
    surface.set_enhanced(text)?;
    let mut clipboard = SystemClipboard::new()?;
    surface.copy_text(&mut clipboard)?;
    println!("Copied to clipboard");
    Ok(())
}

//! Recharge option commands over the collection sync store.
use std::sync::Arc;

use recharge_core::api::{AppConfig, CliError, CollectionSyncStore, Item};
use serde_json::json;

use crate::commands::cli::{AddArgs, ListArgs, OutputFormat, RemoveArgs, UpdateArgs};
use crate::notify::ConsoleNotifier;

async fn open_store(cfg: &AppConfig) -> Result<CollectionSyncStore, CliError> {
    let mut store = recharge_plugins::factory::build_sync_store(cfg)
        .map_err(|e| CliError::Config(e.to_string()))?
        .with_notifier(Arc::new(ConsoleNotifier));
    store.fetch().await?;
    Ok(store)
}

pub async fn handle_list(args: ListArgs, cfg: &AppConfig) -> Result<(), CliError> {
    let store = open_store(cfg).await?;
    let items = store.items().unwrap_or_default();
    println!("{}", render_items(items, args.format)?);
    Ok(())
}

pub async fn handle_add(args: AddArgs, cfg: &AppConfig) -> Result<(), CliError> {
    let mut store = open_store(cfg).await?;
    store.add(Item::new(args.name, args.url, args.image)).await?;
    Ok(())
}

pub async fn handle_update(args: UpdateArgs, cfg: &AppConfig) -> Result<(), CliError> {
    let mut store = open_store(cfg).await?;
    let current = store
        .items()
        .and_then(|items| items.get(args.index))
        .cloned()
        .unwrap_or_default();
    let index = args.index;
    store.update(index, apply_edits(current, args)).await?;
    Ok(())
}

pub async fn handle_remove(args: RemoveArgs, cfg: &AppConfig) -> Result<(), CliError> {
    let mut store = open_store(cfg).await?;
    store.remove(args.index).await?;
    Ok(())
}

/// Overlay the provided fields on the stored item.
fn apply_edits(mut item: Item, args: UpdateArgs) -> Item {
    if let Some(name) = args.name {
        item.name = name;
    }
    if let Some(url) = args.url {
        item.target_url = url;
    }
    if let Some(image) = args.image {
        item.image_url = image;
    }
    item
}

fn render_items(items: &[Item], format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => {
            let output = json!({
                "items": items,
                "count": items.len()
            });
            serde_json::to_string_pretty(&output).map_err(|e| CliError::Command(e.to_string()))
        }
        OutputFormat::Text => {
            if items.is_empty() {
                return Ok("No recharge options configured.".to_string());
            }
            let mut out = format!("{} options\n", items.len());
            for (idx, item) in items.iter().enumerate() {
                out.push_str(&format!("[{}] {}\n    url:   {}\n", idx, item.name, item.target_url));
                if !item.image_url.is_empty() {
                    out.push_str(&format!("    image: {}\n", item.image_url));
                }
            }
            Ok(out.trim_end().to_string())
        }
    }
}

//! Generic resource commands plus conscience, settings, notify, and layouts

use serde_json::Value;

use crate::cli::{
    CommandContext, ConscienceCommands, LayoutCommands, OutputFormat, SettingsCommands,
};
use crate::client::Resource;
use crate::error::{Error, Result};
use crate::models::RecordDisplay;

/// List a resource group
pub async fn get(ctx: &CommandContext, resource: Resource) -> Result<()> {
    // Settings is a single object, not a list
    if resource == Resource::Settings {
        return ctx.print_value(&ctx.service.get_settings().await);
    }

    let records = ctx.service.get_records(resource).await;
    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<RecordDisplay> = records.iter().map(RecordDisplay::from).collect();
            ctx.print_rows(&rows)
        }
        OutputFormat::Json => ctx.print_value(&records),
    }
}

pub async fn create(ctx: &CommandContext, resource: Resource, record: Value) -> Result<()> {
    let resp = ctx.service.add_record(resource, record).await;
    ctx.finish_write(&format!("Created {} record", resource), resp)
}

pub async fn delete(ctx: &CommandContext, resource: Resource, id: i64) -> Result<()> {
    let resp = ctx.service.delete_record(resource, id).await;
    ctx.finish_write(&format!("Deleted {} record {}", resource, id), resp)
}

pub async fn conscience(ctx: &CommandContext, cmd: ConscienceCommands) -> Result<()> {
    match cmd {
        ConscienceCommands::Toggle { data } => {
            let resp = ctx.service.toggle_conscience_button(data.0).await;
            ctx.finish_write("Conscience button toggled", resp)
        }
    }
}

pub async fn settings(ctx: &CommandContext, cmd: SettingsCommands) -> Result<()> {
    match cmd {
        SettingsCommands::Show => ctx.print_value(&ctx.service.get_settings().await),
        SettingsCommands::Save { data } => {
            if !data.0.is_object() {
                return Err(Error::Other("Settings must be a JSON object".to_string()));
            }
            let resp = ctx.service.save_settings(data.0).await;
            ctx.finish_write("Settings saved", resp)
        }
    }
}

pub async fn notify(ctx: &CommandContext, message: Value) -> Result<()> {
    let resp = ctx.service.notify(message).await;
    ctx.finish_write("Notification sent", resp)
}

pub async fn layout(ctx: &CommandContext, cmd: LayoutCommands) -> Result<()> {
    match cmd {
        LayoutCommands::Get { user_id } => {
            let layout = ctx
                .service
                .get_widget_layout(&user_id)
                .await
                .ok_or_else(|| {
                    Error::Other(format!("No widget layout available for {}", user_id))
                })?;
            ctx.print_value(&layout)
        }
        LayoutCommands::Save { user_id, data } => {
            let resp = ctx.service.save_widget_layout(&user_id, data.0).await;
            ctx.finish_write(&format!("Widget layout for {} saved", user_id), resp)
        }
    }
}

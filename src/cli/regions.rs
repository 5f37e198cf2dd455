//! Region commands

use crate::cli::{CommandContext, JsonArg, OutputFormat, RegionsCommands};
use crate::client::{HistoryPoint, NewRegion, WriteResponse};
use crate::error::{ApiError, Error, Result};
use crate::models::{HistoryDisplay, RegionDisplay};
use crate::output::table;

pub async fn run(ctx: &CommandContext, cmd: RegionsCommands) -> Result<()> {
    match cmd {
        RegionsCommands::List => list(ctx).await,
        RegionsCommands::Show { id } => show(ctx, id).await,
        RegionsCommands::Add {
            name,
            lat,
            lng,
            zoom,
        } => {
            let resp = ctx
                .service
                .add_region(NewRegion {
                    name: name.clone(),
                    lat,
                    lng,
                    zoom,
                })
                .await;
            ctx.finish_write(&format!("Region '{}' added", name), resp)
        }
        RegionsCommands::Delete { id } => {
            let resp = ctx.service.delete_region(id).await;
            ctx.finish_write(&format!("Region {} deleted", id), resp)
        }
        RegionsCommands::SetIndex { id, value } => {
            let resp = ctx.service.update_region_index(id, value).await;
            finish_region_write(ctx, &format!("Region {} index set to {}", id, value), resp)
        }
        RegionsCommands::SetHistory { id, data } => {
            let history = parse_history(data)?;
            let days = history.len();
            let resp = ctx.service.update_region_history(id, history).await;
            finish_region_write(ctx, &format!("Region {} history set ({} days)", id, days), resp)
        }
        RegionsCommands::DeleteDay { id, date } => {
            let resp = ctx.service.delete_history_day(id, &date).await;
            finish_region_write(ctx, &format!("Region {} day {} deleted", id, date), resp)
        }
        RegionsCommands::ShiftDay { id } => {
            let resp = ctx.service.shift_day(id).await;
            finish_region_write(ctx, &format!("Region {} shifted by one day", id), resp)
        }
    }
}

async fn list(ctx: &CommandContext) -> Result<()> {
    let regions = ctx.service.get_regions().await;
    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<RegionDisplay> = regions.iter().map(RegionDisplay::from).collect();
            ctx.print_rows(&rows)
        }
        // Full records, extra fields included
        OutputFormat::Json => ctx.print_value(&regions),
    }
}

async fn show(ctx: &CommandContext, id: i64) -> Result<()> {
    let data = ctx
        .service
        .get_region_data(id)
        .await
        .ok_or_else(|| Error::Other(format!("Region {} is not available", id)))?;

    match ctx.format {
        OutputFormat::Table => {
            println!(
                "{}",
                table::format_table(&[RegionDisplay::from(&data.region)])
            );
            let history: Vec<HistoryDisplay> =
                data.history.iter().map(HistoryDisplay::from).collect();
            println!("{}", table::format_table(&history));
            Ok(())
        }
        OutputFormat::Json => ctx.print_value(&data),
    }
}

/// Report a region edit, then show the refreshed region the server sent back
fn finish_region_write(ctx: &CommandContext, what: &str, resp: WriteResponse) -> Result<()> {
    let refreshed = resp.region_data();
    ctx.finish_write(what, resp)?;

    if let (OutputFormat::Table, Some(data)) = (ctx.format, refreshed) {
        println!(
            "{}",
            table::format_table(&[RegionDisplay::from(&data.region)])
        );
    }
    Ok(())
}

fn parse_history(data: JsonArg) -> Result<Vec<HistoryPoint>> {
    serde_json::from_value(data.0)
        .map_err(|e| ApiError::Parse(format!("History must be [{{date, value}}]: {}", e)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_history_accepts_string_values() {
        let history = parse_history(JsonArg(json!([
            {"date": "2024-05-01", "value": 3},
            {"date": "2024-05-02", "value": "3.5"}
        ])))
        .unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[1].value, 3.5);
    }

    #[test]
    fn test_parse_history_rejects_object() {
        let err = parse_history(JsonArg(json!({"date": "2024-05-01"}))).unwrap_err();
        assert!(err.to_string().starts_with("Parse Error: History must be"));
    }
}

//! CSV loaders — plain comma-separated files with a header row, no
//! quoting support.
//!
//! A missing required column fails the whole load before any data row is
//! parsed. A malformed row fails with its 1-indexed line number; dates
//! are ISO `YYYY-MM-DD`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDate;
use lift_core::types::{BrandLiftRecord, CampaignRecord, CreativeRecord};
use lift_core::{LiftError, LiftResult};
use tracing::info;

const HISTORIC_COLUMNS: &[&str] = &[
    "Campaign_Name",
    "Market",
    "Channel",
    "Week_Start",
    "Spend_USD",
    "Conversions",
    "Reach",
];

const BRAND_LIFT_COLUMNS: &[&str] = &[
    "Campaign_Name",
    "Market",
    "Channel",
    "Exposed_Rate",
    "Control_Rate",
    "Exposed_Consideration",
    "Control_Consideration",
    "Exposed_Responses",
    "Control_Responses",
    "Relative_Lift",
];

const CREATIVE_COLUMNS: &[&str] = &[
    "Creative_Name",
    "Campaign_Name",
    "Channel",
    "Report_Date",
    "Impressions",
    "Clicks",
];

/// Load the historic spend/conversion table.
pub fn load_historic(path: impl AsRef<Path>) -> LiftResult<Vec<CampaignRecord>> {
    let path = path.as_ref();
    let (idx, rows) = read_table(path, "historic campaign data", HISTORIC_COLUMNS)?;

    let mut records = Vec::with_capacity(rows.len());
    for (line, fields) in rows {
        let spend_usd = parse_f64(&fields[idx[4]], "Spend_USD", line)?;
        if spend_usd < 0.0 {
            return Err(LiftError::InvalidInput(format!(
                "line {line}: Spend_USD must be non-negative, got {spend_usd}"
            )));
        }
        records.push(CampaignRecord {
            campaign_name: fields[idx[0]].clone(),
            market: fields[idx[1]].clone(),
            channel: fields[idx[2]].clone(),
            week_start: parse_date(&fields[idx[3]], "Week_Start", line)?,
            spend_usd,
            conversions: parse_u64(&fields[idx[5]], "Conversions", line)?,
            reach: parse_u64(&fields[idx[6]], "Reach", line)?,
        });
    }

    info!(rows = records.len(), path = %path.display(), "Historic campaign data loaded");
    Ok(records)
}

/// Load the brand-lift study results table.
pub fn load_brand_lift(path: impl AsRef<Path>) -> LiftResult<Vec<BrandLiftRecord>> {
    let path = path.as_ref();
    let (idx, rows) = read_table(path, "brand lift study results", BRAND_LIFT_COLUMNS)?;

    let mut records = Vec::with_capacity(rows.len());
    for (line, fields) in rows {
        records.push(BrandLiftRecord {
            campaign_name: fields[idx[0]].clone(),
            market: fields[idx[1]].clone(),
            channel: fields[idx[2]].clone(),
            exposed_rate: parse_rate(&fields[idx[3]], "Exposed_Rate", line)?,
            control_rate: parse_rate(&fields[idx[4]], "Control_Rate", line)?,
            exposed_consideration: parse_u64(&fields[idx[5]], "Exposed_Consideration", line)?,
            control_consideration: parse_u64(&fields[idx[6]], "Control_Consideration", line)?,
            exposed_responses: parse_u64(&fields[idx[7]], "Exposed_Responses", line)?,
            control_responses: parse_u64(&fields[idx[8]], "Control_Responses", line)?,
            relative_lift: parse_f64(&fields[idx[9]], "Relative_Lift", line)?,
        });
    }

    info!(rows = records.len(), path = %path.display(), "Brand lift study results loaded");
    Ok(records)
}

/// Load the creative performance report.
pub fn load_creative(path: impl AsRef<Path>) -> LiftResult<Vec<CreativeRecord>> {
    let path = path.as_ref();
    let (idx, rows) = read_table(path, "creative performance report", CREATIVE_COLUMNS)?;

    let mut records = Vec::with_capacity(rows.len());
    for (line, fields) in rows {
        records.push(CreativeRecord {
            creative_name: fields[idx[0]].clone(),
            campaign_name: fields[idx[1]].clone(),
            channel: fields[idx[2]].clone(),
            report_date: parse_date(&fields[idx[3]], "Report_Date", line)?,
            impressions: parse_u64(&fields[idx[4]], "Impressions", line)?,
            clicks: parse_u64(&fields[idx[5]], "Clicks", line)?,
        });
    }

    info!(rows = records.len(), path = %path.display(), "Creative performance report loaded");
    Ok(records)
}

/// Reads the header, resolves the required columns, and returns the data
/// rows with their 1-indexed line numbers. Schema failures are raised
/// here, before any data row is parsed.
fn read_table(
    path: &Path,
    table: &str,
    required: &[&str],
) -> LiftResult<(Vec<usize>, Vec<(usize, Vec<String>)>)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(LiftError::Schema {
                table: table.to_string(),
                missing: required.iter().map(|c| c.to_string()).collect(),
            })
        }
    };
    let columns: Vec<&str> = header_line.split(',').map(str::trim).collect();

    let mut indices = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match columns.iter().position(|c| c == name) {
            Some(index) => indices.push(index),
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LiftError::Schema {
            table: table.to_string(),
            missing,
        });
    }

    let mut rows = Vec::new();
    for (line_index, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = line_index + 2;
        let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
        if fields.len() < columns.len() {
            return Err(LiftError::InvalidInput(format!(
                "line {line_no}: expected {} fields, got {}",
                columns.len(),
                fields.len()
            )));
        }
        rows.push((line_no, fields));
    }

    Ok((indices, rows))
}

fn parse_f64(raw: &str, column: &str, line: usize) -> LiftResult<f64> {
    let value: f64 = raw.parse().map_err(|_| {
        LiftError::InvalidInput(format!("line {line}: {column} is not a number: {raw:?}"))
    })?;
    if !value.is_finite() {
        return Err(LiftError::InvalidInput(format!(
            "line {line}: {column} must be finite, got {raw:?}"
        )));
    }
    Ok(value)
}

fn parse_u64(raw: &str, column: &str, line: usize) -> LiftResult<u64> {
    raw.parse().map_err(|_| {
        LiftError::InvalidInput(format!(
            "line {line}: {column} is not a non-negative integer: {raw:?}"
        ))
    })
}

fn parse_rate(raw: &str, column: &str, line: usize) -> LiftResult<f64> {
    let rate = parse_f64(raw, column, line)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(LiftError::InvalidInput(format!(
            "line {line}: {column} must be within [0, 1], got {rate}"
        )));
    }
    Ok(rate)
}

fn parse_date(raw: &str, column: &str, line: usize) -> LiftResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        LiftError::InvalidInput(format!(
            "line {line}: {column} is not a YYYY-MM-DD date: {raw:?}"
        ))
    })
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validation::Validator;
use crate::database::models::{ConsumptionData, NewConsumption};
use crate::error::{ApiError, FieldErrors};

pub const DEFAULT_MANUAL_SOURCE: &str = "MANUAL";
pub const DEFAULT_IMPORT_SOURCE: &str = "IMPORT";

/// Column order shared by import and export
pub const CSV_HEADER: [&str; 4] = ["date", "kwh", "max_power", "source"];

fn default_source() -> String {
    DEFAULT_MANUAL_SOURCE.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsumptionCreate {
    pub date: NaiveDate,
    pub kwh: f64,
    pub max_power: Option<f64>,
    #[serde(default = "default_source")]
    pub source: String,
}

impl ConsumptionCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        Validator::new()
            .non_negative("kwh", Some(self.kwh))
            .non_negative("max_power", self.max_power)
            .required("source", &self.source, 20)
            .finish()
    }
}

impl From<ConsumptionCreate> for NewConsumption {
    fn from(input: ConsumptionCreate) -> Self {
        Self {
            date: input.date,
            kwh: input.kwh,
            max_power: input.max_power,
            source: input.source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionResponse {
    pub id: i64,
    pub property_id: i64,
    pub date: NaiveDate,
    pub kwh: f64,
    pub max_power: Option<f64>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl From<ConsumptionData> for ConsumptionResponse {
    fn from(row: ConsumptionData) -> Self {
        Self {
            id: row.id,
            property_id: row.property_id,
            date: row.date,
            kwh: row.kwh,
            max_power: row.max_power,
            source: row.source,
            created_at: row.created_at,
        }
    }
}

/// `?days=N` trailing window
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsumptionQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: u64,
}

fn parse_optional_f64(s: &str) -> Result<Option<f64>, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        trimmed
            .parse()
            .map(Some)
            .map_err(|_| format!("invalid number '{}'", trimmed))
    }
}

fn column<'r>(
    record: &'r csv::StringRecord,
    headers: &csv::StringRecord,
    name: &str,
) -> Option<&'r str> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .and_then(|idx| record.get(idx))
}

fn record_to_consumption(
    record: &csv::StringRecord,
    headers: &csv::StringRecord,
) -> Result<NewConsumption, String> {
    let get = |name: &str| column(record, headers, name);

    let date_str = get("date").ok_or("missing column 'date'")?.trim();
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", date_str))?;

    let kwh = parse_optional_f64(get("kwh").ok_or("missing column 'kwh'")?)?
        .ok_or("kwh must not be empty")?;
    if !kwh.is_finite() || kwh < 0.0 {
        return Err("kwh must be a non-negative number".to_string());
    }

    let max_power = parse_optional_f64(get("max_power").unwrap_or(""))?;
    if max_power.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err("max_power must be a non-negative number".to_string());
    }

    let source = match get("source").map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => DEFAULT_IMPORT_SOURCE.to_string(),
    };
    if source.chars().count() > 20 {
        return Err("source must be at most 20 characters".to_string());
    }

    Ok(NewConsumption {
        date,
        kwh,
        max_power,
        source,
    })
}

/// Parse an uploaded CSV. Every bad line is reported; nothing is returned
/// unless the whole file is valid.
pub fn parse_consumption_csv(body: &[u8]) -> Result<Vec<NewConsumption>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body);

    let headers = reader
        .headers()
        .map_err(|e| ApiError::field_error("csv", format!("failed to read CSV headers: {}", e)))?
        .clone();

    for required in ["date", "kwh"] {
        if !headers.iter().any(|h| h.eq_ignore_ascii_case(required)) {
            return Err(ApiError::field_error("csv", format!("missing column '{}'", required)));
        }
    }

    let mut rows = Vec::new();
    let mut errors = FieldErrors::new();

    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map_or(0, |p| p.line());
                match record_to_consumption(&record, &headers) {
                    Ok(row) => rows.push(row),
                    Err(msg) => {
                        errors.insert(format!("line {}", line), msg);
                    }
                }
            }
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                errors.insert(format!("line {}", line), e.to_string());
            }
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::unprocessable_entity("Invalid CSV rows", errors));
    }
    if rows.is_empty() {
        return Err(ApiError::field_error("csv", "CSV contains no rows"));
    }

    Ok(rows)
}

pub fn write_consumption_csv(rows: &[ConsumptionData]) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let write_err = |e: csv::Error| {
        tracing::error!("CSV export failed: {}", e);
        ApiError::internal_server_error("Failed to build CSV export")
    };

    writer.write_record(CSV_HEADER).map_err(write_err)?;
    for row in rows {
        let max_power = row.max_power.map(|p| p.to_string()).unwrap_or_default();
        writer
            .write_record([
                row.date.format("%Y-%m-%d").to_string(),
                row.kwh.to_string(),
                max_power,
                row.source.clone(),
            ])
            .map_err(write_err)?;
    }

    writer.into_inner().map_err(|e| {
        tracing::error!("CSV export failed: {}", e);
        ApiError::internal_server_error("Failed to build CSV export")
    })
}

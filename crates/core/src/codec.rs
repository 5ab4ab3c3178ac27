//! Project Codec
//!
//! Maps the record store to and from the portable project document.
//!
//! Writing always produces the current format. Reading accepts every
//! historical shape we know about: camelCase or snake_case keys, a nested
//! `parameters` object keyed by the human-readable labels of the old desktop
//! form (which wins over top-level fields), and length/quantity tables stored
//! either as `[[length, quantity], ...]` or as `[{length, quantity}, ...]`.
//! Anything that does not fit is coerced to defaults; only a top level that
//! is not an object is rejected.
//!
//! The accepted spellings live in `FIELD_RULES` so that a new legacy variant
//! is a one-line change.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::record::{ParameterRecord, QuantityRow, RecordField, DEFAULT_CORE_MATERIAL};
use crate::store::compute_total;

/// Format tag written into every saved document.
pub const FORMAT_VERSION: &str = "1.0";

/// Durable, portable representation of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub project_name: String,
    #[serde(rename = "parameterTables")]
    pub records: Vec<ParameterRecord>,
    /// Informational only; readers recompute it.
    pub total_quantity: u64,
    pub version: String,
}

// ============================================================================
// Rule table
// ============================================================================

/// Where a record field may be found in an incoming document.
struct FieldRule {
    target: RecordField,
    /// Top-level keys, in lookup order.
    keys: &'static [&'static str],
    /// Keys inside the nested `parameters` object. These take precedence.
    labels: &'static [&'static str],
}

const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        target: RecordField::DesignForce,
        keys: &["designForce", "design_force", "force"],
        labels: &["屈服承载力(KN)", "设计力KN"],
    },
    FieldRule {
        target: RecordField::Width,
        keys: &["width"],
        labels: &["截面宽度(mm)", "截面宽度mm"],
    },
    FieldRule {
        target: RecordField::Height,
        keys: &["height"],
        labels: &["截面高度(mm)", "截面高度mm"],
    },
    FieldRule {
        target: RecordField::Thickness,
        keys: &["thickness"],
        labels: &["板材厚度(mm)", "板材厚度mm"],
    },
    FieldRule {
        target: RecordField::TubeWidth,
        keys: &["tubeWidth", "tube_width"],
        labels: &["方管宽度(mm)", "方管宽度mm"],
    },
    FieldRule {
        target: RecordField::TubeThickness,
        keys: &["tubeThickness", "tube_thickness"],
        labels: &["方管厚度(mm)", "方管厚度mm"],
    },
    FieldRule {
        target: RecordField::Weld,
        keys: &["weld"],
        labels: &["焊缝高度(mm)", "芯板焊缝高度mm"],
    },
    FieldRule {
        target: RecordField::CoreMaterial,
        keys: &["coreMaterial", "core_material"],
        labels: &["芯板材料"],
    },
    FieldRule {
        target: RecordField::Template,
        keys: &["template", "section_template", "section", "template_type"],
        labels: &["选择截面"],
    },
];

const PROJECT_NAME_KEYS: &[&str] = &["projectName", "project_name"];
const RECORD_LIST_KEYS: &[&str] = &["parameterTables", "param_tables"];
const ROW_TABLE_KEYS: &[&str] = &["lengthQuantityTable", "length_quantity_table", "length_quantity"];
const RECORD_ID_KEYS: &[&str] = &["id", "table_number"];
const LABELED_PARAMS_KEY: &str = "parameters";
const LENGTH_KEYS: &[&str] = &["length", "长度(mm)"];
const QUANTITY_KEYS: &[&str] = &["quantity", "数量(件)"];

// ============================================================================
// Serialize
// ============================================================================

/// Build a document from live state. Every record is normalized so that no
/// field is missing and material/template carry their defaults; the project
/// name is trimmed like every other text field.
pub fn serialize(records: &[ParameterRecord], project_name: &str, total_quantity: u64) -> ProjectDocument {
    ProjectDocument {
        project_name: project_name.trim().to_string(),
        records: records.iter().map(normalize_record).collect(),
        total_quantity,
        version: FORMAT_VERSION.to_string(),
    }
}

/// Pretty-printed JSON for a document.
pub fn to_json_string(document: &ProjectDocument) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Trim every text field and substitute defaults for empty ones.
pub fn normalize_record(record: &ParameterRecord) -> ParameterRecord {
    let mut out = record.clone();
    for field in RecordField::NUMERIC {
        let trimmed = record.field(field).trim().to_string();
        out.set_field(field, trimmed);
    }
    out.core_material = non_empty_or(record.core_material.trim(), DEFAULT_CORE_MATERIAL);
    out.quantity_rows = record
        .quantity_rows
        .iter()
        .map(|row| QuantityRow::new(row.length.trim(), row.quantity.trim()))
        .collect();
    if out.quantity_rows.is_empty() {
        out.quantity_rows.push(QuantityRow::default());
    }
    out
}

// ============================================================================
// Deserialize
// ============================================================================

/// Parse raw JSON text into a document.
pub fn from_json_str(text: &str) -> CoreResult<ProjectDocument> {
    let raw: Value = serde_json::from_str(text)
        .map_err(|e| CoreError::malformed(format!("not valid JSON: {}", e)))?;
    deserialize(&raw)
}

/// Interpret an arbitrary JSON value as a project document.
pub fn deserialize(raw: &Value) -> CoreResult<ProjectDocument> {
    let Some(root) = raw.as_object() else {
        return Err(CoreError::malformed("top level is not an object"));
    };

    let project_name = lookup_text(root, PROJECT_NAME_KEYS)
        .map(|name| name.trim().to_string())
        .unwrap_or_default();
    let records = lookup(root, RECORD_LIST_KEYS)
        .map(decode_records)
        .unwrap_or_default();
    let records = if records.is_empty() {
        vec![ParameterRecord::with_id("table_1")]
    } else {
        records
    };

    Ok(ProjectDocument {
        project_name,
        total_quantity: compute_total(&records),
        records,
        version: FORMAT_VERSION.to_string(),
    })
}

/// Decode a JSON list of records with the same tolerance as project files.
/// Anything that is not an array yields an empty list.
pub fn decode_records(value: &Value) -> Vec<ParameterRecord> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut record = decode_record(item, index);
            if !seen.insert(record.id.clone()) {
                record.id = uuid::Uuid::new_v4().to_string();
                seen.insert(record.id.clone());
            }
            record
        })
        .collect()
}

fn decode_record(item: &Value, index: usize) -> ParameterRecord {
    let empty = Map::new();
    let table = item.as_object().unwrap_or(&empty);
    let labeled = table.get(LABELED_PARAMS_KEY).and_then(Value::as_object);

    let id = lookup_text(table, RECORD_ID_KEYS)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("table_{}", index + 1));

    let mut record = ParameterRecord::with_id(id);
    for rule in FIELD_RULES {
        let from_labels = labeled.and_then(|params| lookup_text(params, rule.labels));
        let value = from_labels
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup_text(table, rule.keys))
            .unwrap_or_default();
        record.set_field(rule.target, value.trim());
    }
    record.core_material = non_empty_or(&record.core_material, DEFAULT_CORE_MATERIAL);
    record.quantity_rows = lookup(table, ROW_TABLE_KEYS)
        .map(decode_rows)
        .unwrap_or_default();
    if record.quantity_rows.is_empty() {
        record.quantity_rows.push(QuantityRow::default());
    }
    record
}

fn decode_rows(value: &Value) -> Vec<QuantityRow> {
    let Some(rows) = value.as_array() else {
        return Vec::new();
    };
    rows.iter().map(decode_row).collect()
}

fn decode_row(row: &Value) -> QuantityRow {
    match row {
        Value::Array(cells) => QuantityRow::new(
            cells.first().and_then(text_of).unwrap_or_default().trim(),
            cells.get(1).and_then(text_of).unwrap_or_default().trim(),
        ),
        Value::Object(fields) => QuantityRow::new(
            lookup_text(fields, LENGTH_KEYS).unwrap_or_default().trim(),
            lookup_text(fields, QUANTITY_KEYS).unwrap_or_default().trim(),
        ),
        _ => QuantityRow::default(),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// First present, non-null value among `keys`.
fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// First value among `keys` that coerces to non-empty text.
fn lookup_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(text_of))
        .find(|text| !text.trim().is_empty())
}

/// Scalar JSON values as text; containers and null have no text form.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_empty_or(text: &str, default: &str) -> String {
    if text.trim().is_empty() {
        default.to_string()
    } else {
        text.to_string()
    }
}

//! Parameter Records
//!
//! One `ParameterRecord` describes a single brace design table: the section
//! dimensions entered by the user, the core plate material, the section
//! template and the ordered length/quantity rows that drive downstream
//! expansion. Numeric fields are kept as the raw text the user typed so that
//! transient invalid input survives edits; they are validated only when a
//! generation request is about to be built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Default core plate material.
pub const DEFAULT_CORE_MATERIAL: &str = "Q235B";

// ============================================================================
// Template
// ============================================================================

/// Section template selected for a record.
///
/// The labels are the names the drawing service expects verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Template {
    /// "王一" section (default)
    #[default]
    #[serde(rename = "王一")]
    WangYi,
    /// "王工" section
    #[serde(rename = "王工")]
    WangGong,
    /// "十一" cross section
    #[serde(rename = "十一")]
    ShiYi,
}

impl Template {
    /// All selectable templates, in menu order.
    pub const ALL: [Template; 3] = [Template::WangYi, Template::WangGong, Template::ShiYi];

    /// Label sent over the wire and stored in project files.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WangYi => "王一",
            Self::WangGong => "王工",
            Self::ShiYi => "十一",
        }
    }

    /// Parse a label, ignoring surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Parse a label, substituting the default template for anything unknown.
    pub fn from_label_or_default(label: &str) -> Self {
        Self::from_label(label).unwrap_or_default()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Fields
// ============================================================================

/// Editable scalar fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    DesignForce,
    Width,
    Height,
    Thickness,
    TubeWidth,
    TubeThickness,
    Weld,
    CoreMaterial,
    Template,
}

impl RecordField {
    /// Fields that must parse as integers before generation.
    pub const NUMERIC: [RecordField; 7] = [
        RecordField::DesignForce,
        RecordField::Width,
        RecordField::Height,
        RecordField::Thickness,
        RecordField::TubeWidth,
        RecordField::TubeThickness,
        RecordField::Weld,
    ];

    /// Wire/document key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::DesignForce => "designForce",
            Self::Width => "width",
            Self::Height => "height",
            Self::Thickness => "thickness",
            Self::TubeWidth => "tubeWidth",
            Self::TubeThickness => "tubeThickness",
            Self::Weld => "weld",
            Self::CoreMaterial => "coreMaterial",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Column of a length/quantity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowColumn {
    Length,
    Quantity,
}

// ============================================================================
// QuantityRow
// ============================================================================

/// One (length, quantity) pair of a record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuantityRow {
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub quantity: String,
}

impl QuantityRow {
    pub fn new(length: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            length: length.into(),
            quantity: quantity.into(),
        }
    }

    /// Contribution of this row to the total quantity.
    pub fn quantity_value(&self) -> u64 {
        match parse_int_prefix(&self.quantity) {
            Some(n) if n > 0 => n as u64,
            _ => 0,
        }
    }
}

// ============================================================================
// ParameterRecord
// ============================================================================

/// A single parameterized design table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRecord {
    pub id: String,
    #[serde(default)]
    pub design_force: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub thickness: String,
    #[serde(default)]
    pub tube_width: String,
    #[serde(default)]
    pub tube_thickness: String,
    #[serde(default)]
    pub weld: String,
    #[serde(default = "default_core_material")]
    pub core_material: String,
    #[serde(default)]
    pub template: Template,
    #[serde(rename = "lengthQuantityTable", default = "default_rows")]
    pub quantity_rows: Vec<QuantityRow>,
}

fn default_core_material() -> String {
    DEFAULT_CORE_MATERIAL.to_string()
}

fn default_rows() -> Vec<QuantityRow> {
    vec![QuantityRow::default()]
}

impl ParameterRecord {
    /// Create a record with a fresh id, default fields and one empty row.
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    /// Create a default record with the given id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            design_force: String::new(),
            width: String::new(),
            height: String::new(),
            thickness: String::new(),
            tube_width: String::new(),
            tube_thickness: String::new(),
            weld: String::new(),
            core_material: default_core_material(),
            template: Template::default(),
            quantity_rows: default_rows(),
        }
    }

    /// Read a field as text.
    pub fn field(&self, field: RecordField) -> &str {
        match field {
            RecordField::DesignForce => &self.design_force,
            RecordField::Width => &self.width,
            RecordField::Height => &self.height,
            RecordField::Thickness => &self.thickness,
            RecordField::TubeWidth => &self.tube_width,
            RecordField::TubeThickness => &self.tube_thickness,
            RecordField::Weld => &self.weld,
            RecordField::CoreMaterial => &self.core_material,
            RecordField::Template => self.template.label(),
        }
    }

    /// Replace a field with raw text. Templates outside the known set fall
    /// back to the default template.
    pub fn set_field(&mut self, field: RecordField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RecordField::DesignForce => self.design_force = value,
            RecordField::Width => self.width = value,
            RecordField::Height => self.height = value,
            RecordField::Thickness => self.thickness = value,
            RecordField::TubeWidth => self.tube_width = value,
            RecordField::TubeThickness => self.tube_thickness = value,
            RecordField::Weld => self.weld = value,
            RecordField::CoreMaterial => self.core_material = value,
            RecordField::Template => self.template = Template::from_label_or_default(&value),
        }
    }

    /// Sum of the row quantities of this record.
    pub fn total_quantity(&self) -> u64 {
        self.quantity_rows
            .iter()
            .map(QuantityRow::quantity_value)
            .fold(0, u64::saturating_add)
    }

    /// Whether any row has a quantity typed in.
    pub fn has_quantities(&self) -> bool {
        self.quantity_rows.iter().any(|r| !r.quantity.is_empty())
    }

    /// Check that every numeric field parses as an integer.
    pub fn validate_numeric(&self) -> CoreResult<()> {
        let invalid: Vec<&str> = RecordField::NUMERIC
            .iter()
            .filter(|f| parse_int_prefix(self.field(**f)).is_none())
            .map(|f| f.key())
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(CoreError::validation(format!(
                "Record {} has non-numeric fields: {}",
                self.id,
                invalid.join(", ")
            )))
        }
    }
}

impl Default for ParameterRecord {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Integer parsing
// ============================================================================

/// Parse the leading integer of `text`.
///
/// Leading whitespace is skipped, an optional sign is accepted and the
/// longest run of ASCII digits is converted. Trailing characters are ignored
/// (`"12mm"` is 12, `"1.5"` is 1). Returns `None` when no digit follows the
/// optional sign or the value does not fit in an `i64`.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

//! Artifact Models
//!
//! Entries of the generated-artifact ledger.

use serde::{Deserialize, Serialize};

/// Path prefix of drawing handles minted locally (no backend file behind them).
pub const VIRTUAL_DRAWING_PREFIX: &str = "drawing_";

/// What a generated artifact contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Drawing,
    Materials,
}

impl ArtifactKind {
    /// Wire name used in batch-download `fileTypes`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drawing => "drawing",
            Self::Materials => "materials",
        }
    }
}

/// Which records produced an artifact.
///
/// On the wire this is the record index, or `-1` for the whole record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum ArtifactSource {
    Record(usize),
    AllRecords,
}

impl ArtifactSource {
    pub fn wire_index(&self) -> i64 {
        match self {
            Self::Record(index) => *index as i64,
            Self::AllRecords => -1,
        }
    }
}

impl From<ArtifactSource> for i64 {
    fn from(source: ArtifactSource) -> Self {
        source.wire_index()
    }
}

impl TryFrom<i64> for ArtifactSource {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::AllRecords),
            v if v >= 0 => Ok(Self::Record(v as usize)),
            v => Err(format!("invalid artifact source index: {}", v)),
        }
    }
}

/// One file produced by the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    /// Unique per ledger entry, even when names repeat
    pub id: String,
    /// Display and download file name
    pub name: String,
    /// Backend path, or a locally minted handle for virtual artifacts
    pub path: String,
    pub kind: ArtifactKind,
    #[serde(rename = "tableIndex")]
    pub source: ArtifactSource,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl GeneratedArtifact {
    pub fn new(
        kind: ArtifactKind,
        name: impl Into<String>,
        path: impl Into<String>,
        source: ArtifactSource,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            path: path.into(),
            kind,
            source,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Virtual artifacts have no file on the service side, so deleting them
    /// never issues a remote call.
    pub fn is_virtual(&self) -> bool {
        self.kind == ArtifactKind::Materials || self.path.starts_with(VIRTUAL_DRAWING_PREFIX)
    }
}

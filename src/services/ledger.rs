//! Artifact Ledger
//!
//! Append-only list of files the generation service produced during this
//! session. Entries are never merged, even when names repeat; only an
//! explicit delete removes one. Network operations read the ledger but never
//! change it.

use std::path::Path;

use crate::models::artifact::{ArtifactKind, ArtifactSource, GeneratedArtifact, VIRTUAL_DRAWING_PREFIX};

/// Virtual handle for the `index`-th drawing of a multi-file generation.
pub fn virtual_drawing_path(timestamp_ms: i64, index: Option<usize>) -> String {
    match index {
        Some(i) => format!("{}{}_{}.dxf", VIRTUAL_DRAWING_PREFIX, timestamp_ms, i),
        None => format!("{}{}.dxf", VIRTUAL_DRAWING_PREFIX, timestamp_ms),
    }
}

/// Virtual handle for a materials list.
pub fn virtual_materials_path(timestamp_ms: i64) -> String {
    format!("materials_{}.xlsx", timestamp_ms)
}

/// Default name of a single streamed drawing.
pub fn default_drawing_name(project_name: &str) -> String {
    format!("{} BRB.dxf", project_name)
}

/// Default name of a materials list.
pub fn default_materials_name(project_name: &str) -> String {
    format!("{}_materials.xlsx", project_name)
}

/// Name of the batch archive.
pub fn archive_name(project_name: &str) -> String {
    let base = project_name.trim();
    if base.is_empty() {
        "generated_files.zip".to_string()
    } else {
        format!("{}.zip", base)
    }
}

/// `fileTypes` / `tableIndices` pair describing every ledger entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSelection {
    pub file_types: Vec<String>,
    pub table_indices: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ArtifactLedger {
    entries: Vec<GeneratedArtifact>,
}

impl ArtifactLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[GeneratedArtifact] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedArtifact> {
        self.entries.iter().find(|a| a.id == id)
    }

    /// Append an entry.
    pub fn record(&mut self, artifact: GeneratedArtifact) -> GeneratedArtifact {
        self.entries.push(artifact.clone());
        artifact
    }

    /// Record the drawings named in a multi-file response, one per record
    /// index. With a backend project folder the names are real paths;
    /// otherwise each gets a virtual handle.
    pub fn record_drawing_files(
        &mut self,
        names: &[String],
        real_paths: bool,
        timestamp_ms: i64,
    ) -> Vec<GeneratedArtifact> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let (display, path) = if real_paths {
                    let display = Path::new(name)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| name.clone());
                    (display, name.clone())
                } else {
                    (name.clone(), virtual_drawing_path(timestamp_ms, Some(index)))
                };
                self.record(GeneratedArtifact::new(
                    ArtifactKind::Drawing,
                    display,
                    path,
                    ArtifactSource::Record(index),
                ))
            })
            .collect()
    }

    /// Record a single streamed drawing.
    pub fn record_single_drawing(&mut self, name: String, timestamp_ms: i64) -> GeneratedArtifact {
        self.record(GeneratedArtifact::new(
            ArtifactKind::Drawing,
            name,
            virtual_drawing_path(timestamp_ms, None),
            ArtifactSource::Record(0),
        ))
    }

    /// Record a materials list covering all records.
    pub fn record_materials(&mut self, name: String, timestamp_ms: i64) -> GeneratedArtifact {
        self.record(GeneratedArtifact::new(
            ArtifactKind::Materials,
            name,
            virtual_materials_path(timestamp_ms),
            ArtifactSource::AllRecords,
        ))
    }

    /// Remove an entry locally.
    pub fn remove(&mut self, id: &str) -> Option<GeneratedArtifact> {
        let index = self.entries.iter().position(|a| a.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn batch_selection(&self) -> BatchSelection {
        BatchSelection {
            file_types: self
                .entries
                .iter()
                .map(|a| a.kind.as_str().to_string())
                .collect(),
            table_indices: self.entries.iter().map(|a| a.source.wire_index()).collect(),
        }
    }
}

//! Designer Service
//!
//! Owns the live workspace: project name, record store, drag state and
//! artifact ledger. All in-memory mutation happens under one lock, held only
//! for the synchronous part of an operation. Calls to the generation service
//! run with the lock released, so the workspace stays editable while a
//! request is pending.

use std::path::Path;
use std::sync::Arc;

use brb_designer_core::codec;
use brb_designer_core::{
    DragEvent, ProjectDocument, RecordField, RecordStore, ReorderProtocol, RowColumn,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::file_sink::FileSink;
use super::generation::{
    BatchDownloadRequest, DesignRequest, DrawingDownloadRequest, DrawingOutput, GenerationClient,
    OutboundRecord,
};
use super::in_flight::{ActionClass, InFlight};
use super::ledger::{self, ArtifactLedger};
use super::persistence::PersistenceBridge;
use crate::models::artifact::{ArtifactKind, ArtifactSource, GeneratedArtifact};
use crate::models::workspace::{SavedFile, WorkspaceSnapshot};
use crate::utils::error::{AppError, AppResult};

/// Outward-facing collaborators, swapped when settings change
#[derive(Clone)]
pub struct Endpoints {
    pub client: Arc<dyn GenerationClient>,
    pub sink: Arc<dyn FileSink>,
    /// Backend output folder sent with generation requests
    pub project_folder: Option<String>,
}

struct Workspace {
    project_name: String,
    store: RecordStore,
    drag: ReorderProtocol,
    ledger: ArtifactLedger,
}

impl Workspace {
    fn snapshot(&self, in_flight: &InFlight) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            project_name: self.project_name.clone(),
            records: self.store.records().to_vec(),
            total_quantity: self.store.total_quantity(),
            unsaved_content: !self.project_name.is_empty()
                || self.store.records().iter().any(|r| r.has_quantities()),
            drag: self.drag.state(),
            insertion_marker: self.drag.insertion_marker(),
            artifacts: self.ledger.list().to_vec(),
            generating_drawings: in_flight.is_active(ActionClass::DrawingGeneration),
            generating_materials: in_flight.is_active(ActionClass::MaterialsGeneration),
        }
    }

    /// Pre-flight checks for any generation request.
    fn validate_for_generation(&self) -> AppResult<()> {
        if self.project_name.trim().is_empty() {
            return Err(AppError::validation("Project name is required"));
        }
        if self.store.total_quantity() == 0 {
            return Err(AppError::validation("Total quantity must be greater than 0"));
        }
        for record in self.store.records() {
            record.validate_numeric()?;
        }
        Ok(())
    }

    fn design_request(&self, project_folder: Option<String>) -> DesignRequest {
        DesignRequest::new(
            self.project_name.clone(),
            self.store.records(),
            self.store.total_quantity(),
            project_folder,
        )
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn saved_file(path: &Path, size: usize) -> SavedFile {
    SavedFile {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_string_lossy().into_owned(),
        size: size as u64,
    }
}

pub struct DesignerService {
    workspace: RwLock<Workspace>,
    endpoints: RwLock<Endpoints>,
    persistence: PersistenceBridge,
    in_flight: InFlight,
}

impl DesignerService {
    /// Restore the last checkpoint and start serving.
    pub fn new(persistence: PersistenceBridge, endpoints: Endpoints) -> Self {
        let restored = persistence.load();
        info!(
            "[Designer] Workspace restored: '{}' with {} records, total {}",
            restored.project_name,
            restored.store.len(),
            restored.store.total_quantity()
        );

        Self {
            workspace: RwLock::new(Workspace {
                project_name: restored.project_name,
                store: restored.store,
                drag: ReorderProtocol::new(),
                ledger: ArtifactLedger::new(),
            }),
            endpoints: RwLock::new(endpoints),
            persistence,
            in_flight: InFlight::new(),
        }
    }

    /// Swap the generation client, file sink and project folder.
    pub async fn reconfigure(&self, endpoints: Endpoints) {
        *self.endpoints.write().await = endpoints;
    }

    async fn endpoints(&self) -> Endpoints {
        self.endpoints.read().await.clone()
    }

    /// Whether the generation service answers its health probe.
    pub async fn service_health(&self) -> bool {
        let client = self.endpoints().await.client;
        client.health().await
    }

    pub async fn snapshot(&self) -> WorkspaceSnapshot {
        self.workspace.read().await.snapshot(&self.in_flight)
    }

    /// Apply `f` under the lock; checkpoint when it reports a change.
    async fn mutate<F>(&self, f: F) -> WorkspaceSnapshot
    where
        F: FnOnce(&mut Workspace) -> bool,
    {
        let mut ws = self.workspace.write().await;
        if f(&mut *ws) {
            self.persistence.checkpoint(&ws.project_name, &ws.store);
        }
        ws.snapshot(&self.in_flight)
    }

    // ========================================================================
    // Record editing
    // ========================================================================

    pub async fn set_project_name(&self, name: String) -> WorkspaceSnapshot {
        self.mutate(|ws| {
            ws.project_name = name;
            true
        })
        .await
    }

    pub async fn add_record(&self) -> WorkspaceSnapshot {
        self.mutate(|ws| {
            ws.store.add_record();
            true
        })
        .await
    }

    pub async fn remove_record(&self, id: &str) -> WorkspaceSnapshot {
        self.mutate(|ws| ws.store.remove_record(id).is_applied()).await
    }

    pub async fn update_field(&self, id: &str, field: RecordField, value: String) -> WorkspaceSnapshot {
        self.mutate(|ws| ws.store.update_field(id, field, value).is_applied())
            .await
    }

    pub async fn add_quantity_row(&self, id: &str) -> WorkspaceSnapshot {
        self.mutate(|ws| ws.store.add_quantity_row(id).is_applied()).await
    }

    pub async fn remove_quantity_row(&self, id: &str, index: usize) -> WorkspaceSnapshot {
        self.mutate(|ws| ws.store.remove_quantity_row(id, index).is_applied())
            .await
    }

    pub async fn update_quantity_row(
        &self,
        id: &str,
        index: usize,
        column: RowColumn,
        value: String,
    ) -> WorkspaceSnapshot {
        self.mutate(|ws| {
            ws.store
                .update_quantity_row(id, index, column, value)
                .is_applied()
        })
        .await
    }

    pub async fn reorder(&self, from: usize, to: usize) -> WorkspaceSnapshot {
        self.mutate(|ws| ws.store.reorder(from, to).is_applied()).await
    }

    pub async fn compute_total(&self) -> u64 {
        self.workspace.read().await.store.compute_total()
    }

    /// Feed one drag event; a completed drop reorders the records.
    pub async fn drag(&self, event: DragEvent) -> WorkspaceSnapshot {
        self.mutate(|ws| {
            let len = ws.store.len();
            match ws.drag.handle(event, len) {
                Some(commit) => commit.apply(&mut ws.store).is_applied(),
                None => false,
            }
        })
        .await
    }

    // ========================================================================
    // Project files
    // ========================================================================

    /// Start over with one empty record. Generated artifacts stay listed.
    pub async fn new_project(&self) -> WorkspaceSnapshot {
        let mut ws = self.workspace.write().await;
        ws.project_name.clear();
        ws.store = RecordStore::new();
        ws.drag.cancel();
        self.persistence.reset();
        info!("[Designer] New project");
        ws.snapshot(&self.in_flight)
    }

    async fn load_document(&self, document: ProjectDocument) -> WorkspaceSnapshot {
        info!(
            "[Designer] Loaded project '{}' ({} records, total {})",
            document.project_name,
            document.records.len(),
            document.total_quantity
        );
        self.mutate(|ws| {
            ws.project_name = document.project_name;
            ws.store.replace(document.records);
            ws.drag.cancel();
            true
        })
        .await
    }

    /// Replace the workspace with the contents of a project document.
    pub async fn import_project(&self, text: &str) -> AppResult<WorkspaceSnapshot> {
        let document = codec::from_json_str(text)?;
        Ok(self.load_document(document).await)
    }

    /// Read a project file from disk and load it.
    pub async fn open_project(&self, path: &Path) -> AppResult<WorkspaceSnapshot> {
        let text = tokio::fs::read_to_string(path).await?;
        self.import_project(&text).await
    }

    /// Write the workspace as `<projectName>.json` into the download directory.
    pub async fn save_project(&self) -> AppResult<SavedFile> {
        let (name, json) = {
            let ws = self.workspace.read().await;
            if ws.project_name.trim().is_empty() {
                return Err(AppError::validation("Enter a project name before saving"));
            }
            let document = codec::serialize(
                ws.store.records(),
                &ws.project_name,
                ws.store.total_quantity(),
            );
            (ws.project_name.clone(), codec::to_json_string(&document)?)
        };

        let sink = self.endpoints().await.sink;
        let path = sink.save(&format!("{}.json", name), json.as_bytes()).await?;
        info!("[Designer] Project saved to {}", path.display());
        Ok(saved_file(&path, json.len()))
    }

    // ========================================================================
    // Generation
    // ========================================================================

    pub async fn generate_drawings(&self) -> AppResult<Vec<GeneratedArtifact>> {
        let _guard = self.in_flight.try_begin(ActionClass::DrawingGeneration)?;
        let endpoints = self.endpoints().await;
        let real_paths = endpoints.project_folder.is_some();

        let request = {
            let ws = self.workspace.read().await;
            ws.validate_for_generation()?;
            ws.design_request(endpoints.project_folder.clone())
        };

        let output = endpoints.client.generate_drawings(&request).await?;

        let mut ws = self.workspace.write().await;
        let recorded = match output {
            DrawingOutput::Files(names) => ws.ledger.record_drawing_files(&names, real_paths, now_ms()),
            DrawingOutput::Single(payload) => {
                let name = payload.name_or(ledger::default_drawing_name(&request.project_name));
                vec![ws.ledger.record_single_drawing(name, now_ms())]
            }
        };
        info!(
            "[Designer] Drawing generation finished: {} files, total {}",
            recorded.len(),
            request.total_quantity
        );
        Ok(recorded)
    }

    pub async fn generate_materials(&self) -> AppResult<GeneratedArtifact> {
        let _guard = self.in_flight.try_begin(ActionClass::MaterialsGeneration)?;
        let endpoints = self.endpoints().await;

        let request = {
            let ws = self.workspace.read().await;
            ws.validate_for_generation()?;
            ws.design_request(endpoints.project_folder.clone())
        };

        let payload = endpoints.client.generate_materials(&request).await?;
        let name = payload.name_or(ledger::default_materials_name(&request.project_name));

        let recorded = self.workspace.write().await.ledger.record_materials(name, now_ms());
        info!("[Designer] Materials list generated: {}", recorded.name);
        Ok(recorded)
    }

    // ========================================================================
    // Artifacts
    // ========================================================================

    pub async fn list_artifacts(&self) -> Vec<GeneratedArtifact> {
        self.workspace.read().await.ledger.list().to_vec()
    }

    /// Fetch one artifact from the service and save it under its name.
    pub async fn download_artifact(&self, id: &str) -> AppResult<SavedFile> {
        let endpoints = self.endpoints().await;

        enum Fetch {
            Materials(DesignRequest),
            Drawing(DrawingDownloadRequest),
        }

        let (artifact, fetch) = {
            let ws = self.workspace.read().await;
            let artifact = ws
                .ledger
                .get(id)
                .cloned()
                .ok_or_else(|| AppError::not_found(format!("Artifact {}", id)))?;

            let fetch = match (artifact.kind, artifact.source) {
                (ArtifactKind::Materials, _) | (ArtifactKind::Drawing, ArtifactSource::AllRecords) => {
                    Fetch::Materials(ws.design_request(endpoints.project_folder.clone()))
                }
                (ArtifactKind::Drawing, ArtifactSource::Record(index)) => {
                    let record = ws.store.get_index(index).ok_or_else(|| {
                        AppError::not_found(format!(
                            "Record {} for artifact {} no longer exists",
                            index + 1,
                            artifact.name
                        ))
                    })?;
                    Fetch::Drawing(DrawingDownloadRequest {
                        project_name: ws.project_name.clone(),
                        parameter_table: OutboundRecord::from(record),
                        total_quantity: record.total_quantity(),
                    })
                }
            };
            (artifact, fetch)
        };

        let payload = match fetch {
            Fetch::Materials(request) => endpoints.client.generate_materials(&request).await?,
            Fetch::Drawing(request) => endpoints.client.download_drawing(&request).await?,
        };

        let path = endpoints.sink.save(&artifact.name, &payload.bytes).await?;
        info!("[Designer] Downloaded {} to {}", artifact.name, path.display());
        Ok(saved_file(&path, payload.bytes.len()))
    }

    /// Fetch every listed artifact as one archive.
    pub async fn download_all_artifacts(&self) -> AppResult<SavedFile> {
        let endpoints = self.endpoints().await;

        let request = {
            let ws = self.workspace.read().await;
            if ws.ledger.is_empty() {
                return Err(AppError::validation("No generated files to download"));
            }
            let selection = ws.ledger.batch_selection();
            BatchDownloadRequest {
                project_name: ws.project_name.clone(),
                parameter_tables: ws.store.records().iter().map(OutboundRecord::from).collect(),
                total_quantity: ws.store.total_quantity(),
                file_types: selection.file_types,
                table_indices: selection.table_indices,
            }
        };

        let payload = endpoints.client.batch_download(&request).await?;
        let name = ledger::archive_name(&request.project_name);
        let path = endpoints.sink.save(&name, &payload.bytes).await?;
        info!(
            "[Designer] Downloaded {} files as {}",
            request.file_types.len(),
            path.display()
        );
        Ok(saved_file(&path, payload.bytes.len()))
    }

    /// Remove an artifact from the ledger. Files kept by the service are
    /// deleted remotely afterwards; if that fails the local removal stands
    /// and `RemoteCleanup` is returned.
    pub async fn delete_artifact(&self, id: &str) -> AppResult<GeneratedArtifact> {
        let removed = self
            .workspace
            .write()
            .await
            .ledger
            .remove(id)
            .ok_or_else(|| AppError::not_found(format!("Artifact {}", id)))?;

        if removed.is_virtual() {
            return Ok(removed);
        }

        let client = self.endpoints().await.client;
        if let Err(e) = client.delete_file(&removed.path).await {
            warn!(
                "[Designer] Remote delete of {} failed: {}",
                removed.path, e
            );
            return Err(AppError::RemoteCleanup(format!("{}: {}", removed.name, e)));
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for DesignerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignerService").finish_non_exhaustive()
    }
}

//! Caller-owned workspace state.
//!
//! [`Workspace`] holds the task list, the notes text, and the knowledge
//! chunk set. It sequences the pure classifier, normalizer, and chunker per
//! user action and persists through an injected [`KeyValueStore`].
//!
//! Every mutating operation encodes and saves the new state first and only
//! then replaces the in-memory copy, so a failed save or a failed import
//! leaves the workspace exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{info, instrument};

use deskflow_chunker::{Chunker, ChunkerConfig};
use deskflow_shared::{
    Chunk, ClassificationResult, Clock, DeskflowError, ExportFormat, IdGenerator, Quadrant,
    Result, SystemClock, UuidIds, timestamp,
};

use crate::store::{KNOWLEDGE_KEY, KeyValueStore, NOTES_KEY, TASKS_KEY};

// ---------------------------------------------------------------------------
// Persisted state
// ---------------------------------------------------------------------------

/// A classified task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: String,
    pub text: String,
    pub classification: ClassificationResult,
    /// User-chosen quadrant that wins over the classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadrant_override: Option<Quadrant>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl TaskItem {
    /// Effective quadrant: the override if set, else the classification's.
    pub fn quadrant(&self) -> Quadrant {
        self.quadrant_override
            .unwrap_or_else(|| Quadrant::from(&self.classification))
    }
}

/// Source text and the chunk set derived from (or imported for) it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Knowledge {
    pub source_text: String,
    pub chunks: Vec<Chunk>,
}

/// Aggregate counts for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSummary {
    pub tasks_by_quadrant: HashMap<Quadrant, usize>,
    pub chunk_count: usize,
    pub total_token_estimate: u64,
    pub notes_word_count: usize,
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

/// Explicit state holder owned by the caller.
pub struct Workspace<S: KeyValueStore> {
    store: S,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    chunker: Chunker,
    tasks: Vec<TaskItem>,
    notes: String,
    knowledge: Knowledge,
}

impl<S: KeyValueStore> Workspace<S> {
    /// Load state from `store` using the system clock and UUID ids.
    pub fn load(store: S, config: ChunkerConfig) -> Result<Self> {
        Self::load_with(store, config, Arc::new(SystemClock), Arc::new(UuidIds))
    }

    /// Load state from `store` with explicit capabilities.
    ///
    /// Missing keys start empty; stored values that fail to decode are a
    /// `Storage` error.
    #[instrument(skip_all, fields(chunk_size = config.chunk_size(), overlap = config.overlap()))]
    pub fn load_with(
        store: S,
        config: ChunkerConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        let tasks: Vec<TaskItem> = load_json(&store, TASKS_KEY)?.unwrap_or_default();
        let notes: String = load_json(&store, NOTES_KEY)?.unwrap_or_default();
        let knowledge: Knowledge = load_json(&store, KNOWLEDGE_KEY)?.unwrap_or_default();

        info!(
            tasks = tasks.len(),
            chunks = knowledge.chunks.len(),
            "workspace loaded"
        );

        let chunker = Chunker::with_capabilities(config, clock.clone(), ids.clone());
        Ok(Self {
            store,
            clock,
            ids,
            chunker,
            tasks,
            notes,
            knowledge,
        })
    }

    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn knowledge(&self) -> &Knowledge {
        &self.knowledge
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.knowledge.chunks
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the workspace, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Classify and store a new task. Empty or whitespace-only text is rejected.
    pub fn add_task(&mut self, text: &str) -> Result<&TaskItem> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DeskflowError::validation("task text must not be empty"));
        }

        let task = TaskItem {
            id: self.ids.next_id(),
            text: text.to_string(),
            classification: deskflow_classifier::classify(text),
            quadrant_override: None,
            created_at: self.clock.now(),
        };
        info!(id = %task.id, quadrant = task.quadrant().label(), "task added");

        let mut next = self.tasks.clone();
        next.push(task);
        self.commit_tasks(next)?;

        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// Set or clear the user's quadrant override for a task.
    pub fn set_quadrant(&mut self, id: &str, quadrant: Option<Quadrant>) -> Result<()> {
        let mut next = self.tasks.clone();
        let task = next
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| unknown_task(id))?;
        task.quadrant_override = quadrant;
        self.commit_tasks(next)
    }

    /// Remove a task, returning it.
    pub fn remove_task(&mut self, id: &str) -> Result<TaskItem> {
        let mut next = self.tasks.clone();
        let position = next
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| unknown_task(id))?;
        let removed = next.remove(position);
        self.commit_tasks(next)?;
        info!(id, "task removed");
        Ok(removed)
    }

    /// Tasks whose effective quadrant is `quadrant`, in insertion order.
    pub fn tasks_in(&self, quadrant: Quadrant) -> Vec<&TaskItem> {
        self.tasks
            .iter()
            .filter(|t| t.quadrant() == quadrant)
            .collect()
    }

    fn commit_tasks(&mut self, next: Vec<TaskItem>) -> Result<()> {
        save_json(&mut self.store, TASKS_KEY, &next)?;
        self.tasks = next;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Notes
    // -----------------------------------------------------------------------

    /// Replace the notes text.
    pub fn set_notes(&mut self, text: &str) -> Result<()> {
        save_json(&mut self.store, NOTES_KEY, text)?;
        self.notes = text.to_string();
        Ok(())
    }

    /// The notes rendered as Markdown. Recomputed on every call.
    pub fn notes_markdown(&self) -> String {
        deskflow_markdown::normalize(&self.notes)
    }

    // -----------------------------------------------------------------------
    // Knowledge chunks
    // -----------------------------------------------------------------------

    /// Chunk `text`, replacing the current chunk set.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub fn chunk_knowledge(&mut self, text: &str) -> Result<&[Chunk]> {
        let next = Knowledge {
            source_text: text.to_string(),
            chunks: self.chunker.chunk(text),
        };
        self.commit_knowledge(next)?;
        info!(chunks = self.knowledge.chunks.len(), "knowledge chunked");
        Ok(self.knowledge.chunks.as_slice())
    }

    /// Export the current chunk set.
    pub fn export_chunks(&self, format: ExportFormat) -> Result<String> {
        deskflow_chunker::serialize(&self.knowledge.chunks, format)
    }

    /// Import a JSON or JSONL payload, replacing the chunk set and source text.
    ///
    /// On any error the previous state is kept. Returns the number of chunks
    /// imported.
    #[instrument(skip_all, fields(bytes = raw.len()))]
    pub fn import_chunks(&mut self, raw: &str) -> Result<usize> {
        let parsed = deskflow_chunker::parse_with(raw, self.clock.as_ref(), self.ids.as_ref())?;
        let count = parsed.chunks.len();
        self.commit_knowledge(Knowledge {
            source_text: parsed.content,
            chunks: parsed.chunks,
        })?;
        info!(chunks = count, "chunks imported");
        Ok(count)
    }

    fn commit_knowledge(&mut self, next: Knowledge) -> Result<()> {
        save_json(&mut self.store, KNOWLEDGE_KEY, &next)?;
        self.knowledge = next;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Summary
    // -----------------------------------------------------------------------

    pub fn summary(&self) -> WorkspaceSummary {
        let mut tasks_by_quadrant: HashMap<Quadrant, usize> =
            Quadrant::ALL.iter().map(|q| (*q, 0)).collect();
        for task in &self.tasks {
            *tasks_by_quadrant.entry(task.quadrant()).or_default() += 1;
        }

        WorkspaceSummary {
            tasks_by_quadrant,
            chunk_count: self.knowledge.chunks.len(),
            total_token_estimate: self
                .knowledge
                .chunks
                .iter()
                .map(|c| c.metadata.token_estimate)
                .sum(),
            notes_word_count: deskflow_markdown::word_count(&self.notes_markdown()),
        }
    }
}

impl<S: KeyValueStore + std::fmt::Debug> std::fmt::Debug for Workspace<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("store", &self.store)
            .field("chunker", &self.chunker)
            .field("tasks", &self.tasks.len())
            .field("chunks", &self.knowledge.chunks.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn unknown_task(id: &str) -> DeskflowError {
    DeskflowError::validation(format!("no task with id '{id}'"))
}

fn load_json<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| DeskflowError::Storage(format!("corrupt value for '{key}': {e}")))
}

fn save_json<S: KeyValueStore, T: Serialize + ?Sized>(
    store: &mut S,
    key: &str,
    value: &T,
) -> Result<()> {
    let encoded = serde_json::to_string(value)
        .map_err(|e| DeskflowError::Storage(format!("failed to encode '{key}': {e}")))?;
    store.save(key, &encoded)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use deskflow_shared::{FixedClock, SequentialIds};

    use crate::store::{FileStore, MemoryStore};

    fn workspace_with<S: KeyValueStore>(store: S) -> Workspace<S> {
        Workspace::load_with(
            store,
            ChunkerConfig::new(60, 10).unwrap(),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap())),
            Arc::new(SequentialIds::new("id")),
        )
        .expect("load workspace")
    }

    /// Store whose saves always fail.
    #[derive(Debug, Default)]
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn load(&self, key: &str) -> Result<Option<String>> {
            self.0.load(key)
        }
        fn save(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(DeskflowError::Storage("store is read-only".into()))
        }
    }

    #[test]
    fn empty_store_starts_empty() {
        let ws = workspace_with(MemoryStore::new());
        assert!(ws.tasks().is_empty());
        assert!(ws.chunks().is_empty());
        assert_eq!(ws.notes(), "");
        assert_eq!(ws.notes_markdown(), "");
    }

    #[test]
    fn add_task_classifies_and_persists() {
        let mut ws = workspace_with(MemoryStore::new());
        let task = ws.add_task("  urgent client review  ").unwrap();
        assert_eq!(task.id, "id-0");
        assert_eq!(task.text, "urgent client review");
        assert_eq!(task.quadrant(), Quadrant::DoFirst);

        let stored = ws.store().load(TASKS_KEY).unwrap().expect("tasks saved");
        assert!(stored.contains("urgent client review"));
        assert!(stored.contains("\"createdAt\":\"2026-02-10T12:00:00.000Z\""));
    }

    #[test]
    fn empty_task_is_rejected() {
        let mut ws = workspace_with(MemoryStore::new());
        let err = ws.add_task("   ").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
        assert!(ws.tasks().is_empty());
    }

    #[test]
    fn quadrant_override_wins_and_can_be_cleared() {
        let mut ws = workspace_with(MemoryStore::new());
        let id = ws.add_task("water the plants").unwrap().id.clone();
        assert_eq!(ws.tasks_in(Quadrant::Eliminate).len(), 1);

        ws.set_quadrant(&id, Some(Quadrant::Schedule)).unwrap();
        assert_eq!(ws.tasks_in(Quadrant::Schedule).len(), 1);
        assert!(ws.tasks_in(Quadrant::Eliminate).is_empty());

        ws.set_quadrant(&id, None).unwrap();
        assert_eq!(ws.tasks()[0].quadrant(), Quadrant::Eliminate);
    }

    #[test]
    fn unknown_task_id_is_an_error() {
        let mut ws = workspace_with(MemoryStore::new());
        assert!(ws.set_quadrant("missing", None).is_err());
        assert!(ws.remove_task("missing").is_err());
    }

    #[test]
    fn remove_task_returns_it() {
        let mut ws = workspace_with(MemoryStore::new());
        ws.add_task("first").unwrap();
        ws.add_task("second").unwrap();
        let removed = ws.remove_task("id-0").unwrap();
        assert_eq!(removed.text, "first");
        assert_eq!(ws.tasks().len(), 1);
        assert_eq!(ws.tasks()[0].text, "second");
    }

    #[test]
    fn notes_render_markdown() {
        let mut ws = workspace_with(MemoryStore::new());
        ws.set_notes("Standup\n\nOwner: Dana").unwrap();
        assert_eq!(ws.notes_markdown(), "# Standup\n\n**Owner**: Dana");
    }

    #[test]
    fn chunk_knowledge_replaces_previous_set() {
        let mut ws = workspace_with(MemoryStore::new());
        let text = "First paragraph about budgets.\n\nSecond paragraph about hiring plans.";
        let count = ws.chunk_knowledge(text).unwrap().len();
        assert_eq!(count, 2);
        assert_eq!(ws.knowledge().source_text, text);

        ws.chunk_knowledge("short").unwrap();
        assert_eq!(ws.chunks().len(), 1);
        assert_eq!(ws.chunks()[0].metadata.chunk_index, 0);
    }

    #[test]
    fn export_then_import_restores_chunks() {
        let mut ws = workspace_with(MemoryStore::new());
        ws.chunk_knowledge("Alpha section text.\n\nBeta section text that is longer than before.")
            .unwrap();
        let original = ws.chunks().to_vec();

        for format in [ExportFormat::Json, ExportFormat::Jsonl] {
            let exported = ws.export_chunks(format).unwrap();
            let mut other = workspace_with(MemoryStore::new());
            assert_eq!(other.import_chunks(&exported).unwrap(), original.len());
            assert_eq!(other.chunks(), original.as_slice());
            assert_eq!(
                other.knowledge().source_text,
                original
                    .iter()
                    .map(|c| c.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n")
            );
        }
    }

    #[test]
    fn failed_import_keeps_prior_state() {
        let mut ws = workspace_with(MemoryStore::new());
        ws.chunk_knowledge("Keep me around.").unwrap();
        let before = ws.knowledge().clone();
        let stored_before = ws.store().load(KNOWLEDGE_KEY).unwrap();

        let err = ws.import_chunks("not valid json").unwrap_err();
        assert!(err.is_malformed_input());
        assert_eq!(ws.knowledge(), &before);
        assert_eq!(ws.store().load(KNOWLEDGE_KEY).unwrap(), stored_before);
    }

    #[test]
    fn failed_save_keeps_prior_state() {
        let mut ws = workspace_with(ReadOnlyStore::default());
        assert!(ws.add_task("urgent thing").is_err());
        assert!(ws.tasks().is_empty());
        assert!(ws.chunk_knowledge("text").is_err());
        assert!(ws.chunks().is_empty());
        assert!(ws.set_notes("notes").is_err());
        assert_eq!(ws.notes(), "");
    }

    #[test]
    fn state_survives_reload() {
        let mut ws = workspace_with(MemoryStore::new());
        ws.add_task("delegate the report to Sam").unwrap();
        ws.set_notes("Retro").unwrap();
        ws.chunk_knowledge("Some knowledge.").unwrap();
        let tasks = ws.tasks().to_vec();
        let knowledge = ws.knowledge().clone();

        let reloaded = workspace_with(ws.into_store());
        assert_eq!(reloaded.tasks(), tasks.as_slice());
        assert_eq!(reloaded.notes(), "Retro");
        assert_eq!(reloaded.knowledge(), &knowledge);
    }

    #[test]
    fn file_store_backed_workspace_reloads() {
        let dir = std::env::temp_dir().join(format!("deskflow-ws-test-{}", uuid::Uuid::now_v7()));
        {
            let mut ws = workspace_with(FileStore::open(&dir).unwrap());
            ws.add_task("Call the plumber tomorrow").unwrap();
        }
        let ws = workspace_with(FileStore::open(&dir).unwrap());
        assert_eq!(ws.tasks().len(), 1);
        assert_eq!(ws.tasks()[0].quadrant(), Quadrant::Delegate);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_stored_value_is_a_storage_error() {
        let mut store = MemoryStore::new();
        store.save(TASKS_KEY, "{ nope").unwrap();
        let err = Workspace::load(store, ChunkerConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("storage error: corrupt value for 'deskflow.tasks'"));
    }

    #[test]
    fn summary_counts() {
        let mut ws = workspace_with(MemoryStore::new());
        ws.add_task("urgent client review").unwrap();
        ws.add_task("someday learn juggling").unwrap();
        ws.add_task("Draft quarterly roadmap").unwrap();
        ws.set_notes("Title\n\nline one\nline two").unwrap();
        ws.chunk_knowledge("one two three four").unwrap();

        let summary = ws.summary();
        assert_eq!(summary.tasks_by_quadrant[&Quadrant::DoFirst], 1);
        assert_eq!(summary.tasks_by_quadrant[&Quadrant::Schedule], 1);
        assert_eq!(summary.tasks_by_quadrant[&Quadrant::Delegate], 0);
        assert_eq!(summary.tasks_by_quadrant[&Quadrant::Eliminate], 1);
        assert_eq!(summary.chunk_count, 1);
        assert_eq!(summary.total_token_estimate, 5);
        assert_eq!(summary.notes_word_count, 5);
    }
}

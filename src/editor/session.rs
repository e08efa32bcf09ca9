//! Async access to a shared editor
//!
//! The editor lock is released while the file is being read, so other
//! actions (clear, a second import) can run in the meantime. Stale
//! completions are then discarded by the editor's import tickets.

use super::{display_name, ImportOutcome, SpreadsheetEditor};
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone, Default)]
pub struct EditorSession {
    editor: Arc<Mutex<SpreadsheetEditor>>,
}

impl EditorSession {
    pub fn new(editor: SpreadsheetEditor) -> Self {
        Self {
            editor: Arc::new(Mutex::new(editor)),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, SpreadsheetEditor> {
        self.editor.lock().await
    }

    /// Import the selected file, if any
    pub async fn handle_upload(&self, selected: Option<&Path>) -> ImportOutcome {
        match selected {
            Some(path) => self.import_path(path).await,
            None => ImportOutcome::Skipped,
        }
    }

    pub async fn import_path(&self, path: &Path) -> ImportOutcome {
        let path = path.to_path_buf();
        let file_name = display_name(&path);
        self.import_with(file_name, async move { tokio::fs::read(path).await })
            .await
    }

    /// Run an import whose bytes come from `read`
    pub async fn import_with<F>(&self, file_name: impl Into<String>, read: F) -> ImportOutcome
    where
        F: Future<Output = io::Result<Vec<u8>>>,
    {
        let ticket = self.editor.lock().await.begin_import(file_name);
        let bytes = read.await;
        self.editor.lock().await.complete_import(ticket, bytes)
    }
}

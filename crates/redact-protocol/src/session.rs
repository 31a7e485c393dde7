//! Per-session command history with undo/redo.

use std::collections::HashMap;

use parking_lot::RwLock;
use redact_core::{Error, Result};
use serde::Serialize;
use tracing::info;

use crate::engine::ProtectionMethod;

const DEFAULT_MAX_DEPTH: usize = 50;
const DEFAULT_MAX_SESSIONS: usize = 100;

/// One completed transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformRecord {
    pub method: ProtectionMethod,
    pub input: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl TransformRecord {
    pub fn new(method: ProtectionMethod, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            method,
            input: input.into(),
            output: output.into(),
            filename: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Undo and redo stacks for one session.
///
/// `push` records a new transformation and clears the redo stack. `undo`
/// moves the latest record onto the redo stack; `redo` moves it back.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    undo: Vec<TransformRecord>,
    redo: Vec<TransformRecord>,
    max_depth: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// History keeping at most `max_depth` undo steps; the oldest fall off.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn push(&mut self, record: TransformRecord) {
        if self.undo.len() >= self.max_depth {
            self.undo.remove(0);
        }
        self.undo.push(record);
        self.redo.clear();
    }

    /// Undo the latest transformation and return it.
    pub fn undo(&mut self) -> Option<TransformRecord> {
        let record = self.undo.pop()?;
        self.redo.push(record.clone());
        Some(record)
    }

    /// Reapply the most recently undone transformation and return it.
    pub fn redo(&mut self) -> Option<TransformRecord> {
        let record = self.redo.pop()?;
        self.undo.push(record.clone());
        Some(record)
    }

    /// The transformation currently in effect.
    pub fn current(&self) -> Option<&TransformRecord> {
        self.undo.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// A session summary.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "canUndo")]
    pub can_undo: bool,
    #[serde(rename = "canRedo")]
    pub can_redo: bool,
    pub depth: usize,
}

struct Session {
    id: String,
    created_at: String,
    history: CommandHistory,
}

impl Session {
    fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            created_at: self.created_at.clone(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            depth: self.history.len(),
        }
    }
}

/// Holds one `CommandHistory` per session id.
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }

    pub fn with_capacity(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Create an empty session and return its summary.
    pub fn create_session(&self) -> SessionInfo {
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            history: CommandHistory::new(),
        };
        let info = session.info();

        let mut sessions = self.sessions.write();
        if sessions.len() >= self.max_sessions {
            if let Some(oldest_id) = sessions
                .values()
                .min_by_key(|s| s.created_at.clone())
                .map(|s| s.id.clone())
            {
                sessions.remove(&oldest_id);
            }
        }
        sessions.insert(info.id.clone(), session);
        info!("Session created: {}", info.id);
        info
    }

    pub fn get_session(&self, id: &str) -> Option<SessionInfo> {
        self.sessions.read().get(id).map(Session::info)
    }

    pub fn remove_session(&self, id: &str) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Record a transformation in a session's history.
    pub fn record(&self, id: &str, record: TransformRecord) -> Result<()> {
        self.with_history(id, |h| h.push(record))
    }

    pub fn undo(&self, id: &str) -> Result<Option<TransformRecord>> {
        self.with_history(id, CommandHistory::undo)
    }

    pub fn redo(&self, id: &str) -> Result<Option<TransformRecord>> {
        self.with_history(id, CommandHistory::redo)
    }

    pub fn current(&self, id: &str) -> Result<Option<TransformRecord>> {
        self.with_history(id, |h| h.current().cloned())
    }

    fn with_history<R>(&self, id: &str, f: impl FnOnce(&mut CommandHistory) -> R) -> Result<R> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("session {}", id)))?;
        Ok(f(&mut session.history))
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

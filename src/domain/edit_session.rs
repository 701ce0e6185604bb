//! Edit/insert session state machine.
//!
//! At most one row is in edit mode at a time. Drafts live here, never in
//! the collection, until the server confirms the save.

use crate::domain::error::StockdeskError;
use crate::domain::record::{Record, RecordDraft, RecordId, RecordPayload, StockField};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Inserting {
        draft: RecordDraft,
    },
    Editing {
        id: RecordId,
        draft: RecordDraft,
    },
}

/// A validated save, ready to send to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(RecordPayload),
    Update(RecordId, RecordPayload),
}

impl EditSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditSession::Idle)
    }

    pub fn is_inserting(&self) -> bool {
        matches!(self, EditSession::Inserting { .. })
    }

    pub fn editing_id(&self) -> Option<RecordId> {
        match self {
            EditSession::Editing { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&RecordDraft> {
        match self {
            EditSession::Idle => None,
            EditSession::Inserting { draft } | EditSession::Editing { draft, .. } => Some(draft),
        }
    }

    /// Open the blank insert row. An insert already in progress keeps its draft.
    pub fn begin_insert(self) -> Self {
        match self {
            EditSession::Inserting { draft } => EditSession::Inserting { draft },
            _ => EditSession::Inserting {
                draft: RecordDraft::blank(),
            },
        }
    }

    /// Put `record` in edit mode, abandoning any other draft unsaved.
    pub fn begin_edit(self, record: &Record) -> Self {
        match self {
            EditSession::Editing { id, draft } if id == record.id => {
                EditSession::Editing { id, draft }
            }
            _ => EditSession::Editing {
                id: record.id,
                draft: RecordDraft::from_record(record),
            },
        }
    }

    /// Apply one input-change event to the active draft. Ignored when idle.
    pub fn set_field(self, field: StockField, value: impl Into<String>) -> Self {
        match self {
            EditSession::Idle => EditSession::Idle,
            EditSession::Inserting { draft } => EditSession::Inserting {
                draft: draft.with(field, value),
            },
            EditSession::Editing { id, draft } => EditSession::Editing {
                id,
                draft: draft.with(field, value),
            },
        }
    }

    /// Discard the draft.
    pub fn cancel(self) -> Self {
        EditSession::Idle
    }

    /// Validate the active draft. `Ok(None)` when there is nothing to save.
    pub fn prepare_save(&self) -> Result<Option<SaveRequest>, StockdeskError> {
        match self {
            EditSession::Idle => Ok(None),
            EditSession::Inserting { draft } => Ok(Some(SaveRequest::Create(draft.validate()?))),
            EditSession::Editing { id, draft } => {
                Ok(Some(SaveRequest::Update(*id, draft.validate()?)))
            }
        }
    }

    /// A create was confirmed by the server.
    pub fn complete_create(self) -> Self {
        match self {
            EditSession::Inserting { .. } => EditSession::Idle,
            other => other,
        }
    }

    /// An update of `id` was confirmed. A different row being edited by now is kept.
    pub fn complete_update(self, id: RecordId) -> Self {
        match self {
            EditSession::Editing { id: current, .. } if current == id => EditSession::Idle,
            other => other,
        }
    }

    /// The record `id` no longer exists; drop its draft if it was being edited.
    pub fn forget(self, id: RecordId) -> Self {
        self.complete_update(id)
    }
}

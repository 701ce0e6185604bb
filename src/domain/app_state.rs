//! Application state and its transitions.
//!
//! `reduce` is the only way state changes. UI events may yield a
//! [`RemoteCommand`]; the outcome of that command comes back as a
//! [`RemoteEvent`]. The collection is only mutated by successful remote
//! events, and at most one command is in flight at a time.

use crate::domain::collection::RecordCollection;
use crate::domain::edit_session::{EditSession, SaveRequest};
use crate::domain::error::StockdeskError;
use crate::domain::record::{Record, RecordId, RecordPayload, StockField};
use crate::domain::view::{self, ChartPoint};

#[derive(Debug)]
pub enum UiEvent {
    /// Initial load or manual refresh.
    Refresh,
    SelectTradeCode(String),
    GoToPage(usize),
    BeginInsert,
    BeginEdit(RecordId),
    SetField(StockField, String),
    Cancel,
    Save,
    Delete(RecordId),
}

/// Outcome of a [`RemoteCommand`]. Failures carry the logged error text.
#[derive(Debug)]
pub enum RemoteEvent {
    Fetched(Result<Vec<Record>, String>),
    Created(Result<Record, String>),
    Updated(RecordId, Result<Record, String>),
    Deleted(RecordId, Result<(), String>),
}

#[derive(Debug)]
pub enum AppEvent {
    Ui(UiEvent),
    Remote(RemoteEvent),
}

impl From<UiEvent> for AppEvent {
    fn from(ev: UiEvent) -> Self {
        AppEvent::Ui(ev)
    }
}

impl From<RemoteEvent> for AppEvent {
    fn from(ev: RemoteEvent) -> Self {
        AppEvent::Remote(ev)
    }
}

/// Work the reducer asks the caller to perform against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    FetchAll,
    Create(RecordPayload),
    Update(RecordId, RecordPayload),
    Delete(RecordId),
}

impl RemoteCommand {
    pub fn kind(&self) -> RequestKind {
        match self {
            RemoteCommand::FetchAll => RequestKind::Fetch,
            RemoteCommand::Create(_) => RequestKind::Create,
            RemoteCommand::Update(id, _) => RequestKind::Update(*id),
            RemoteCommand::Delete(id) => RequestKind::Delete(*id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Fetch,
    Create,
    Update(RecordId),
    Delete(RecordId),
}

/// Message for the user produced by the last UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking alert, e.g. a failed save validation.
    Alert(String),
    /// An action was refused because a request is outstanding.
    Busy,
    /// An action referred to something that does not exist.
    Ignored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub records: RecordCollection,
    /// Empty means nothing selected.
    pub selected_trade_code: String,
    /// 1-based.
    pub current_page: usize,
    pub session: EditSession,
    pub in_flight: Option<RequestKind>,
    pub notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            records: RecordCollection::new(),
            selected_trade_code: String::new(),
            current_page: 1,
            session: EditSession::Idle,
            in_flight: None,
            notice: None,
        }
    }
}

impl AppState {
    pub fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn page_count(&self) -> usize {
        view::page_count(self.records.len())
    }

    pub fn page_rows(&self) -> &[Record] {
        view::page_slice(self.records.records(), self.current_page)
    }

    pub fn chart_series(&self) -> Vec<ChartPoint> {
        view::chart_series(self.records.records(), &self.selected_trade_code)
    }

    pub fn trade_code_options(&self) -> Vec<String> {
        view::trade_code_options(self.records.records())
    }

    fn issue(mut self, command: RemoteCommand) -> (Self, Option<RemoteCommand>) {
        if self.in_flight.is_some() {
            self.notice = Some(Notice::Busy);
            return (self, None);
        }
        self.in_flight = Some(command.kind());
        (self, Some(command))
    }
}

/// Apply one event. Returns the next state and the remote call to make, if any.
pub fn reduce(state: AppState, event: AppEvent) -> (AppState, Option<RemoteCommand>) {
    match event {
        AppEvent::Ui(ev) => reduce_ui(state, ev),
        AppEvent::Remote(ev) => (reduce_remote(state, ev), None),
    }
}

fn reduce_ui(mut state: AppState, ev: UiEvent) -> (AppState, Option<RemoteCommand>) {
    state.notice = None;
    match ev {
        UiEvent::Refresh => state.issue(RemoteCommand::FetchAll),
        UiEvent::SelectTradeCode(code) => {
            state.selected_trade_code = code;
            (state, None)
        }
        UiEvent::GoToPage(page) => {
            let last = state.page_count().max(1);
            if page == 0 || page > last {
                state.notice = Some(Notice::Ignored(format!(
                    "page {page} is out of range 1..={last}"
                )));
            } else {
                state.current_page = page;
            }
            (state, None)
        }
        UiEvent::BeginInsert => {
            state.session = state.session.begin_insert();
            (state, None)
        }
        UiEvent::BeginEdit(id) => {
            match state.records.get(id) {
                Some(record) => state.session = state.session.begin_edit(record),
                None => {
                    state.notice = Some(Notice::Ignored(
                        StockdeskError::UnknownRecord(id).to_string(),
                    ))
                }
            }
            (state, None)
        }
        UiEvent::SetField(field, value) => {
            state.session = state.session.set_field(field, value);
            (state, None)
        }
        UiEvent::Cancel => {
            state.session = state.session.cancel();
            (state, None)
        }
        UiEvent::Save => {
            if state.in_flight.is_some() {
                state.notice = Some(Notice::Busy);
                return (state, None);
            }
            match state.session.prepare_save() {
                Ok(Some(SaveRequest::Create(payload))) => {
                    state.issue(RemoteCommand::Create(payload))
                }
                Ok(Some(SaveRequest::Update(id, payload))) => {
                    state.issue(RemoteCommand::Update(id, payload))
                }
                Ok(None) => {
                    state.notice = Some(Notice::Ignored("nothing to save".into()));
                    (state, None)
                }
                Err(e) => {
                    state.notice = Some(Notice::Alert(e.to_string()));
                    (state, None)
                }
            }
        }
        UiEvent::Delete(id) => {
            if state.in_flight.is_none() && !state.records.contains(id) {
                state.notice = Some(Notice::Ignored(
                    StockdeskError::UnknownRecord(id).to_string(),
                ));
                return (state, None);
            }
            state.issue(RemoteCommand::Delete(id))
        }
    }
}

fn reduce_remote(mut state: AppState, ev: RemoteEvent) -> AppState {
    state.in_flight = None;
    match ev {
        RemoteEvent::Fetched(Ok(records)) => {
            state.records.replace_all(records);
            if let Some(id) = state.session.editing_id() {
                if !state.records.contains(id) {
                    state.session = state.session.forget(id);
                }
            }
        }
        RemoteEvent::Created(Ok(record)) => {
            state.records.append(record);
            state.session = state.session.complete_create();
        }
        RemoteEvent::Updated(id, Ok(record)) => {
            state.records.replace(id, record);
            state.session = state.session.complete_update(id);
        }
        RemoteEvent::Deleted(id, Ok(())) => {
            state.records.remove(id);
            state.session = state.session.forget(id);
        }
        RemoteEvent::Fetched(Err(_))
        | RemoteEvent::Created(Err(_))
        | RemoteEvent::Updated(_, Err(_))
        | RemoteEvent::Deleted(_, Err(_)) => {}
    }
    state
}

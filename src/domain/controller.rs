//! Drives [`AppState`] against a [`StockStorePort`].
//!
//! The controller is the only place remote calls happen. Each UI event is
//! reduced; a resulting command is executed once, and its outcome is fed
//! back through the reducer. Remote failures are logged and otherwise only
//! clear the loading flag.

use crate::domain::app_state::{
    reduce, AppEvent, AppState, RemoteCommand, RemoteEvent, UiEvent,
};
use crate::domain::error::StockdeskError;
use crate::domain::record::Record;
use crate::ports::stock_store_port::StockStorePort;

pub struct Controller<'a> {
    store: &'a dyn StockStorePort,
    state: AppState,
    last_error: Option<StockdeskError>,
    saved: Option<Record>,
    loading_hook: Option<Box<dyn FnMut(bool) + 'a>>,
}

impl<'a> Controller<'a> {
    pub fn new(store: &'a dyn StockStorePort) -> Self {
        Self::with_state(store, AppState::default())
    }

    pub fn with_state(store: &'a dyn StockStorePort, state: AppState) -> Self {
        Self {
            store,
            state,
            last_error: None,
            saved: None,
            loading_hook: None,
        }
    }

    /// Called with `true` when a remote call starts and `false` once it completes.
    pub fn on_loading(mut self, hook: impl FnMut(bool) + 'a) -> Self {
        self.loading_hook = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Error of the most recent remote call, if it failed and was not yet taken.
    pub fn take_error(&mut self) -> Option<StockdeskError> {
        self.last_error.take()
    }

    /// Record stored by the most recent confirmed create or update.
    pub fn take_saved(&mut self) -> Option<Record> {
        self.saved.take()
    }

    /// Initial fetch of the full collection.
    pub fn load(&mut self) {
        self.dispatch(UiEvent::Refresh);
    }

    pub fn dispatch(&mut self, event: UiEvent) {
        let command = self.apply(event.into());
        if let Some(notice) = &self.state.notice {
            log::warn!("{notice:?}");
        }
        if let Some(command) = command {
            self.signal_loading();
            let outcome = self.execute(command);
            self.apply(outcome.into());
            self.signal_loading();
        }
    }

    fn apply(&mut self, event: AppEvent) -> Option<RemoteCommand> {
        let state = std::mem::take(&mut self.state);
        let (next, command) = reduce(state, event);
        self.state = next;
        command
    }

    fn signal_loading(&mut self) {
        let loading = self.state.loading();
        if let Some(hook) = self.loading_hook.as_mut() {
            hook(loading);
        }
    }

    /// Logs a failure and keeps the typed error; the reducer only sees its text.
    fn settle<T>(
        &mut self,
        context: &str,
        result: Result<T, StockdeskError>,
    ) -> Result<T, String> {
        result.map_err(|e| {
            log::error!("{context}: {e}");
            let message = e.to_string();
            self.last_error = Some(e);
            message
        })
    }

    fn execute(&mut self, command: RemoteCommand) -> RemoteEvent {
        log::debug!("remote call started: {:?}", command.kind());
        self.last_error = None;
        self.saved = None;
        let event = match command {
            RemoteCommand::FetchAll => {
                let result = self.store.list();
                if let Ok(records) = &result {
                    log::info!("fetched {} records", records.len());
                }
                RemoteEvent::Fetched(self.settle("Error fetching data", result))
            }
            RemoteCommand::Create(payload) => {
                let result = self.store.create(&payload);
                if let Ok(record) = &result {
                    log::info!("created record {}", record.id);
                    self.saved = Some(record.clone());
                }
                RemoteEvent::Created(self.settle("Error inserting data", result))
            }
            RemoteCommand::Update(id, payload) => {
                let result = self.store.update(id, &payload);
                if let Ok(record) = &result {
                    log::info!("updated record {id}");
                    self.saved = Some(Record { id, ..record.clone() });
                }
                RemoteEvent::Updated(id, self.settle("Error updating data", result))
            }
            RemoteCommand::Delete(id) => {
                let result = self.store.delete(id);
                if result.is_ok() {
                    log::info!("deleted record {id}");
                }
                RemoteEvent::Deleted(id, self.settle("Error deleting data", result))
            }
        };
        log::debug!("remote call finished");
        event
    }
}

#![allow(dead_code)]

use stockdesk::domain::error::StockdeskError;
use stockdesk::domain::record::{Record, RecordId, RecordPayload};
use stockdesk::ports::stock_store_port::StockStorePort;
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(RecordPayload),
    Update(RecordId, RecordPayload),
    Delete(RecordId),
}

/// In-memory store that records every call and assigns increasing ids.
pub struct MockStockStore {
    pub records: RefCell<Vec<Record>>,
    pub calls: RefCell<Vec<Call>>,
    next_id: Cell<u64>,
    fail_list: bool,
    fail_create_at: Option<usize>,
    fail_update: bool,
    fail_delete: bool,
}

impl MockStockStore {
    pub fn new() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            fail_list: false,
            fail_create_at: None,
            fail_update: false,
            fail_delete: false,
        }
    }

    pub fn with_records(self, records: Vec<Record>) -> Self {
        let next = records.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        self.next_id.set(next);
        *self.records.borrow_mut() = records;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// The `n`th create call (0-based) fails.
    pub fn failing_create_at(mut self, n: usize) -> Self {
        self.fail_create_at = Some(n);
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !matches!(c, Call::List))
            .count()
    }

    fn create_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Create(_)))
            .count()
    }
}

fn network_error(path: &str) -> StockdeskError {
    StockdeskError::Http {
        url: format!("http://127.0.0.1:8000{path}"),
        reason: "connection refused".into(),
    }
}

impl StockStorePort for MockStockStore {
    fn list(&self) -> Result<Vec<Record>, StockdeskError> {
        self.calls.borrow_mut().push(Call::List);
        if self.fail_list {
            return Err(network_error("/stocks/api/stocks/"));
        }
        Ok(self.records.borrow().clone())
    }

    fn create(&self, payload: &RecordPayload) -> Result<Record, StockdeskError> {
        let index = self.create_count();
        self.calls.borrow_mut().push(Call::Create(payload.clone()));
        if self.fail_create_at == Some(index) {
            return Err(StockdeskError::Status {
                method: "POST".into(),
                url: "http://127.0.0.1:8000/stocks/api/stocks/create/".into(),
                status: 400,
                body: "{\"volume\": [\"A valid integer is required.\"]}".into(),
            });
        }
        let id = RecordId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let record = payload.clone().into_record(id);
        self.records.borrow_mut().push(record.clone());
        Ok(record)
    }

    fn update(&self, id: RecordId, payload: &RecordPayload) -> Result<Record, StockdeskError> {
        self.calls
            .borrow_mut()
            .push(Call::Update(id, payload.clone()));
        if self.fail_update {
            return Err(network_error(&format!("/stocks/api/stocks/{id}/update/")));
        }
        let record = payload.clone().into_record(id);
        let mut records = self.records.borrow_mut();
        match records.iter_mut().find(|r| r.id == id) {
            Some(slot) => *slot = record.clone(),
            None => {
                return Err(StockdeskError::Status {
                    method: "PUT".into(),
                    url: format!("http://127.0.0.1:8000/stocks/api/stocks/{id}/update/"),
                    status: 404,
                    body: String::new(),
                })
            }
        }
        Ok(record)
    }

    fn delete(&self, id: RecordId) -> Result<(), StockdeskError> {
        self.calls.borrow_mut().push(Call::Delete(id));
        if self.fail_delete {
            return Err(network_error(&format!("/stocks/api/stocks/{id}/delete/")));
        }
        self.records.borrow_mut().retain(|r| r.id != id);
        Ok(())
    }
}

pub fn make_record(id: u64, trade_code: &str, date: &str, close: &str) -> Record {
    Record {
        id: RecordId(id),
        date: date.to_string(),
        trade_code: trade_code.to_string(),
        high: "11.0".to_string(),
        low: "9.0".to_string(),
        open: "10.0".to_string(),
        close: close.to_string(),
        volume: "1000".to_string(),
    }
}

/// `n` records with ids `1..=n`, alternating between two trade codes.
pub fn sample_records(n: u64) -> Vec<Record> {
    (1..=n)
        .map(|i| {
            let code = if i % 2 == 0 { "ABC" } else { "XYZ" };
            make_record(i, code, &format!("2020-01-{:02}", (i % 28) + 1), "10.5")
        })
        .collect()
}

pub fn full_payload() -> RecordPayload {
    RecordPayload {
        date: "2020-08-10".into(),
        trade_code: "1JANATAMF".into(),
        high: "4.3".into(),
        low: "4.1".into(),
        open: "4.1".into(),
        close: "4.2".into(),
        volume: "2285416".into(),
    }
}

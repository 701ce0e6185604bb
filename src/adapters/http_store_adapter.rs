//! HTTP record store adapter.
//!
//! Talks JSON to the stocks API with a blocking reqwest client:
//!
//! - `GET    {base}/stocks/api/stocks/`
//! - `POST   {base}/stocks/api/stocks/create/`
//! - `PUT    {base}/stocks/api/stocks/{id}/update/`
//! - `DELETE {base}/stocks/api/stocks/{id}/delete/`

use crate::domain::client_config::ClientConfig;
use crate::domain::error::StockdeskError;
use crate::domain::record::{Record, RecordId, RecordPayload};
use crate::ports::stock_store_port::StockStorePort;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

pub struct HttpStockStore {
    base_url: String,
    http: Client,
}

impl HttpStockStore {
    pub fn new(config: &ClientConfig) -> Result<Self, StockdeskError> {
        let http = Client::builder()
            .user_agent(concat!("stockdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| StockdeskError::Http {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list_url(&self) -> String {
        format!("{}/stocks/api/stocks/", self.base_url)
    }

    fn create_url(&self) -> String {
        format!("{}/stocks/api/stocks/create/", self.base_url)
    }

    fn update_url(&self, id: RecordId) -> String {
        format!("{}/stocks/api/stocks/{}/update/", self.base_url, id)
    }

    fn delete_url(&self, id: RecordId) -> String {
        format!("{}/stocks/api/stocks/{}/delete/", self.base_url, id)
    }

    /// Send `request` and return the body text of a 2xx response.
    fn send(&self, method: &str, url: &str, request: RequestBuilder) -> Result<String, StockdeskError> {
        log::debug!("{method} {url}");
        let response = request.send().map_err(|e| StockdeskError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let status = response.status();
        let body = response.text().map_err(|e| StockdeskError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !status.is_success() {
            return Err(StockdeskError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        log::debug!("{method} {url} -> {}", status.as_u16());
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, StockdeskError> {
    serde_json::from_str(body).map_err(|e| StockdeskError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

impl StockStorePort for HttpStockStore {
    fn list(&self) -> Result<Vec<Record>, StockdeskError> {
        let url = self.list_url();
        let body = self.send("GET", &url, self.http.get(&url))?;
        decode(&url, &body)
    }

    fn create(&self, payload: &RecordPayload) -> Result<Record, StockdeskError> {
        let url = self.create_url();
        let body = self.send("POST", &url, self.http.post(&url).json(payload))?;
        decode(&url, &body)
    }

    fn update(&self, id: RecordId, payload: &RecordPayload) -> Result<Record, StockdeskError> {
        let url = self.update_url(id);
        let body = self.send("PUT", &url, self.http.put(&url).json(payload))?;
        if body.trim().is_empty() {
            return Ok(payload.clone().into_record(id));
        }
        let mut value: serde_json::Value = decode(&url, &body)?;
        match value.as_object_mut() {
            Some(obj) => {
                obj.insert("id".to_string(), serde_json::Value::from(id.0));
            }
            None => {
                return Err(StockdeskError::Decode {
                    url,
                    reason: "expected a JSON object".into(),
                })
            }
        }
        serde_json::from_value(value).map_err(|e| StockdeskError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })
    }

    fn delete(&self, id: RecordId) -> Result<(), StockdeskError> {
        let url = self.delete_url(id);
        self.send("DELETE", &url, self.http.delete(&url))?;
        Ok(())
    }
}

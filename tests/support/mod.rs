#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use artworks_table::{App, CatalogSource, Config, FetchError, Fetcher, Record, RecordBatch};
use serde_json::json;

pub const WAIT: Duration = Duration::from_secs(5);

/// Build a record the way the catalog would return it.
pub fn artwork(id: u32, title: &str) -> Record {
    serde_json::from_value(json!({
        "id": id,
        "api_model": "artworks",
        "api_link": format!("https://api.artic.edu/api/v1/artworks/{id}"),
        "title": title,
        "image_id": format!("img-{id}"),
        "artist_display": "Unknown artist",
        "category_titles": ["Essentials"]
    }))
    .unwrap()
}

pub fn page_of(page: u32, count: u32) -> Vec<Record> {
    (0..count)
        .map(|i| artwork(page * 1000 + i, &format!("Page {page} work {i}")))
        .collect()
}

/// Canned catalog that answers immediately, can be told to fail a page, and
/// can hold a page back until the test releases it.
#[derive(Default)]
pub struct StubCatalog {
    pages: Mutex<HashMap<u32, Vec<Record>>>,
    failures: Mutex<HashMap<u32, u16>>,
    gates: Mutex<HashMap<u32, Receiver<()>>>,
    requested: Mutex<Vec<u32>>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: u32, records: Vec<Record>) -> Self {
        self.pages.lock().unwrap().insert(page, records);
        self
    }

    pub fn fail_page(&self, page: u32, status: u16) {
        self.failures.lock().unwrap().insert(page, status);
    }

    pub fn heal_page(&self, page: u32) {
        self.failures.lock().unwrap().remove(&page);
    }

    /// Hold the response for `page` until the returned sender fires.
    pub fn gate(&self, page: u32) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.gates.lock().unwrap().insert(page, rx);
        tx
    }

    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

impl CatalogSource for StubCatalog {
    fn fetch_page(&self, page: u32) -> Result<RecordBatch, FetchError> {
        self.requested.lock().unwrap().push(page);

        let gate = self.gates.lock().unwrap().remove(&page);
        if let Some(gate) = gate {
            let _ = gate.recv();
        }

        if let Some(&status) = self.failures.lock().unwrap().get(&page) {
            return Err(FetchError::Status { page, status });
        }

        let records = self
            .pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .unwrap_or_default();
        Ok(RecordBatch {
            page,
            records,
            pagination: None,
        })
    }
}

/// Mount an app over the stub and wait for the page-1 fetch.
pub fn mounted(stub: Arc<StubCatalog>) -> App {
    let mut app = App::new(Fetcher::new(stub), &Config::default());
    assert!(app.settle(WAIT), "page 1 never arrived");
    app
}

pub fn ids(records: &[&Record]) -> Vec<String> {
    records.iter().map(|record| record.text("id")).collect()
}

//! Movement-timeline reconciliation.
//!
//! The restricted case of the process pagination: a single response shape
//! (`{qtdRegistrosTotal, listaResultado}` of date/description items), fixed
//! page size, no presearch fan-out.

use consilium_client::PageFetcher;
use consilium_core::{ClientConfig, Movement};
use serde_json::Value;
use tracing::debug;

use crate::dedup::dedup_records;
use crate::error::SearchError;
use crate::shape::{PageAccumulator, non_empty_array};

/// Pagination engine for a resolved process's movement timeline.
pub struct MovementSearch<'a, F: PageFetcher> {
    fetcher: &'a F,
    config: &'a ClientConfig,
}

impl<'a, F: PageFetcher> MovementSearch<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a ClientConfig) -> Self {
        Self { fetcher, config }
    }

    /// Fetch the full movement timeline for one process, in listed order.
    pub fn resolve(
        &self,
        process_number: &str,
        doc_code: &str,
        instance_code: &str,
    ) -> Result<Vec<Movement>, SearchError> {
        let raw = self.fetch_pages(
            process_number,
            doc_code,
            instance_code,
            self.config.default_page_number,
            PageAccumulator::default(),
        )?;
        debug!(
            count = raw.len(),
            process_number, "movement timeline resolved"
        );
        Ok(raw.iter().map(Movement::from_value).collect())
    }

    fn fetch_pages(
        &self,
        process_number: &str,
        doc_code: &str,
        instance_code: &str,
        page_number: u32,
        mut state: PageAccumulator,
    ) -> Result<Vec<Value>, SearchError> {
        let path = format!(
            "{}{}/{}/{}/{}/{}",
            self.config.movements_route,
            process_number,
            doc_code,
            instance_code,
            page_number,
            self.config.default_page_size,
        );
        let response = self.fetcher.fetch_page(&path)?;

        if matches!(&response, Value::Array(items) if items.is_empty()) {
            return Ok(state.records);
        }
        let Some(page_items) = non_empty_array(&response, "listaResultado") else {
            return Ok(state.records);
        };

        state.note_total(&response);
        state.records.extend(page_items.iter().cloned());
        // Same rule as the process engine: the accumulator is pruned at the
        // end of every page step.
        state.records = dedup_records(state.records);

        if state.is_short() {
            let next = page_number + 1;
            if next > self.config.max_pages {
                return Err(SearchError::PaginationOverflow {
                    max_pages: self.config.max_pages,
                });
            }
            return self.fetch_pages(process_number, doc_code, instance_code, next, state);
        }
        Ok(state.records)
    }
}

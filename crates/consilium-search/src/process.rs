//! Process reconciliation: shape dispatch, presearch fan-out, pagination.

use consilium_client::PageFetcher;
use consilium_core::{ClientConfig, Process, QueryKind};
use serde_json::Value;
use tracing::{debug, info};

use crate::dedup::dedup_records;
use crate::error::SearchError;
use crate::shape::{PageAccumulator, has_text, non_empty_array, text};

/// Paginated reconciliation engine for process searches.
///
/// Each page fetch lands on one of four response shapes:
///
/// - a direct list, which is either a presearch result (fan out one
///   sub-search per subsystem) or already-resolved records;
/// - a `listaProcessos` wrapper, returned complete, no pagination;
/// - a `listaResultado` search page, accumulated and deduplicated while
///   the running count is short of the server-declared total;
/// - an empty response, a normal "no match" outcome.
pub struct ProcessSearch<'a, F: PageFetcher> {
    fetcher: &'a F,
    config: &'a ClientConfig,
}

impl<'a, F: PageFetcher> ProcessSearch<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a ClientConfig) -> Self {
        Self { fetcher, config }
    }

    /// Resolve a raw query into process records, movements not yet attached.
    ///
    /// An empty result is `Ok`; the caller decides whether "nothing found"
    /// is an error for its purposes.
    pub fn resolve(&self, query: &str) -> Result<Vec<Process>, SearchError> {
        let raw = self.fetch_pages(query, None, None, None, PageAccumulator::default())?;
        info!(count = raw.len(), query, "query resolved");
        Ok(raw.iter().map(Process::from_value).collect())
    }

    /// One page fetch plus shape dispatch; recurses for the next page while
    /// the accumulated count is short of the declared total. The
    /// accumulator moves through each call by value.
    fn fetch_pages(
        &self,
        query: &str,
        system_name: Option<&str>,
        page_number: Option<u32>,
        page_size: Option<u32>,
        mut state: PageAccumulator,
    ) -> Result<Vec<Value>, SearchError> {
        let kind = QueryKind::classify(query)?;
        let path = kind.request_url(query, system_name, page_number, page_size);
        let response = self.fetcher.fetch_page(&path)?;

        if let Value::Array(items) = &response {
            if items.is_empty() {
                return Ok(state.records);
            }
            return self.resolve_direct_list(items);
        }

        if let Some(wrapped) = non_empty_array(&response, "listaProcessos") {
            state.records.extend(wrapped.iter().cloned());
            return Ok(state.records);
        }

        let Some(search_results) = non_empty_array(&response, "listaResultado") else {
            return Ok(state.records);
        };

        state.note_total(&response);
        for item in search_results {
            if let Some(nested) = non_empty_array(item, "listaProcessos") {
                state.records.extend(nested.iter().cloned());
            }
        }
        // Prune structural duplicates at the end of every page step, so the
        // accumulator is duplicate-free before the next page is appended
        // and at return. A page that only repeats earlier records adds
        // nothing to the count.
        state.records = dedup_records(state.records);
        debug!(
            accumulated = state.records.len(),
            total = state.total,
            "search page merged"
        );

        if state.is_short() {
            let page = page_number.unwrap_or(self.config.default_page_number);
            let next = page + 1;
            if next > self.config.max_pages {
                return Err(SearchError::PaginationOverflow {
                    max_pages: self.config.max_pages,
                });
            }
            return self.fetch_pages(query, system_name, Some(next), page_size, state);
        }
        Ok(state.records)
    }

    /// A direct list is either resolved records or a presearch result.
    fn resolve_direct_list(&self, items: &[Value]) -> Result<Vec<Value>, SearchError> {
        let first = &items[0];
        if has_text(first, "nome") && has_text(first, "sistema") {
            return self.presearch_fan_out(items);
        }
        if !has_text(first, "numero") {
            return Err(SearchError::MalformedResponse(
                "direct list carries neither a presearch marker nor a process number".to_string(),
            ));
        }
        Ok(items.to_vec())
    }

    /// Party-name search is a two-phase protocol upstream: the first
    /// response only names the subsystems holding matches. Issue one fresh
    /// sub-search per `{nome, sistema}` hit, sequentially, in listed order.
    /// Hits missing either field are placeholder entries and are skipped.
    fn presearch_fan_out(&self, hits: &[Value]) -> Result<Vec<Value>, SearchError> {
        let mut records = Vec::new();
        for hit in hits {
            let (Some(name), Some(system)) = (text(hit, "nome"), text(hit, "sistema")) else {
                continue;
            };
            info!(name, system, "presearch hit, searching subsystem");
            let sub_records = self.fetch_pages(
                name,
                Some(system),
                Some(self.config.default_page_number),
                Some(self.config.default_page_size),
                PageAccumulator::default(),
            )?;
            records.extend(sub_records);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::tests_support::FakeFetcher;
    use serde_json::json;

    fn test_config() -> ClientConfig {
        ClientConfig::default()
    }

    fn record(number: &str) -> Value {
        json!({"numero": number, "numeroFormatado": number, "classe": "Cível"})
    }

    #[test]
    fn wrapped_single_result_is_terminal() {
        let fetcher = FakeFetcher::new(vec![json!({"listaProcessos": [record("1")]})]);
        let config = test_config();
        let engine = ProcessSearch::new(&fetcher, &config);

        let processes = engine.resolve("0801234-56.2026.8.14.0301").unwrap();

        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0].number, "1");
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(
            fetcher.paths()[0],
            "/processobycnj/0801234-56.2026.8.14.0301"
        );
    }

    #[test]
    fn direct_list_of_records_is_terminal() {
        // Presearch fields present but null: these are resolved records.
        let fetcher = FakeFetcher::new(vec![json!([
            {"nome": null, "sistema": null, "numero": "123", "classe": "Cível"}
        ])]);
        let config = test_config();
        let engine = ProcessSearch::new(&fetcher, &config);

        let processes = engine.resolve("12345678901").unwrap();

        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0].number, "123");
        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn direct_list_without_identity_is_malformed() {
        let fetcher = FakeFetcher::new(vec![json!([
            {"nome": null, "sistema": null, "classe": "Cível"}
        ])]);
        let config = test_config();
        let engine = ProcessSearch::new(&fetcher, &config);

        let err = engine.resolve("12345678901").unwrap_err();
        assert!(matches!(err, SearchError::MalformedResponse(_)));
    }

    #[test]
    fn empty_shapes_resolve_to_no_results() {
        for response in [
            json!([]),
            json!({}),
            json!({"listaProcessos": []}),
            json!({"listaResultado": [], "qtdRegistrosTotal": 0}),
        ] {
            let fetcher = FakeFetcher::new(vec![response]);
            let config = test_config();
            let engine = ProcessSearch::new(&fetcher, &config);
            assert!(engine.resolve("12345678901").unwrap().is_empty());
        }
    }

    #[test]
    fn paginates_until_declared_total_reached() {
        let fetcher = FakeFetcher::new(vec![
            json!({
                "qtdRegistrosTotal": 2,
                "listaResultado": [{"listaProcessos": [record("1")]}]
            }),
            json!({
                "qtdRegistrosTotal": 2,
                "listaResultado": [{"listaProcessos": [record("2")]}]
            }),
        ]);
        let config = test_config();
        let engine = ProcessSearch::new(&fetcher, &config);

        let processes = engine.resolve("Jose Antonio").unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert_eq!(processes.len(), 2);
        assert_eq!(processes[0].number, "1");
        assert_eq!(processes[1].number, "2");
        // Second fetch moves to page 2 with the same query.
        assert_eq!(fetcher.paths()[1], "/processobynomeparte/Jose%20Antonio/2");
    }

    #[test]
    fn repeated_page_adds_nothing_to_the_count() {
        // Page 2 fully repeats page 1; a later empty page ends the walk.
        let page = json!({
            "qtdRegistrosTotal": 2,
            "listaResultado": [{"listaProcessos": [record("1")]}]
        });
        let fetcher = FakeFetcher::new(vec![
            page.clone(),
            page,
            json!({"qtdRegistrosTotal": 2, "listaResultado": []}),
        ]);
        let config = test_config();
        let engine = ProcessSearch::new(&fetcher, &config);

        let processes = engine.resolve("Jose Antonio").unwrap();

        assert_eq!(fetcher.calls(), 3);
        assert_eq!(processes.len(), 1);
    }

    #[test]
    fn pagination_overflow_is_fatal() {
        // The server repeats one record forever while declaring an
        // unreachable total.
        let page = json!({
            "qtdRegistrosTotal": 999,
            "listaResultado": [{"listaProcessos": [record("1")]}]
        });
        let fetcher = FakeFetcher::new(vec![page.clone(); 10]);
        let config = ClientConfig {
            max_pages: 4,
            ..ClientConfig::default()
        };
        let engine = ProcessSearch::new(&fetcher, &config);

        let err = engine.resolve("Jose Antonio").unwrap_err();
        assert!(matches!(
            err,
            SearchError::PaginationOverflow { max_pages: 4 }
        ));
        assert_eq!(fetcher.calls(), 4);
    }

    #[test]
    fn presearch_fans_out_per_valid_hit() {
        let fetcher = FakeFetcher::new(vec![
            json!([
                {"nome": "Jose Antonio", "sistema": "pje", "quantidade": 2},
                {"nome": "Jose Antonio", "sistema": "libra", "quantidade": 1},
                {"nome": "", "sistema": "legado", "quantidade": 0},
                {"nome": "Jose Antonio", "sistema": null, "quantidade": 0},
            ]),
            json!({"listaProcessos": [record("1"), record("2")]}),
            json!({"listaProcessos": [record("3")]}),
        ]);
        let config = test_config();
        let engine = ProcessSearch::new(&fetcher, &config);

        let processes = engine.resolve("Jose Antonio").unwrap();

        // One presearch fetch plus exactly one per valid hit.
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(processes.len(), 3);
        let paths = fetcher.paths();
        assert_eq!(paths[1], "/processobynomeparte/Jose%20Antonio/pje/1/1000");
        assert_eq!(paths[2], "/processobynomeparte/Jose%20Antonio/libra/1/1000");
    }

    #[test]
    fn invalid_query_never_reaches_the_network() {
        let fetcher = FakeFetcher::new(vec![]);
        let config = test_config();
        let engine = ProcessSearch::new(&fetcher, &config);

        assert!(matches!(
            engine.resolve("João"),
            Err(SearchError::Query(_))
        ));
        assert_eq!(fetcher.calls(), 0);
    }
}

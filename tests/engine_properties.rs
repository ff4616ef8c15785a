use fuzzrank::{Preset, SearchConfig, SearchEngine, SearchOptions, SearchResponse, Searchable};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::{Arc, Condvar, Mutex};
use tokio::sync::Notify;

fn name_engine() -> SearchEngine<Value> {
    SearchEngine::new(SearchConfig {
        search_fields: vec!["name".to_string()],
        fuzzy_threshold: 0.6,
        ..Default::default()
    })
}

fn companies() -> Vec<Value> {
    vec![
        json!({ "id": "1", "name": "Acme Corp" }),
        json!({ "id": "2", "name": "Acme" }),
        json!({ "id": "3", "name": "Zenith" }),
    ]
}

/// Holds a field lookup on the blocking worker until opened.
#[derive(Default)]
struct Gate {
    entered: Notify,
    opened: Mutex<bool>,
    signal: Condvar,
}

impl Gate {
    fn wait(&self) {
        self.entered.notify_one();
        let mut opened = self.opened.lock().unwrap();
        while !*opened {
            opened = self.signal.wait(opened).unwrap();
        }
    }

    fn open(&self) {
        *self.opened.lock().unwrap() = true;
        self.signal.notify_all();
    }
}

#[derive(Clone)]
struct Gated {
    name: &'static str,
    gate: Option<Arc<Gate>>,
}

impl Gated {
    fn held(name: &'static str, gate: Arc<Gate>) -> Self {
        Self {
            name,
            gate: Some(gate),
        }
    }

    fn free(name: &'static str) -> Self {
        Self { name, gate: None }
    }
}

impl Searchable for Gated {
    fn record_id(&self) -> String {
        self.name.to_string()
    }

    fn field_value(&self, path: &str) -> Option<String> {
        if let Some(gate) = &self.gate {
            gate.wait();
        }
        (path == "name").then(|| self.name.to_string())
    }

    fn scalar_field_paths(&self) -> Vec<String> {
        vec!["name".to_string()]
    }
}

fn ids(response: &SearchResponse<Value>) -> Vec<String> {
    response.results.iter().map(|r| r.item.record_id()).collect()
}

#[cfg(test)]
mod ranking {
    use super::*;

    #[test]
    fn exact_beats_partial_and_far_items_are_excluded() {
        let response = name_engine().instant_search("Acme", &companies(), &SearchOptions::default());
        assert_eq!(ids(&response), vec!["2", "1"]);
        assert_eq!(response.total_count, 2);
        assert_eq!(response.query, "Acme");
        assert_eq!(response.results[0].highlights["name"], "<mark>Acme</mark>");
        assert_eq!(response.results[1].highlights["name"], "<mark>Acme</mark> Corp");
    }

    #[test]
    fn match_priority_is_monotonic() {
        let engine = name_engine();
        let items = vec![
            json!({ "id": "fuzzy", "name": "acne" }),
            json!({ "id": "substring", "name": "big acme" }),
            json!({ "id": "prefix", "name": "acme inc" }),
            json!({ "id": "exact", "name": "acme" }),
        ];
        let response = engine.instant_search("acme", &items, &SearchOptions::default());
        assert_eq!(ids(&response), vec!["exact", "prefix", "substring", "fuzzy"]);

        let scores: Vec<f64> = response.results.iter().map(|r| r.score).collect();
        assert!(scores.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(response.results[3].highlights["name"], "<mark>acne</mark>");
    }

    #[test]
    fn ties_keep_input_order() {
        let items: Vec<Value> = (0..6)
            .map(|i| json!({ "id": i.to_string(), "name": "road repair" }))
            .collect();
        let response = name_engine().instant_search("road", &items, &SearchOptions::default());
        assert_eq!(ids(&response), vec!["0", "1", "2", "3", "4", "5"]);
    }

    #[test]
    fn fields_are_reported_in_scan_order() {
        let engine = SearchEngine::new(SearchConfig {
            search_fields: vec![
                "title".to_string(),
                "customer.name".to_string(),
                "lotPassport.itemName".to_string(),
            ],
            ..Default::default()
        });
        let items = vec![json!({
            "id": "t1",
            "title": "Asphalt supply",
            "customer": { "name": "Asphalt Trust" },
            "lotPassport": { "itemName": "asphalt" }
        })];
        let response = engine.instant_search("asphalt", &items, &SearchOptions::default());
        assert_eq!(
            response.results[0].matched_fields,
            vec!["title", "customer.name", "lotPassport.itemName"]
        );
    }

    #[test]
    fn case_sensitive_option_changes_classification() {
        let engine = name_engine();
        let items = vec![json!({ "id": "1", "name": "ACME" })];
        let insensitive = engine.instant_search("acme", &items, &SearchOptions::default());
        let sensitive = engine.instant_search(
            "acme",
            &items,
            &SearchOptions::default().with_case_sensitive(true),
        );
        assert!(insensitive.results[0].score > 0.0);
        assert!(sensitive.results.is_empty());
        assert_eq!(sensitive.total_count, 0);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let engine = SearchEngine::new(SearchConfig {
            search_fields: vec!["customer.name".to_string()],
            ..Default::default()
        });
        let items = vec![
            json!({ "id": "1", "customer": null }),
            json!({ "id": "2", "customer": "flat string" }),
            json!({ "id": "3" }),
            json!(42),
            json!({ "id": "5", "customer": { "name": "Acme" } }),
        ];
        let response = engine.instant_search("acme", &items, &SearchOptions::default());
        assert_eq!(ids(&response), vec!["5"]);
    }

    #[test]
    fn presets_build_working_engines() {
        let engine: SearchEngine<Value> = SearchEngine::with_preset(Preset::Competitor);
        let items = vec![json!({ "id": "c1", "name": "Stroy LLC", "region": "Kazan" })];
        let response = engine.instant_search("kazan", &items, &SearchOptions::default());
        assert_eq!(response.results[0].matched_fields, vec!["region"]);
        assert_eq!(engine.config().max_results, 20);
    }
}

#[cfg(test)]
mod empty_query {
    use super::*;

    #[test]
    fn returns_everything_unscored_with_full_count() {
        let items: Vec<Value> = (0..8).map(|i| json!({ "id": i.to_string() })).collect();
        let response = name_engine().instant_search(
            "   ",
            &items,
            &SearchOptions::default().with_max_results(5),
        );
        assert_eq!(ids(&response), vec!["0", "1", "2", "3", "4"]);
        assert_eq!(response.total_count, 8);
        assert!(response
            .results
            .iter()
            .all(|r| r.score == 1.0 && r.matched_fields.is_empty() && r.highlights.is_empty()));
        assert!(response.suggestions.is_empty());
    }

    #[test]
    fn empty_items_are_fine() {
        let response = name_engine().instant_search("acme", &[], &SearchOptions::default());
        assert!(response.results.is_empty());
        assert_eq!(response.total_count, 0);
    }
}

#[cfg(test)]
mod caching {
    use super::*;

    #[test]
    fn repeated_search_is_identical() {
        let engine = name_engine();
        let first = engine.instant_search("acme", &companies(), &SearchOptions::default());
        let second = engine.instant_search("acme", &companies(), &SearchOptions::default());
        assert_eq!(first.results, second.results);
        assert_eq!(first.total_count, second.total_count);
        assert_eq!(engine.metrics().cache_hits.get(), 1);
    }

    #[test]
    fn cache_is_bounded_and_evicts_oldest_inserted() {
        let engine = name_engine();
        let items = companies();
        for i in 0..101 {
            engine.instant_search(&format!("query{i}"), &items, &SearchOptions::default());
        }
        assert_eq!(engine.cache_stats().size, 100);
        assert_eq!(engine.metrics().cache_misses.get(), 101);

        engine.instant_search("query1", &items, &SearchOptions::default());
        assert_eq!(engine.metrics().cache_hits.get(), 1);

        engine.instant_search("query0", &items, &SearchOptions::default());
        assert_eq!(engine.metrics().cache_misses.get(), 102);
        assert!(engine.cache_stats().size <= 100);
    }

    #[test]
    fn hit_rate_is_measured() {
        let engine = name_engine();
        assert_eq!(engine.cache_stats().hit_rate, 0.0);
        engine.instant_search("acme", &companies(), &SearchOptions::default());
        engine.instant_search("acme", &companies(), &SearchOptions::default());
        assert_eq!(engine.cache_stats().hit_rate, 0.5);
    }
}

#[cfg(test)]
mod debounced {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn later_call_supersedes_pending_one() {
        let engine = name_engine();
        let first = engine.search("zenith", companies(), SearchOptions::default());
        let second = engine.search("acme", companies(), SearchOptions::default());

        assert!(first.wait().await.is_none());
        let response = second.wait().await.expect("latest search completes");
        assert_eq!(response.query, "acme");
        assert_eq!(ids(&response), vec!["2", "1"]);
        assert_eq!(engine.search_history(), vec!["acme"]);
        assert_eq!(engine.metrics().debounce_superseded.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn history_keeps_ten_most_recent() {
        let engine = name_engine();
        let options = SearchOptions::default().with_debounce_ms(5);
        for i in 0..11 {
            let pending = engine.search(format!("query {i}"), companies(), options.clone());
            assert!(pending.wait().await.is_some());
        }

        let history = engine.search_history();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], "query 10");
        assert!(!history.contains(&"query 0".to_string()));
    }

    // Repeats are not promoted to the front. Possibly surprising for a
    // "recent searches" list; kept as-is.
    #[tokio::test(start_paused = true)]
    async fn repeated_query_is_not_promoted() {
        let engine = name_engine();
        for query in ["acme", "zenith", "acme"] {
            engine
                .search(query, companies(), SearchOptions::default())
                .wait()
                .await;
        }
        assert_eq!(engine.search_history(), vec!["zenith", "acme"]);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_query_skips_history() {
        let engine = name_engine();
        let response = engine
            .search("  ", companies(), SearchOptions::default())
            .wait()
            .await
            .unwrap();
        assert_eq!(response.total_count, 3);
        assert!(engine.search_history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn history_feeds_suggestions() {
        let engine = name_engine();
        engine
            .search("acme corp", companies(), SearchOptions::default())
            .wait()
            .await;
        let response = engine.instant_search("acme", &companies(), &SearchOptions::default());
        assert_eq!(response.suggestions, vec!["acme corp", "Acme Corp"]);

        engine.clear_history();
        assert!(engine.search_history().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn search_past_its_window_is_not_cancelled() {
        let engine: SearchEngine<Gated> = SearchEngine::new(SearchConfig {
            search_fields: vec!["name".to_string()],
            ..Default::default()
        });
        let gate = Arc::new(Gate::default());
        let options = SearchOptions::default().with_debounce_ms(1);

        let first = engine.search(
            "acme",
            vec![Gated::held("Acme", gate.clone())],
            options.clone(),
        );
        gate.entered.notified().await;
        let second = engine.search("zenith", vec![Gated::free("Zenith")], options);
        gate.open();

        let first = first.wait().await.expect("running search is delivered");
        let second = second.wait().await.expect("later search is delivered");
        assert_eq!(first.query, "acme");
        assert_eq!(first.total_count, 1);
        assert_eq!(second.query, "zenith");
        assert_eq!(second.total_count, 1);

        let mut history = engine.search_history();
        history.sort();
        assert_eq!(history, vec!["acme", "zenith"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_pending_drops_result() {
        let engine = name_engine();
        let pending = engine.search("acme", companies(), SearchOptions::default());
        assert!(engine.cancel_pending());
        assert!(pending.wait().await.is_none());
        assert!(engine.search_history().is_empty());
    }
}

proptest! {
    #[test]
    fn counts_are_consistent(
        names in proptest::collection::vec("[a-c ]{0,8}", 0..40),
        query in "[a-c ]{0,6}",
        max_results in 1usize..10,
    ) {
        let engine = name_engine();
        let items: Vec<Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({ "id": i.to_string(), "name": name }))
            .collect();
        let options = SearchOptions::default().with_max_results(max_results);
        let response = engine.instant_search(&query, &items, &options);

        prop_assert!(response.total_count >= response.results.len());
        prop_assert!(response.results.len() <= max_results);
        prop_assert!(response.suggestions.len() <= 5);
        prop_assert!(response.results.windows(2).all(|w| w[0].score >= w[1].score));

        let again = engine.instant_search(&query, &items, &options);
        prop_assert_eq!(response.results, again.results);
    }
}

mod common;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use restful::header::{ACCEPT, CONTENT_TYPE};
    use restful::{ContentType, HttpResponse, RestBuilder};

    use super::common::{base_url, url};

    fn client() -> restful::HttpClient {
        RestBuilder::new()
            .base_url(&base_url())
            .build()
            .unwrap()
    }

    #[test]
    fn test_every_verb_against_a_live_server() {
        let client = client();

        assert_eq!(client.get("/user").map(|r| r.status().as_u16()).ok(), Some(200));
        assert_eq!(client.post("/user", r#"{"name":"Matilda"}"#).map(|r| r.status().as_u16()).ok(), Some(201));
        assert_eq!(client.put("/user/1", "{}").map(|r| r.text()).ok().as_deref(), Some(r#"{"id":1,"updated":true}"#));
        assert_eq!(client.patch("/user/1", "{}").map(|r| r.text()).ok().as_deref(), Some(r#"{"id":1,"patched":true}"#));
        assert_eq!(client.delete("/user/1").map(|r| r.status().as_u16()).ok(), Some(204));

        let head = client.head("/user").unwrap();
        assert!(head.is_success());
        assert!(head.bytes().is_empty());

        let options = client.options("/user").unwrap();
        assert_eq!(options.header_str("allow"), Some("GET, POST, HEAD, OPTIONS"));
    }

    #[test]
    fn test_fork_join_of_seven_operations() {
        let client = client();

        let results = client.fork_join(|batch| {
            batch.get("/user");
            batch.get("/user/1");
            batch.head("/user");
            batch.put("/user/1", "{}");
            batch.patch("/user/1", "{}");
            batch.delete("/user/1");
            batch.options("/user");
        });

        assert_eq!(results.len(), 7);
        assert_eq!(results.failures(), 0);
        for future in &results {
            assert!(future.wait().as_ref().is_ok_and(HttpResponse::is_success));
        }
        assert_eq!(results[1].response().map(HttpResponse::text).as_deref(), Some(r#"{"id":1}"#));

        let created = client.post("/user", "{}").unwrap();
        assert_eq!(created.status().as_u16(), 201);
    }

    #[test]
    fn test_repeated_batches_of_slow_requests() {
        let client = RestBuilder::new()
            .base_url(&base_url())
            .disable_cache()
            .build()
            .unwrap();

        for round in 0..50 {
            let results = client.fork_join(|batch| {
                for _ in 0..100 {
                    batch.get("/slow");
                }
            });
            assert_eq!(results.failures(), 0, "round {round}");
            assert!(results.iter().all(|f| f.response().is_some_and(|r| r.text() == "slow")));
        }
    }

    #[test]
    fn test_tiny_cache_ceiling_never_overflows() {
        let client = RestBuilder::new()
            .base_url(&base_url())
            .max_cache_size(500)
            .build()
            .unwrap();

        for i in 0..1000 {
            let response = client.get(&format!("/items/{i}")).unwrap();
            assert_eq!(response.text(), format!("item {i}"));
        }

        let cache = client.cache().expect("cache enabled");
        assert!(cache.total_size() <= 500);
        // every response here is larger than the ceiling on its own
        assert_eq!(cache.stats().snapshot().skipped, 1000);
    }

    #[test]
    fn test_small_cache_ceiling_stores_and_evicts() {
        let sizing = RestBuilder::new().base_url(&base_url()).build().unwrap();
        sizing.get("/items/0000").unwrap();
        let entry_size = sizing.cache().expect("cache enabled").total_size();
        assert!(entry_size > 0);

        let ceiling = entry_size * 4 + entry_size / 2;
        let client = RestBuilder::new()
            .base_url(&base_url())
            .max_cache_size(ceiling)
            .build()
            .unwrap();
        let cache = client.cache().expect("cache enabled");

        for i in 0..1000 {
            client.get(&format!("/items/{i:04}")).unwrap();
            assert!(cache.total_size() <= ceiling, "over the ceiling after get {i}");
        }

        assert!((1..=4).contains(&cache.len()));
        assert!(cache.stats().snapshot().evictions >= 990);
        assert!(client.get("/items/0999").unwrap().from_cache());
        assert!(!client.get("/items/0000").unwrap().from_cache());
    }

    #[test]
    fn test_repeated_batches_through_the_cache() {
        let client = RestBuilder::new().base_url(&base_url()).build().unwrap();

        for round in 0..50 {
            let results = client.fork_join(|batch| {
                for _ in 0..100 {
                    batch.get("/slow/cached");
                }
            });
            assert_eq!(results.failures(), 0, "round {round}");
            assert!(results.iter().all(|f| f.response().is_some_and(|r| r.text() == "slow")));
        }

        let stats = client.stats().snapshot();
        assert!(stats.requests_sent <= 100);
        assert!(stats.cache_hits >= 4900);
        assert_eq!(client.cache().map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_connection_refused_is_a_transport_error() {
        let client = RestBuilder::new().build().unwrap();

        let err = client.get("http://localhost:1/").err();
        assert!(err.is_some_and(|e| e.is_transport() && !e.is_builder()));
    }

    #[test]
    fn test_relative_target_without_base_url_is_a_builder_error() {
        let client = RestBuilder::new().build().unwrap();

        let err = client.get("foo").err();
        assert!(err.is_some_and(|e| e.is_builder()));
    }

    #[test]
    fn test_slow_response_times_out() {
        let client = RestBuilder::new()
            .base_url(&base_url())
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();

        let err = client.get("/sleep/1000").err();
        assert!(err.is_some_and(|e| e.is_timeout()));
    }

    #[test]
    fn test_default_headers_reach_the_server() {
        let client = RestBuilder::new()
            .base_url(&base_url())
            .content_type(ContentType::ApplicationJson)
            .accept(ContentType::ApplicationJson)
            .build()
            .unwrap();

        let response = client.get("/user").unwrap();
        let sent = response.request_headers();
        assert_eq!(sent.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()), Some("application/json"));
        assert_eq!(sent.get(ACCEPT).and_then(|v| v.to_str().ok()), Some("application/json"));
    }

    #[test]
    fn test_debug_builder_logs_and_builds() {
        let _ = env_logger::builder().is_test(true).try_init();

        let client = RestBuilder::new()
            .debug(true)
            .base_url(&base_url())
            .header("X-Trace", "on")
            .build()
            .unwrap();

        assert!(client.get(&url("/user")).is_ok_and(|r| r.is_success()));
    }
}

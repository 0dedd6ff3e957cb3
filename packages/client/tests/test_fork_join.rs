mod common;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    use http::{Method, StatusCode};
    use restful_client::{ClientConfig, HttpResponse, Operation, error};

    use super::common::{ScriptedExecutor, client_with, respond};

    /// Mirrors a small REST service: POST creates, `/slow/<ms>` sleeps, `/down` refuses
    fn service() -> Arc<ScriptedExecutor> {
        ScriptedExecutor::new(|req| {
            let path = req.url().path().to_string();
            if let Some(ms) = path.strip_prefix("/slow/") {
                std::thread::sleep(Duration::from_millis(ms.parse().unwrap_or(0)));
            }
            if path == "/down" {
                return Err(error::connect("connection refused"));
            }
            if *req.method() == Method::POST {
                return respond(req, 201, &[], &path);
            }
            respond(req, 200, &[], &path)
        })
    }

    #[test]
    fn test_mixed_verbs_in_one_batch() {
        let client = client_with(service(), ClientConfig::default());

        let results = client.fork_join(|batch| {
            batch.get("/user");
            batch.get("/user/1");
            batch.head("/user");
            batch.put("/user/1", "{}");
            batch.delete("/user/1");
            batch.patch("/user/1", "{}");
            batch.options("/user");
        });
        let created = client.post("/user", "{}").unwrap();

        assert_eq!(results.len(), 7);
        for future in &results {
            let status = future.wait().as_ref().map(HttpResponse::status).ok();
            assert_eq!(status, Some(StatusCode::OK));
        }
        assert_eq!(created.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_results_keep_registration_order() {
        let client = client_with(service(), ClientConfig::default().with_disable_cache(true));

        let results = client.fork_join(|batch| {
            batch.get("/slow/80");
            batch.get("/slow/1");
            batch.get("/slow/40");
            batch.get("/slow/10");
        });

        let paths: Vec<String> = results.iter().filter_map(|f| f.response().map(HttpResponse::text)).collect();
        assert_eq!(paths, ["/slow/80", "/slow/1", "/slow/40", "/slow/10"]);
    }

    #[test]
    fn test_batch_runs_operations_concurrently() {
        let client = client_with(service(), ClientConfig::default().with_disable_cache(true));
        let started = Instant::now();

        let results = client.fork_join(|batch| {
            for _ in 0..20 {
                batch.get("/slow/100");
            }
        });

        assert_eq!(results.failures(), 0);
        assert!(started.elapsed() < Duration::from_millis(1500));
    }

    #[test]
    fn test_one_failure_does_not_affect_siblings() {
        let client = client_with(service(), ClientConfig::default());

        let results = client.fork_join(|batch| {
            batch.get("/a");
            batch.get("/down");
            batch.post("/b", "x");
        });

        assert!(results[0].wait().is_ok());
        assert!(results[1].wait().as_ref().is_err_and(|e| e.is_connect() && e.is_transport()));
        assert_eq!(results[2].response().map(HttpResponse::status), Some(StatusCode::CREATED));
        assert_eq!(client.stats().snapshot().requests_failed, 1);
    }

    #[test]
    fn test_futures_outlive_the_batch() {
        let client = client_with(service(), ClientConfig::default());
        let mut kept = None;

        client.fork_join(|batch| {
            kept = Some(batch.get("/kept"));
        });

        let kept = kept.expect("future registered");
        assert!(kept.is_ready());
        assert_eq!(kept.response().map(HttpResponse::text).as_deref(), Some("/kept"));
    }

    #[test]
    fn test_async_get_returns_immediately() {
        let client = client_with(service(), ClientConfig::default());

        let future = client.async_get("/slow/50");
        assert!(!future.is_ready());
        assert_eq!(future.into_result().map(|r| r.text()).ok().as_deref(), Some("/slow/50"));
    }

    #[test]
    fn test_async_callback_is_invoked_once() {
        let client = client_with(service(), ClientConfig::default());
        let (tx, rx) = mpsc::channel();

        let future = client.async_post_with("/items", "x", move |result| {
            let _ = tx.send(result.as_ref().map(HttpResponse::status).ok());
        });

        let status = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(status, Some(StatusCode::CREATED));
        assert!(future.wait().is_ok());
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_async_dispatch_uses_the_cache() {
        let executor = ScriptedExecutor::new(|req| respond(req, 200, &[("cache-control", "max-age=60")], "cached"));
        let client = client_with(Arc::clone(&executor), ClientConfig::default());

        client.get("/warm").unwrap();
        let future = client.async_execute(Operation::get("/warm"));

        assert!(future.wait().as_ref().is_ok_and(HttpResponse::from_cache));
        assert_eq!(executor.call_count(), 1);
    }
}

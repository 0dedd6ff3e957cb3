//! Scripted in-memory executor shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use parking_lot::Mutex;
use restful_client::error::Result;
use restful_client::{ClientConfig, HttpClient, HttpRequest, HttpResponse, RequestExecutor};

type Handler = dyn Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync;

/// A request as the executor saw it
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
}

/// Executor answering every request from a closure and recording each call
pub struct ScriptedExecutor {
    handler: Box<Handler>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedExecutor {
    pub fn new<H>(handler: H) -> Arc<Self>
    where
        H: Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl RequestExecutor for ScriptedExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.calls.lock().push(Call {
            method: request.method().clone(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
        });
        (self.handler)(request)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Build a response to `request`
pub fn respond(request: &HttpRequest, status: u16, headers: &[(&str, &str)], body: &str) -> Result<HttpResponse> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(restful_client::error::invalid_header)?;
        let value = HeaderValue::from_str(value).map_err(restful_client::error::invalid_header)?;
        map.append(name, value);
    }

    let status = StatusCode::from_u16(status).map_err(restful_client::error::builder)?;
    Ok(HttpResponse::new(
        request.method().clone(),
        request.url().clone(),
        status,
        map,
        Bytes::copy_from_slice(body.as_bytes()),
    ))
}

/// Client with base url `http://api.test` sending through `executor`
pub fn client_with(executor: Arc<ScriptedExecutor>, config: ClientConfig) -> HttpClient {
    let config = config.with_base_url("http://api.test");
    HttpClient::with_executor(config, executor).expect("client construction failed")
}

pub fn header<'a>(call: &'a Call, name: &str) -> Option<&'a str> {
    call.headers.get(name).and_then(|v| v.to_str().ok())
}

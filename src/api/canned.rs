//! # Canned Transport
//!
//! An in-memory [`Transport`] that answers from a fixed route table instead
//! of the network. Each registered response echoes back exactly the payload,
//! status, and simulated elapsed time it was built with, so tests and dry
//! runs never depend on a live service.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde_json::{Value, json};

use super::response::ApiResponse;
use super::transport::{ClientError, Transport};

/// Route table of canned responses keyed by method and path.
///
/// Unknown routes answer with a 404 error body rather than panicking, which
/// mirrors how a real service treats an endpoint that doesn't exist.
#[derive(Default)]
pub struct CannedTransport {
    routes: HashMap<(Method, String), ApiResponse>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a canned response for the given method and path.
    /// Registering the same route twice replaces the earlier response.
    pub fn on(mut self, method: Method, path: &str, response: ApiResponse) -> Self {
        self.routes.insert((method, path.to_string()), response);
        self
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        _body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        match self.routes.get(&(method.clone(), path.to_string())) {
            Some(response) => {
                debug!("canned {} {} -> {}", method, path, response.status());
                Ok(response.clone())
            }
            None => Ok(ApiResponse::canned(
                json!({ "error": format!("no canned response for {method} {path}") }),
                404,
            )),
        }
    }
}

//! Terminal builder methods

use restful_client::error::Result;
use restful_client::HttpClient;

use crate::builder::core::RestBuilder;

impl RestBuilder {
    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns a builder error if the configuration is invalid or the
    /// transport cannot be started.
    pub fn build(self) -> Result<HttpClient> {
        if self.debug_enabled {
            log::debug!(
                "RestBuilder: building client base_url={:?} timeout={:?} cache={} max_cache_size={} custom_pool={}",
                self.config.base_url,
                self.config.effective_timeout(),
                !self.config.disable_cache,
                self.config.cache.max_cache_size,
                self.config.custom_pool.is_some(),
            );
        }

        let client = match self.executor {
            Some(executor) => HttpClient::with_executor(self.config, executor),
            None => HttpClient::new(self.config),
        };

        if let Err(err) = &client {
            log::warn!("RestBuilder: client construction failed: {err}");
        }
        client
    }
}

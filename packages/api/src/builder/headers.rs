//! Header management
//!
//! Default headers sent with every request, including the common
//! Content-Type, Accept and User-Agent headers.

use crate::builder::core::RestBuilder;

/// Content type enumeration for the common REST payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// application/json content type
    ApplicationJson,
    /// application/xml content type
    ApplicationXml,
    /// application/x-www-form-urlencoded content type
    ApplicationFormUrlEncoded,
    /// text/plain content type
    TextPlain,
}

impl ContentType {
    /// Convert content type to string representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::ApplicationJson => "application/json",
            ContentType::ApplicationXml => "application/xml",
            ContentType::ApplicationFormUrlEncoded => "application/x-www-form-urlencoded",
            ContentType::TextPlain => "text/plain",
        }
    }
}

/// Header constants for common HTTP headers
pub mod header {
    pub use http::header::*;
}

impl RestBuilder {
    /// Add a header sent with every request
    ///
    /// Invalid names or values are reported when the client is built.
    ///
    /// # Examples
    /// ```no_run
    /// use restful::RestBuilder;
    ///
    /// let client = RestBuilder::new()
    ///     .header("X-Tenant", "acme")
    ///     .build();
    /// ```
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.debug_enabled {
            log::debug!("RestBuilder: header {name}: {value}");
        }
        self.config.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Add several headers at once
    #[must_use]
    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name.as_ref(), value.as_ref()))
    }

    /// Set the Content-Type header
    #[must_use]
    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type.as_str())
    }

    /// Set the Accept header
    #[must_use]
    pub fn accept(self, content_type: ContentType) -> Self {
        self.header(header::ACCEPT.as_str(), content_type.as_str())
    }

    /// Override the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = user_agent.to_string();
        self
    }
}

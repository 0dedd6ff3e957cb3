//! HTTP request, response and operation types

pub mod operation;
pub mod request;
pub mod response;

pub use operation::Operation;
pub use request::HttpRequest;
pub use response::HttpResponse;

//! Interaction layer: talks to the marketplace backend over HTTP.

pub mod dto;
pub mod http_backend;

pub use http_backend::HttpBackend;

pub mod adapters;
pub mod admission;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod pipeline;
pub mod prompt;
pub mod request_normalizer;
pub mod response_normalizer;
pub mod types;

pub mod api;
pub mod client;
pub mod documents;
pub mod errors;

pub use api::CrptApi;
pub use api::CrptApiBuilder;
pub use client::HttpClient;
pub use client::HttpClientConfig;
pub use documents::Document;
pub use documents::Product;
pub use errors::CrptError;
pub use errors::Result;

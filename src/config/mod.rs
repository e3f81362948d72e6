//! Configuration module

mod api;

pub use api::ApiConfig;
pub use api::FieldsConfig;
pub use api::GateConfig;
pub use api::PageMediaConfig;

pub mod aggregate;
pub mod app;
pub mod assemble;
pub mod config;
pub mod domain;
pub mod error;
pub mod ga4gh;
pub mod output;
pub mod paging;
pub mod registry;
pub mod schema;
pub mod selector;

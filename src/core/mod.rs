pub mod activity;
pub mod errors;
pub mod format;
pub mod ingest;
pub mod models;
pub mod reconciler;
pub mod services;
pub mod splits;

mod client;
mod records;
mod store;

pub mod app;
pub mod config;

pub use client::{ApiError, PredictionApi, PredictionClient};
pub use records::{PredictResponse, PredictionPage, PredictionRecord, PredictionResult};
pub use store::{PredictionStore, StoreSnapshot};

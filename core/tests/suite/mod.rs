// Aggregates the integration tests as modules.
mod list_models;
mod models_fetcher;
mod responses;

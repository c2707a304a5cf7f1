mod config_sources;
mod error_mapping;
mod helpers;
mod pipeline;
mod token_provider;

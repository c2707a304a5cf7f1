mod cache;
mod catalog;
mod config;
mod context;
mod error;
mod request;

//! Movie rating recommender: a Burn embedding model trained from a
//! ratings CSV, persisted with its index maps, and served over HTTP.

pub mod api;
pub mod application;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod infra;
pub mod ml;

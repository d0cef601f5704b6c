//! # defect-predictor
//!
//! An HTTP service that hands out pre-trained defect-prediction models for
//! infrastructure-as-code projects and explains their verdicts.
//!
//! ## Flow
//!
//! ```text
//!   client metrics ──► GET /models/ ──► cosine similarity over the catalog
//!                                            │
//!                                            ▼
//!                                 most similar project id
//!                                            │
//!   fresh metrics + id ──► GET /predictions/ ──► every category model
//!                                            │
//!                                            ▼
//!                         verdict + de-normalized decision path
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for catalog paths and the server
//! - [`models`] - Shared data types: `Language`, `DefectType`, `ProjectMetrics`, responses
//! - [`catalog`] - Read-only per-language project catalogs and cosine similarity
//! - [`classifier`] - Fitted pipeline artifacts (scaler + decision tree), loaders, rule dumps
//! - [`engine`] - Nearest-project selection and inference with decision traces
//! - [`api`] - Axum handlers for `/models/`, `/predictions/` and liveness
//! - [`error`] - Error taxonomy mapped to HTTP status codes
//! - [`state`] - Shared application state holding config, catalog and artifact loader

pub mod api;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod state;

//! Core library for bradio
//!
//! This crate implements the **Functional Core** of the bradio application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`bradio_core`** (this crate): query validation, station conversion and
//!   rendering, with zero I/O
//! - **`bradio`**: the HTTP client for the Radio Browser directory, the
//!   command line and the MCP server (the Imperative Shell)
//!
//! Every function here is deterministic and can be tested with fixture data,
//! no HTTP server or mocking required. Both front ends share these functions,
//! so the CLI and the MCP tools validate and render results the same way.
//!
//! # Module Organization
//!
//! - [`query`]: candidate queries, validation, and the directory request they map to
//! - [`station`]: directory station records and their output projection
//! - [`render`]: text lines and structured documents
//! - [`error`]: error kinds shared by both front ends
//!
//! # Example Usage
//!
//! ```rust
//! use bradio_core::query::QueryRequest;
//! use bradio_core::render::{build_output, format_station_line};
//! use bradio_core::station::Station;
//!
//! let query = QueryRequest::popular(Some(3)).validate().unwrap();
//! let stations = vec![Station {
//!     name: "Test FM".to_string(),
//!     clickcount: 50,
//!     ..Default::default()
//! }];
//!
//! let output = build_output(&query, &stations);
//! assert_eq!(output.stations[0].rank, Some(1));
//! assert!(format_station_line(&stations[0]).starts_with("(50) Test FM;"));
//! ```

pub mod error;
pub mod query;
pub mod render;
pub mod station;

pub use error::Error;

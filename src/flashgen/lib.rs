//! # Flashgen Architecture
//!
//! Flashgen turns study material into flashcards: it cleans the text, asks a
//! language model to write question/answer pairs, keeps only the well-formed,
//! distinct ones, stores them as a collection and exports them for other tools.
//!
//! It is a library that happens to have a CLI client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, render.rs)                    │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (indexes / id prefixes → selectors)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - generate: the session controller                         │
//! │  - list, show, delete, export, stats, cards, config, check  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Pipeline + Storage                                         │
//! │  normalize → generate (Backend) → validate → store → export │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The generation pipeline
//!
//! 1. [`normalize`] cleans raw text and caps it at the configured length.
//! 2. [`generate`] builds a prompt and makes one call to a [`generate::Backend`],
//!    retrying once if that call fails transiently.
//! 3. [`validate`] drops malformed candidates, removes duplicates and enforces
//!    the 10 to 25 card range.
//! 4. [`store`] persists the resulting [`model::Collection`].
//! 5. [`export`] writes cards as CSV, JSON or Anki import text.
//!
//! A failure anywhere stops the run before the store is touched.
//!
//! ## No I/O in the core
//!
//! From `api.rs` inward, code never prints and never exits. The backend call
//! and the store are behind traits, so every command is tested against an
//! in-memory store and a scripted backend.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`index`]: Display indexes and selectors (1, 2, ... or id prefixes)
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Flashcard`, `Collection`, `GenerationRequest`)
//! - [`config`]: Configuration management
//! - [`extract`]: Reading text and PDF sources
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod generate;
pub mod index;
pub mod model;
pub mod normalize;
pub mod store;
pub mod validate;

#[cfg(test)]
pub mod test_utils;

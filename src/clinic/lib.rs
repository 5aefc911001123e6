//! # Clinic Overlay Architecture
//!
//! The clinic app ships a fixed set of mock records (appointments, invoices,
//! patients). This library lets UI code treat that read-only seed data as a
//! mutable, durable store by layering local edits on top of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI / UI (main.rs)                                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Per-entity wrappers: fixed namespace + bundled seed      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Overlay Store (overlay.rs)                                 │
//! │  - Merges seed + overlay items − tombstones                 │
//! │  - list / create / update / delete                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - KeyValueStore trait                                      │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Diagnostics go through `tracing`.
//!
//! ## Known Limitation
//!
//! There is no cross-process coordination. Two writers on the same namespace
//! race, and the last write wins.
//!
//! ## Module Overview
//!
//! - [`api`]: Per-entity facade
//! - [`overlay`]: The merge and the mutation primitives
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Namespaces, the `Record`/`Entity` traits, entity shapes
//! - [`seeds`]: Bundled mock data
//! - [`config`]: Configuration and data directory resolution
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod overlay;
pub mod seeds;
pub mod store;

//! # State Module
//!
//! Runtime state for the storefront.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  CartStore   │  │   Catalog    │  │    AppConfig     │              │
//! │  │              │  │              │  │                  │              │
//! │  │  watch<Cart> │  │  products    │  │  storage_key     │              │
//! │  │  writer task │  │  by id       │  │  paths, currency │              │
//! │  └──────┬───────┘  └──────────────┘  └──────────────────┘              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────┐                                      │
//! │  │  CartStorage                 │                                      │
//! │  │  MemoryStorage | Database    │                                      │
//! │  └──────────────────────────────┘                                      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartStore: watch channel lock serializes every mutation             │
//! │  • Catalog, AppConfig: read-only after initialization                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;
mod storage;

pub use cart::CartStore;
pub use catalog::{Catalog, CatalogError};
pub use config::{AppConfig, ConfigError, ConfigResult, CurrencyConfig};
pub use storage::{CartStorage, MemoryStorage, StorageError, StorageResult};

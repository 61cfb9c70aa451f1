//! # Commands Module
//!
//! Everything a view layer calls into.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── cart.rs     ◄─── Cart manipulation (get/add/update/remove/clear)
//! ├── product.rs  ◄─── Product detail panel (variant + quantity picker)
//! └── shell.rs    ◄─── clap grammar, session state and rendering
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  "add 1 9 red 2"                                                        │
//! │         │  shell::parse (clap, multicall)                               │
//! │         ▼                                                               │
//! │  ShellCommand::Add(AddArgs)                                             │
//! │         │  ShellSession::execute                                        │
//! │         ▼                                                               │
//! │  cart::add_to_cart(&CartStore, &Catalog, request)                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<CartResponse, ApiError> ──► rendered with AppConfig currency    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command takes only the state it needs: `get_cart` needs the store,
//! `add_to_cart` needs the store and the catalog.

pub mod cart;
pub mod product;
pub mod shell;

//! # Storefront Entry Point
//!
//! Starts the interactive cart shell. The actual setup is in lib.rs.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match storefront_app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("storefront: {}", e);
            ExitCode::FAILURE
        }
    }
}

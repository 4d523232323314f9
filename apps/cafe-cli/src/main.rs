//! # Café Catalog CLI Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load client configuration
//! 3. Open the token store & run migrations
//! 4. Build the session and catalog managers
//! 5. Resolve the stored session (`check_token`)
//! 6. Run the requested command

fn main() -> anyhow::Result<()> {
    // The actual setup is in lib.rs for better testability
    cafe_cli::run()
}

//! UI Bridge Agent Library
//!
//! This library implements a local HTTP agent that exposes Spotify playback
//! control behind a single authenticated REST surface, plus the plumbing for
//! the companion `uib` CLI. It covers the OAuth 2.0 PKCE login flow, secure
//! token storage, playback device resolution and the request routing that
//! ties it all together.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local agent server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by adapters and handlers
//! - `management` - Agent token, client id and PKCE session management
//! - `server` - Local HTTP server, routing and auth middleware
//! - `spotify` - Spotify Web API client (OAuth + playback)
//! - `store` - Key-value secret store abstraction
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE and token generation helpers
//!
//! # Example
//!
//! ```
//! use uibridge::{config, server, store};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> uibridge::Res<()> {
//!     config::load_env().await?;
//!     let state = server::AppState::new(Arc::new(store::FileStore::default()));
//!     server::start_agent_server(state).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod store;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro terminates the process with exit code 1 after printing, so it
/// should only be used for fatal errors where recovery is not possible.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

//! Terminal front end for the bookshelf core.
//!
//! The binary in `main.rs` parses the command line, loads `Settings`, and
//! hands an `App` the production search and store. Everything it prints is
//! produced by `screens`.

pub mod app;
pub mod screens;
pub mod settings;
pub mod transport;

pub use app::App;
pub use settings::Settings;
pub use transport::UreqTransport;

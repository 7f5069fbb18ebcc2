// Library root
// -----------
// The binary (`main.rs`) only parses arguments, installs logging and hands
// over to `commands::run`. Everything else is exposed here so the
// integration tests can drive the commands against a mock server.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the Belenios API and the `ApiError` type.
// - `session`: token resolution and the best-effort web login.
// - `draft`: draft document and voter list builders.
// - `poller`: waits for a draft's readiness flags.
// - `commands`: the bootstrap sequence and the passthrough commands.
// - `cli`, `config`: argument definitions and the settings derived from them.
// - `telemetry`, `ui`: logging setup and terminal output.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod draft;
pub mod poller;
pub mod session;
pub mod telemetry;
pub mod ui;

pub use api::{ApiClient, ApiError};

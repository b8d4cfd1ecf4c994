// Library root
// -----------
// This crate exposes the pieces of the blog CLI so the binary stays thin
// and the flows can be driven from tests.
//
// Module responsibilities:
// - `api`: blocking HTTP calls to the blog service (register, login,
//   create post, list posts) and their request/response bodies.
// - `session`: the in-memory bearer token for the running process.
// - `ui`: the action menu, prompts and printed output.
// - `config`: command-line and environment configuration.
// - `error`: error types shared by the layers above.
// - `telemetry`: `tracing` subscriber setup.
pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;
pub mod ui;

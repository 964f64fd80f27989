// Library root: re-exports the front-end modules so integration tests can
// drive the App and render frames without a real terminal.

pub mod app;
pub mod protocol;
pub mod tui;

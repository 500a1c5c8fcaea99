//! bundle-handoff: install a bundled package through a staged session,
//! then bring it to the foreground and step aside.

pub mod bootstrap;

pub use bootstrap::run_app;

pub(crate) mod config;
pub(crate) mod sequencer;
pub(crate) mod session;
pub(crate) mod state;

pub(crate) mod config;
pub(crate) mod credentials;
pub(crate) mod effects;
pub(crate) mod export;
pub(crate) mod logging;
pub(crate) mod media;
pub(crate) mod session;
pub(crate) mod ui;

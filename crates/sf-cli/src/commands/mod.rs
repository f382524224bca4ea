//! CLI command implementations

pub(crate) mod common;
pub(crate) mod external;
pub(crate) mod list;
pub(crate) mod migrate;
pub(crate) mod show;
pub(crate) mod status;

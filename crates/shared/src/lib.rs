//! Types shared by the planner client, the desktop shell and the backend proxy.

pub mod domain;
pub mod error;
pub mod protocol;

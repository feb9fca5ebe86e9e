//! Domain types, lifecycle events and error taxonomy shared by the
//! transition controller and the apps that host it.

pub mod domain;
pub mod error;
pub mod protocol;

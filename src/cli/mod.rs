//! Command-line front end

pub mod auth;
pub mod context;
pub mod run;
pub mod style;

//! Terminal rendering of the form and parsing of typed commands.

pub mod input;
pub mod render;

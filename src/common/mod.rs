//!
//! Common utilities across lexing and syntax-parsing.
//!

pub mod position;
pub mod scanner;

pub use self::{position::Pos, scanner::TextScanner};

//! IRC line tokenization.
//!
//! Grammar: `["@" tags SPACE] [":" prefix SPACE] command *(SPACE param) [SPACE ":" trailing]`.

mod nom_parser;
mod serialize;
pub mod tags;
mod types;

pub use self::types::RawMessage;

pub mod collector;
pub mod error;
pub mod fields;
pub mod keyword;
pub mod logging;
pub mod merger;
pub mod models;
pub mod pack;
pub mod rink;
pub mod transcode;
pub mod unpack;

#[cfg(test)]
mod mapping_edge_cases;

pub use error::{CardError, Result};
pub use models::{CardKind, CardPackage, KeywordEntry, Record, RinkCard};
pub use pack::work_zzz;
pub use unpack::work_rrr;

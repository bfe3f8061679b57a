//! Layered response parsing: delimited sections, embedded JSON, and
//! heuristic line classification. All parsers are total functions.

pub mod competitive;
pub mod embedded;
pub mod sections;

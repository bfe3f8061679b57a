//! Market-research intelligence: prompt construction, layered parsing of
//! model responses, and assembly of the persisted record shapes.
//!
//! Parsing never fails. Each response kind runs an ordered chain of
//! strategies (strict JSON decode, then heuristic text extraction, then a
//! fixed fallback); the worst case is an all-default record carrying the
//! verbatim raw text in a passthrough field.

pub mod generate;
pub mod parse;
pub mod prompts;
pub mod scenarios;

pub use generate::*;
pub use parse::sections::AnalysisSections;
pub use parse::embedded::FunnelPayload;

//! Fixed-column codec for SAMMY parameter and input files.
//!
//! [`document::Document`] reads and writes whole files; the card models in
//! [`cards`] handle one card set each on top of the column primitives in
//! [`field`].

pub mod cards;
pub mod commands;
pub mod common;
pub mod dispatch;
pub mod document;
pub mod domain;
pub mod field;

pub use cards::{CardInstance, CardModel};
pub use commands::{CommandCategory, CommandRegistry, CommandSpec};
pub use common::{CodecOptions, GroupListMode, MergeOptions};
pub use dispatch::FormatDispatcher;
pub use document::{CardSummary, Document, DocumentSummary};
pub use domain::{
    CardSet, DiagnosticContext, DocumentKind, Param, SammyError, SammyErrorKind, SammyResult,
    VaryDomain, VaryFlag,
};

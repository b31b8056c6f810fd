//! Index linkable terms from document paths and rewrite prose into
//! `[[wikilinks]]`.
//!
//! Build a [`CandidateIndex`] from the host's [`PathEntry`] snapshot, then run
//! [`LinkScanner`] (or [`rewrite`]) over each document body. Hosts that
//! rebuild on corpus changes publish new indexes through an [`IndexHandle`].

pub mod candidate_index;
pub mod error;
pub mod handle;
pub mod protected;
pub mod scanner;
pub mod script;
pub mod trie;

pub use candidate_index::{CandidateEntry, CandidateIndex, PathEntry};
pub use error::SettingsError;
pub use handle::IndexHandle;
pub use scanner::{rewrite, LinkScanner, RewriteOutcome, ScanSettings};

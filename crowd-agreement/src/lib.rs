//! Inter-annotator agreement measures for crowd-sourced span annotations.
//!
//! This crate takes the [`crowd_anno`] view of a task batch and answers two
//! questions about it: how strongly did the workers agree on where a span
//! lies, and which submissions can be pooled together in the first place.
//!
//! ## Core Types
//!
//! * [`UnitizingStudy`] - Krippendorff's unitizing alpha over a token
//!   continuum, with [`UNDEFINED`] as the sentinel for studies the
//!   coefficient is not defined on.
//! * [`ExactMatches`] / [`aggregate_exact_matches`] - submissions collapsed
//!   into one record per distinct span, with a stance majority per record.
//! * [`overlap_groups`] - per-span neighborhoods of overlapping records.
//! * [`binary_agreement`] - the share of workers that marked anything at all.
//!
//! ## Example
//!
//! ```
//! use crowd_agreement::UnitizingStudy;
//!
//! let mut study = UnitizingStudy::new(2, 12);
//! study.add_unit(0, 3, 4);
//! study.add_unit(1, 3, 4);
//! assert_eq!(study.alpha(), 1.0);
//! ```

mod binary;
mod exact_match;
mod overlap;
mod unitizing;

pub use binary::binary_agreement;
pub use exact_match::{
    aggregate_exact_matches, stance_majority, CommentRecord, ExactMatchRecord, ExactMatches,
    StanceMajority,
};
pub use overlap::overlap_groups;
pub use unitizing::{UnitizingStudy, UNDEFINED};

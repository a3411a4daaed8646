//! Core data model for crowd-sourced span annotations.
//!
//! Crowd workers mark argumentative spans (major claims, claims, premises)
//! over tokenized documents. This crate provides the shared vocabulary the
//! rest of the workspace builds on: tokens and token spans, worker
//! submissions, rater rosters with stable indices, and a display helper for
//! snapshot tests.
//!
//! ## Core Types
//!
//! - [`Token`] / [`TokenSequence`] - Tokenized document, the continuum all
//!   span arithmetic works over
//! - [`TokenSpan`] - Inclusive token range
//! - [`WorkerAnnotation`] / [`AnnotatedDocument`] - One task batch of worker
//!   submissions
//! - [`RaterRoster`] / [`FrozenRoster`] - Rater identities with stable
//!   positional indices
//! - [`AnnotationDisplay`] - Aligned underline rendering for snapshots
//!
//! ## Example
//!
//! ```
//! use crowd_anno::{tokenize, AnnotationDisplay, TokenSpan};
//!
//! let tokens = tokenize("Great battery life");
//! assert_eq!(tokens.len(), 3);
//!
//! let display = AnnotationDisplay::new(&tokens).with(TokenSpan::new(0, 2), "w1");
//! println!("{}", display);
//! ```

mod annotation;
mod display;
mod rater;
mod span;
mod token;
mod tokenize;

// Document model
pub use annotation::{AnnotatedDocument, AnnotationBody, Stance, TaskKind, WorkerAnnotation};
pub use span::TokenSpan;
pub use token::{Token, TokenSequence};

// Rater identities
pub use rater::{FrozenRoster, RaterId, RaterRoster};

// Rendering and fixtures
pub use display::AnnotationDisplay;
pub use tokenize::tokenize;

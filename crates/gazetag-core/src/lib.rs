//! Core domain logic for per-sample gaze classification.
//!
//! This crate implements the pure part of the pipeline: screen geometry,
//! the region-of-interest registry, the trial model, and the per-trial
//! classifier that labels each gaze sample as target-ROI, target-RONI,
//! distractor-ROI, distractor-RONI, or away. It performs no file I/O;
//! session-log parsing lives in `gazetag-asc` and orchestration in the
//! `gazetag` binary.

pub use self::{classify::*, geometry::*, region::*, trial::*};

pub mod classify;
pub mod geometry;
pub mod region;
pub mod trial;

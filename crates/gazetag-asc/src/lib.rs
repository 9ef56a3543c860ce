//! Parsing of EyeLink-style `.asc` session logs.
//!
//! A session log is line-oriented, whitespace-tokenized text. Two kinds of
//! lines matter here:
//!
//! - **Marker lines** start with the token `MSG` followed by a timestamp.
//!   Recognized sub-markers are the sampling-rate message (`RATE`), the
//!   screen-resolution message (`GAZE_COORDS`), and the configurable
//!   trial-start/trial-end keywords.
//! - **Gaze lines** start with a purely numeric timestamp; the next two
//!   tokens, when present and not the `.` placeholder, are the x/y gaze
//!   coordinates.
//!
//! Each file is read in two forward passes: [`metadata::read_metadata`]
//! recovers the sampling interval and screen resolution, then
//! [`events::parse_events`] collects trial boundaries and the full
//! timestamped gaze table. Neither pass seeks backward.

pub use self::{events::*, metadata::*};

pub mod events;
pub mod metadata;

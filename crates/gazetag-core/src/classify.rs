//! Per-trial gaze classification.
//!
//! For one trial, resolves which video is target and which is distractor,
//! looks up their ROI rectangles, and labels every valid gaze sample in
//! the trial window. Containment is tested against four rectangles in
//! strict priority order, first match wins:
//!
//! 1. target ROI (`ROI_T`)
//! 2. distractor ROI (`ROI_D`)
//! 3. target display half (`RONI_T`)
//! 4. distractor display half (`RONI_D`)
//! 5. otherwise `Away`
//!
//! The order encodes specificity: the inner region is tested before the
//! display half that contains it, and the target side before the
//! distractor side. Downstream tooling depends on this order, so it must
//! not be rearranged.

use std::collections::BTreeMap;

use crate::{
    geometry::{GazePoint, Screen},
    region::RegionTable,
    trial::{SideCodeError, Trial},
};

/// Pre-trial inclusion offset in milliseconds: samples up to this long
/// before the start marker belong to the trial. The end bound is the raw
/// end timestamp; there is no post-trial buffer.
pub const DEFAULT_OFFSET_MS: i64 = 100;

/// Classification outcome of a single gaze sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RoiLabel {
    /// Inside the target video's region of interest.
    #[display("ROI_T")]
    TargetRoi,
    /// Inside the distractor video's region of interest.
    #[display("ROI_D")]
    DistractorRoi,
    /// Inside the target video's display half but outside its ROI.
    #[display("RONI_T")]
    TargetRoni,
    /// Inside the distractor video's display half but outside its ROI.
    #[display("RONI_D")]
    DistractorRoni,
    /// Outside both display halves.
    #[display("Away")]
    Away,
}

/// One output row: a classified gaze sample within a trial.
///
/// The five attention flags written to the output are derived from
/// [`label`](Self::label), so exactly one of them is ever set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    /// Source file identifier, as passed on the command line.
    pub participant: String,
    /// Milliseconds since the effective trial start (`start - offset`).
    pub time: i64,
    pub movie_left: String,
    pub movie_right: String,
    /// Trial index token, verbatim from the start marker.
    pub trial_index: String,
    /// Side-code token, verbatim from the start marker.
    pub side_code: String,
    pub label: RoiLabel,
}

impl SampleRecord {
    /// Column names of the output file, in row order.
    pub const HEADER: &'static str = "participant time movie_L movie_R i side_trial \
         Target_ROI Target_RONI Distractor_ROI Distractor_RONI Away ROI_Label";

    /// The five attention flags in output-column order:
    /// target-ROI, target-RONI, distractor-ROI, distractor-RONI, away.
    #[must_use]
    pub fn flags(&self) -> [u8; 5] {
        match self.label {
            RoiLabel::TargetRoi => [1, 0, 0, 0, 0],
            RoiLabel::TargetRoni => [0, 1, 0, 0, 0],
            RoiLabel::DistractorRoi => [0, 0, 1, 0, 0],
            RoiLabel::DistractorRoni => [0, 0, 0, 1, 0],
            RoiLabel::Away => [0, 0, 0, 0, 1],
        }
    }

    /// Formats the record as one space-joined output row.
    #[must_use]
    pub fn to_row(&self) -> String {
        let [t_roi, t_roni, d_roi, d_roni, away] = self.flags();
        format!(
            "{} {} {} {} {} {} {t_roi} {t_roni} {d_roi} {d_roni} {away} {}",
            self.participant,
            self.time,
            self.movie_left,
            self.movie_right,
            self.trial_index,
            self.side_code,
            self.label,
        )
    }
}

/// Classifies every valid gaze sample of one trial, in ascending timestamp
/// order.
///
/// The trial window is `[start - offset_ms, end)`. Samples carrying the
/// invalid sentinel are skipped without producing a row. A missing region
/// registry entry falls back to the role's full display half, with a
/// diagnostic on stderr.
///
/// # Errors
///
/// Returns [`SideCodeError`] if the trial's side code is not an integer;
/// the caller is expected to abort the current file and continue the run.
pub fn classify_trial(
    participant: &str,
    trial: &Trial,
    gaze: &BTreeMap<i64, GazePoint>,
    regions: &RegionTable,
    screen: Screen,
    offset_ms: i64,
) -> Result<Vec<SampleRecord>, SideCodeError> {
    let roles = trial.roles(screen)?;

    let target_roi = regions
        .resolve(&roles.target.movie_base(), roles.target.side)
        .unwrap_or_else(|| {
            eprintln!(
                "warning: {participant}: no region entry for target movie \
                 {:?} ({} side); using its full display half",
                roles.target.movie,
                roles.target.side.suffix(),
            );
            roles.target.display
        });
    let distractor_roi = regions
        .resolve(&roles.distractor.movie_base(), roles.distractor.side)
        .unwrap_or_else(|| {
            eprintln!(
                "warning: {participant}: no region entry for distractor movie \
                 {:?} ({} side); using its full display half",
                roles.distractor.movie,
                roles.distractor.side.suffix(),
            );
            roles.distractor.display
        });

    let window_start = trial.start - offset_ms;
    let mut records = Vec::new();
    // A trial whose end marker precedes its effective start (possible
    // when unbalanced markers pair positionally) has an empty window;
    // `BTreeMap::range` rejects an inverted range outright.
    if window_start >= trial.end {
        return Ok(records);
    }
    for (&timestamp, &point) in gaze.range(window_start..trial.end) {
        if point.is_invalid() {
            continue;
        }

        let label = if target_roi.contains(point) {
            RoiLabel::TargetRoi
        } else if distractor_roi.contains(point) {
            RoiLabel::DistractorRoi
        } else if roles.target.display.contains(point) {
            RoiLabel::TargetRoni
        } else if roles.distractor.display.contains(point) {
            RoiLabel::DistractorRoni
        } else {
            RoiLabel::Away
        };

        records.push(SampleRecord {
            participant: participant.to_owned(),
            time: timestamp - window_start,
            movie_left: trial.movie_left.clone(),
            movie_right: trial.movie_right.clone(),
            trial_index: trial.index.clone(),
            side_code: trial.side_code.clone(),
            label,
        });
    }

    Ok(records)
}

//! Region-of-interest registry.
//!
//! Maps a stimulus video to the rectangle depicting the hand/action within
//! its display half. The lookup is a two-level indirection:
//!
//! 1. The video's base filename is mapped to a group name through the
//!    alias table. Several per-condition variants share one on-screen
//!    geometry and alias to a shared `Common…` group; the remaining
//!    variants map to themselves.
//! 2. The key `{group}_{side}_ROI` is looked up in the rectangle table.
//!
//! Keeping the alias table separate from the rectangle table avoids
//! duplicating rectangles across variants, and a missing alias degrades to
//! a fallback instead of failing the run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Side};

/// Video-to-group aliases for the builtin stimulus set.
///
/// Variants 1, 5 and 6 of each gesture/action share one region; variants
/// 2, 3 and 4 have a dedicated one.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("Gesture1_Actor1", "CommonGesture_Actor1"),
    ("Gesture5_Actor1", "CommonGesture_Actor1"),
    ("Gesture6_Actor1", "CommonGesture_Actor1"),
    ("Gesture2_Actor1", "Gesture2_Actor1"),
    ("Gesture3_Actor1", "Gesture3_Actor1"),
    ("Gesture4_Actor1", "Gesture4_Actor1"),
    ("Action1_Actor1", "CommonAction_Actor1"),
    ("Action5_Actor1", "CommonAction_Actor1"),
    ("Action6_Actor1", "CommonAction_Actor1"),
    ("Action2_Actor1", "Action2_Actor1"),
    ("Action3_Actor1", "Action3_Actor1"),
    ("Action4_Actor1", "Action4_Actor1"),
    ("Gesture1_Actor2", "CommonGesture_Actor2"),
    ("Gesture5_Actor2", "CommonGesture_Actor2"),
    ("Gesture6_Actor2", "CommonGesture_Actor2"),
    ("Gesture2_Actor2", "Gesture2_Actor2"),
    ("Gesture3_Actor2", "Gesture3_Actor2"),
    ("Gesture4_Actor2", "Gesture4_Actor2"),
    ("Action1_Actor2", "CommonAction_Actor2"),
    ("Action5_Actor2", "CommonAction_Actor2"),
    ("Action6_Actor2", "CommonAction_Actor2"),
    ("Action2_Actor2", "Action2_Actor2"),
    ("Action3_Actor2", "Action3_Actor2"),
    ("Action4_Actor2", "Action4_Actor2"),
];

/// Keyed rectangles for the builtin stimulus set, in screen pixels.
const BUILTIN_REGIONS: &[(&str, Rect)] = &[
    // Actor1 gestures
    ("CommonGesture_Actor1_Left_ROI", Rect::new(155.0, 548.0, 443.0, 620.0)),
    ("Gesture2_Actor1_Left_ROI", Rect::new(155.0, 404.0, 227.0, 620.0)),
    ("Gesture3_Actor1_Left_ROI", Rect::new(155.0, 512.0, 443.0, 620.0)),
    ("Gesture4_Actor1_Left_ROI", Rect::new(170.0, 512.0, 347.0, 620.0)),
    ("CommonGesture_Actor1_Right_ROI", Rect::new(838.0, 548.0, 1126.0, 620.0)),
    ("Gesture2_Actor1_Right_ROI", Rect::new(838.0, 404.0, 982.0, 620.0)),
    ("Gesture3_Actor1_Right_ROI", Rect::new(838.0, 512.0, 1126.0, 620.0)),
    ("Gesture4_Actor1_Right_ROI", Rect::new(838.0, 512.0, 1030.0, 620.0)),
    // Actor1 actions
    ("CommonAction_Actor1_Left_ROI", Rect::new(155.0, 548.0, 443.0, 620.0)),
    ("Action2_Actor1_Left_ROI", Rect::new(155.0, 404.0, 227.0, 620.0)),
    ("Action3_Actor1_Left_ROI", Rect::new(155.0, 512.0, 443.0, 620.0)),
    ("Action4_Actor1_Left_ROI", Rect::new(170.0, 512.0, 347.0, 620.0)),
    ("CommonAction_Actor1_Right_ROI", Rect::new(838.0, 548.0, 1126.0, 620.0)),
    ("Action2_Actor1_Right_ROI", Rect::new(838.0, 404.0, 982.0, 620.0)),
    ("Action3_Actor1_Right_ROI", Rect::new(838.0, 512.0, 1126.0, 620.0)),
    ("Action4_Actor1_Right_ROI", Rect::new(838.0, 512.0, 1030.0, 620.0)),
    // Actor2 gestures
    ("CommonGesture_Actor2_Left_ROI", Rect::new(155.0, 548.0, 443.0, 620.0)),
    ("Gesture2_Actor2_Left_ROI", Rect::new(299.0, 404.0, 443.0, 620.0)),
    ("Gesture3_Actor2_Left_ROI", Rect::new(155.0, 512.0, 443.0, 620.0)),
    ("Gesture4_Actor2_Left_ROI", Rect::new(251.0, 512.0, 443.0, 620.0)),
    ("CommonGesture_Actor2_Right_ROI", Rect::new(838.0, 548.0, 1126.0, 620.0)),
    ("Gesture2_Actor2_Right_ROI", Rect::new(982.0, 404.0, 1126.0, 620.0)),
    ("Gesture3_Actor2_Right_ROI", Rect::new(838.0, 512.0, 1126.0, 620.0)),
    ("Gesture4_Actor2_Right_ROI", Rect::new(934.0, 512.0, 1126.0, 620.0)),
    // Actor2 actions
    ("CommonAction_Actor2_Left_ROI", Rect::new(155.0, 548.0, 443.0, 620.0)),
    ("Action2_Actor2_Left_ROI", Rect::new(299.0, 404.0, 443.0, 620.0)),
    ("Action3_Actor2_Left_ROI", Rect::new(155.0, 512.0, 443.0, 620.0)),
    ("Action4_Actor2_Left_ROI", Rect::new(251.0, 512.0, 443.0, 620.0)),
    ("CommonAction_Actor2_Right_ROI", Rect::new(838.0, 548.0, 1126.0, 620.0)),
    ("Action2_Actor2_Right_ROI", Rect::new(982.0, 404.0, 1126.0, 620.0)),
    ("Action3_Actor2_Right_ROI", Rect::new(838.0, 512.0, 1126.0, 620.0)),
    ("Action4_Actor2_Right_ROI", Rect::new(934.0, 512.0, 1126.0, 620.0)),
];

/// Immutable region registry: movie aliases plus keyed rectangles.
///
/// Loaded once at startup (builtin tables or a JSON file) and passed by
/// reference into the classifier. Resolution is deterministic: the same
/// `(movie, side)` pair always yields the same result within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionTable {
    /// Movie base filename (no path, no extension) to region-group name.
    pub aliases: BTreeMap<String, String>,
    /// `{group}_{side}_ROI` to rectangle.
    pub regions: BTreeMap<String, Rect>,
}

impl RegionTable {
    /// The region tables of the original two-actor gesture/action
    /// experiment.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|&(movie, group)| (movie.to_owned(), group.to_owned()))
                .collect(),
            regions: BUILTIN_REGIONS
                .iter()
                .map(|&(key, rect)| (key.to_owned(), rect))
                .collect(),
        }
    }

    /// Resolves the ROI rectangle for a movie shown on the given side.
    ///
    /// Returns `None` when the movie has no alias entry or the composed
    /// `{group}_{side}_ROI` key has no rectangle; callers fall back to the
    /// full display half in that case.
    #[must_use]
    pub fn resolve(&self, movie_base: &str, side: Side) -> Option<Rect> {
        let group = self.aliases.get(movie_base)?;
        let key = format!("{group}_{}_ROI", side.suffix());
        self.regions.get(&key).copied()
    }
}

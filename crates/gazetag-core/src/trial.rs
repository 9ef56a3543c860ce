use std::path::Path;

use crate::geometry::{Rect, Screen, Side};

/// One bounded time window during which two videos were shown side by
/// side. Built from one trial-start/trial-end marker pair; the index and
/// side-code tokens are kept verbatim for the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    pub start: i64,
    pub end: i64,
    pub movie_left: String,
    pub movie_right: String,
    pub index: String,
    pub side_code: String,
}

/// The side-code token of a trial-start marker could not be read as an
/// integer.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid trial side code {code:?} (expected an integer)")]
pub struct SideCodeError {
    pub code: String,
}

/// One video role within a trial: the movie shown, the half of the screen
/// it occupies, and the side suffix used for region-key composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub movie: String,
    pub side: Side,
    pub display: Rect,
}

impl Role {
    /// Base filename of the movie, without path or extension. This is the
    /// form the region registry is keyed by.
    #[must_use]
    pub fn movie_base(&self) -> String {
        Path::new(&self.movie)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Target/distractor assignment for one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRoles {
    pub target: Role,
    pub distractor: Role,
}

impl Trial {
    /// Assigns target and distractor roles from the side code.
    ///
    /// Side code `1` puts the target on the right; any other integer puts
    /// it on the left, matching the recording software's convention.
    pub fn roles(&self, screen: Screen) -> Result<TrialRoles, SideCodeError> {
        let code: i64 = self.side_code.parse().map_err(|_| SideCodeError {
            code: self.side_code.clone(),
        })?;

        let (target_side, distractor_side) = if code == 1 {
            (Side::Right, Side::Left)
        } else {
            (Side::Left, Side::Right)
        };
        Ok(TrialRoles {
            target: self.role_on(target_side, screen),
            distractor: self.role_on(distractor_side, screen),
        })
    }

    fn role_on(&self, side: Side, screen: Screen) -> Role {
        let movie = match side {
            Side::Left => self.movie_left.clone(),
            Side::Right => self.movie_right.clone(),
        };
        Role {
            movie,
            side,
            display: side.display_half(screen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(side_code: &str) -> Trial {
        Trial {
            start: 1000,
            end: 2000,
            movie_left: "Gesture1_Actor1.avi".to_owned(),
            movie_right: "Action1_Actor1.avi".to_owned(),
            index: "1".to_owned(),
            side_code: side_code.to_owned(),
        }
    }

    const SCREEN: Screen = Screen::new(1280.0, 1024.0);

    #[test]
    fn test_side_code_one_targets_right_video() {
        let roles = trial("1").roles(SCREEN).unwrap();

        assert_eq!(roles.target.movie, "Action1_Actor1.avi");
        assert_eq!(roles.target.side, Side::Right);
        assert_eq!(roles.target.display, SCREEN.right_half());
        assert_eq!(roles.distractor.movie, "Gesture1_Actor1.avi");
        assert_eq!(roles.distractor.side, Side::Left);
    }

    #[test]
    fn test_side_code_two_targets_left_video() {
        let roles = trial("2").roles(SCREEN).unwrap();

        assert_eq!(roles.target.movie, "Gesture1_Actor1.avi");
        assert_eq!(roles.target.side, Side::Left);
        assert_eq!(roles.distractor.movie, "Action1_Actor1.avi");
        assert_eq!(roles.distractor.side, Side::Right);

        // Swapped assignment relative to side code 1.
        let swapped = trial("1").roles(SCREEN).unwrap();
        assert_eq!(swapped.target.movie, roles.distractor.movie);
        assert_eq!(swapped.distractor.movie, roles.target.movie);
    }

    #[test]
    fn test_any_non_one_integer_targets_left_video() {
        // The recorder only emits 1 and 2, but the convention is "1 means
        // right, everything else means left".
        let roles = trial("3").roles(SCREEN).unwrap();
        assert_eq!(roles.target.side, Side::Left);
    }

    #[test]
    fn test_non_integer_side_code_is_an_error() {
        let err = trial("left").roles(SCREEN).unwrap_err();
        assert_eq!(err.code, "left");
    }

    #[test]
    fn test_movie_base_strips_path_and_extension() {
        let role = Role {
            movie: "stimuli/videos/Gesture1_Actor1.avi".to_owned(),
            side: Side::Left,
            display: SCREEN.left_half(),
        };
        assert_eq!(role.movie_base(), "Gesture1_Actor1");

        let bare = Role {
            movie: "Gesture1_Actor1".to_owned(),
            side: Side::Left,
            display: SCREEN.left_half(),
        };
        assert_eq!(bare.movie_base(), "Gesture1_Actor1");
    }
}

use std::collections::BTreeMap;

use gazetag_core::{GazePoint, Trial};
use serde::Deserialize;

/// Marker keywords and token offsets of the trial-start/trial-end
/// messages.
///
/// The defaults match the original experiment scripts; a JSON file with
/// any subset of the fields can override them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Third token of a trial-start `MSG` line.
    pub trial_start: String,
    /// Third token of a trial-end `MSG` line.
    pub trial_end: String,
    /// Token offset of the left movie name within a start marker.
    pub movie_left_field: usize,
    /// Token offset of the right movie name within a start marker.
    pub movie_right_field: usize,
    /// Token offset of the trial index within a start marker.
    pub trial_index_field: usize,
    /// Token offset of the side code within a start marker.
    pub side_field: usize,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            trial_start: "START_TEST".to_owned(),
            trial_end: "END_TEST".to_owned(),
            movie_left_field: 4,
            movie_right_field: 5,
            trial_index_field: 3,
            side_field: 6,
        }
    }
}

/// Fields read from one trial-start marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialStart {
    pub time: i64,
    pub movie_left: String,
    pub movie_right: String,
    pub index: String,
    pub side_code: String,
}

/// Everything the second pass collects from one session log.
///
/// Start and end markers are kept in file order and are not paired during
/// parsing; [`trials`](Self::trials) pairs them positionally, truncating
/// to the shorter sequence when their counts differ.
#[derive(Debug, Clone, Default)]
pub struct SessionEvents {
    pub starts: Vec<TrialStart>,
    pub ends: Vec<i64>,
    /// Gaze coordinates keyed by timestamp. Later occurrences of the same
    /// timestamp overwrite earlier ones.
    pub gaze: BTreeMap<i64, GazePoint>,
}

impl SessionEvents {
    /// Number of complete trials: the minimum of the start and end
    /// marker counts.
    #[must_use]
    pub fn trial_count(&self) -> usize {
        self.starts.len().min(self.ends.len())
    }

    /// False when the file has unequal numbers of start and end markers.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.starts.len() == self.ends.len()
    }

    /// Pairs start and end markers positionally into trials, in file
    /// order.
    pub fn trials(&self) -> impl Iterator<Item = Trial> + '_ {
        self.starts
            .iter()
            .zip(&self.ends)
            .map(|(start, &end)| Trial {
                start: start.time,
                end,
                movie_left: start.movie_left.clone(),
                movie_right: start.movie_right.clone(),
                index: start.index.clone(),
                side_code: start.side_code.clone(),
            })
    }
}

/// The second pass hit a line it cannot recover from.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EventParseError {
    /// A marker or gaze timestamp token could not be read as an integer.
    #[display("unreadable timestamp {token:?} on line {line}")]
    Timestamp { line: usize, token: String },
    /// A trial-start marker is shorter than the configured field offsets.
    #[display("start marker on line {line} has no field at offset {field}")]
    MissingField { line: usize, field: usize },
}

/// Collects trial markers and the gaze coordinate table from a session
/// log.
///
/// Gaze lines that are too short, carry the `.` placeholder, or fail to
/// parse are recorded as the invalid sentinel rather than dropped: every
/// gaze timestamp produces exactly one table entry.
///
/// # Errors
///
/// Returns [`EventParseError`] for an unreadable marker timestamp or a
/// start marker missing a configured field; the caller aborts the current
/// file and continues the run.
pub fn parse_events<'a, I>(lines: I, config: &MarkerConfig) -> Result<SessionEvents, EventParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut events = SessionEvents::default();

    for (line_no, line) in lines.into_iter().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = parts.first() else {
            continue;
        };

        if first == "MSG" {
            if parts.get(2) == Some(&config.trial_start.as_str()) {
                let time = parse_timestamp(&parts, line_no)?;
                let field = |offset: usize| -> Result<String, EventParseError> {
                    parts
                        .get(offset)
                        .map(|token| (*token).to_owned())
                        .ok_or(EventParseError::MissingField {
                            line: line_no + 1,
                            field: offset,
                        })
                };
                events.starts.push(TrialStart {
                    time,
                    movie_left: field(config.movie_left_field)?,
                    movie_right: field(config.movie_right_field)?,
                    index: field(config.trial_index_field)?,
                    side_code: field(config.side_field)?,
                });
            } else if parts.get(2) == Some(&config.trial_end.as_str()) {
                events.ends.push(parse_timestamp(&parts, line_no)?);
            }
        } else if !first.is_empty() && first.bytes().all(|b| b.is_ascii_digit()) {
            let timestamp = first.parse::<i64>().map_err(|_| EventParseError::Timestamp {
                line: line_no + 1,
                token: first.to_owned(),
            })?;

            let point = match (parts.get(1), parts.get(2)) {
                (Some(&x), Some(&y)) if x != "." && y != "." => {
                    match (x.parse::<f64>(), y.parse::<f64>()) {
                        (Ok(x), Ok(y)) => GazePoint::new(x, y),
                        _ => GazePoint::INVALID,
                    }
                }
                _ => GazePoint::INVALID,
            };
            events.gaze.insert(timestamp, point);
        }
    }

    Ok(events)
}

fn parse_timestamp(parts: &[&str], line_no: usize) -> Result<i64, EventParseError> {
    let token = parts.get(1).copied().unwrap_or_default();
    token.parse().map_err(|_| EventParseError::Timestamp {
        line: line_no + 1,
        token: token.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use gazetag_core::{
        GazePoint, RegionTable, RoiLabel, Screen, classify_trial,
    };

    use super::*;

    const LOG: &str = "\
** some preamble the parser ignores\n\
MSG 500 RECORD_START\n\
MSG 1000 START_TEST 1 Action1_Actor1.avi Gesture1_Actor1.avi 1\n\
996 512.0 384.0 50.0\n\
1000 900.0 600.0 52.0\n\
1004 . . 0.0\n\
1008 oops broken\n\
1012\n\
MSG 2000 END_TEST\n\
MSG 3000 START_TEST 2 Gesture2_Actor2.avi Action2_Actor2.avi 2\n\
3004 100.0 100.0 48.0\n\
MSG 4000 END_TEST\n";

    #[test]
    fn test_collects_start_markers_with_configured_fields() {
        let events = parse_events(LOG.lines(), &MarkerConfig::default()).unwrap();

        assert_eq!(events.starts.len(), 2);
        let first = &events.starts[0];
        assert_eq!(first.time, 1000);
        assert_eq!(first.movie_left, "Action1_Actor1.avi");
        assert_eq!(first.movie_right, "Gesture1_Actor1.avi");
        assert_eq!(first.index, "1");
        assert_eq!(first.side_code, "1");

        assert_eq!(events.ends, vec![2000, 4000]);
        assert!(events.is_balanced());
        assert_eq!(events.trial_count(), 2);
    }

    #[test]
    fn test_every_gaze_timestamp_gets_one_entry() {
        let events = parse_events(LOG.lines(), &MarkerConfig::default()).unwrap();

        assert_eq!(events.gaze.len(), 5);
        assert_eq!(events.gaze[&996], GazePoint::new(512.0, 384.0));
        assert_eq!(events.gaze[&1000], GazePoint::new(900.0, 600.0));
        // Placeholder, unparsable, and too-short lines all become the
        // invalid sentinel.
        assert_eq!(events.gaze[&1004], GazePoint::INVALID);
        assert_eq!(events.gaze[&1008], GazePoint::INVALID);
        assert_eq!(events.gaze[&1012], GazePoint::INVALID);
    }

    #[test]
    fn test_duplicate_timestamp_overwrites() {
        let log = "\
1000 10.0 10.0 50.0\n\
1000 20.0 20.0 50.0\n";
        let events = parse_events(log.lines(), &MarkerConfig::default()).unwrap();

        assert_eq!(events.gaze.len(), 1);
        assert_eq!(events.gaze[&1000], GazePoint::new(20.0, 20.0));
    }

    #[test]
    fn test_signed_or_decimal_first_token_is_not_a_gaze_line() {
        let log = "\
-1000 10.0 10.0\n\
10.5 10.0 10.0\n\
EFIX L 1000 1200\n";
        let events = parse_events(log.lines(), &MarkerConfig::default()).unwrap();

        assert!(events.gaze.is_empty());
    }

    #[test]
    fn test_unbalanced_markers_truncate_to_shorter_sequence() {
        let log = "\
MSG 1000 START_TEST 1 a.avi b.avi 1\n\
MSG 2000 END_TEST\n\
MSG 3000 START_TEST 2 c.avi d.avi 2\n";
        let events = parse_events(log.lines(), &MarkerConfig::default()).unwrap();

        assert!(!events.is_balanced());
        assert_eq!(events.trial_count(), 1);

        let trials: Vec<Trial> = events.trials().collect();
        assert_eq!(trials.len(), 1);
        assert_eq!(trials[0].start, 1000);
        assert_eq!(trials[0].end, 2000);
    }

    #[test]
    fn test_custom_marker_config() {
        let config = MarkerConfig {
            trial_start: "TRIAL_ON".to_owned(),
            trial_end: "TRIAL_OFF".to_owned(),
            movie_left_field: 3,
            movie_right_field: 4,
            trial_index_field: 5,
            side_field: 6,
        };
        let log = "\
MSG 1000 TRIAL_ON a.avi b.avi 7 2\n\
MSG 2000 TRIAL_OFF\n";
        let events = parse_events(log.lines(), &config).unwrap();

        let trial = events.trials().next().unwrap();
        assert_eq!(trial.movie_left, "a.avi");
        assert_eq!(trial.movie_right, "b.avi");
        assert_eq!(trial.index, "7");
        assert_eq!(trial.side_code, "2");
    }

    #[test]
    fn test_marker_config_deserializes_with_defaults() {
        let config: MarkerConfig = serde_json::from_str(r#"{ "trial_start": "TRIAL_ON" }"#).unwrap();

        assert_eq!(config.trial_start, "TRIAL_ON");
        assert_eq!(config.trial_end, "END_TEST");
        assert_eq!(config.side_field, 6);
    }

    #[test]
    fn test_start_marker_missing_field_is_an_error() {
        let log = "MSG 1000 START_TEST 1 a.avi\n";
        let err = parse_events(log.lines(), &MarkerConfig::default()).unwrap_err();

        assert!(matches!(
            err,
            EventParseError::MissingField { line: 1, field: 5 }
        ));
    }

    #[test]
    fn test_unreadable_marker_timestamp_is_an_error() {
        let log = "MSG soon START_TEST 1 a.avi b.avi 1\n";
        let err = parse_events(log.lines(), &MarkerConfig::default()).unwrap_err();

        assert!(matches!(err, EventParseError::Timestamp { line: 1, .. }));
    }

    // End-to-end over a synthetic log: parse both passes' worth of data
    // and classify the first trial.
    #[test]
    fn test_parsed_log_classifies() {
        let events = parse_events(LOG.lines(), &MarkerConfig::default()).unwrap();
        let screen = Screen::new(1280.0, 1024.0);

        let trial = events.trials().next().unwrap();
        let records = classify_trial(
            "sub01.asc",
            &trial,
            &events.gaze,
            &RegionTable::builtin(),
            screen,
            100,
        )
        .unwrap();

        // 996 (within the 100 ms pre-trial buffer) and 1000; the three
        // invalid samples emit nothing.
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].time, 96);
        assert_eq!(records[0].label, RoiLabel::DistractorRoni);
        assert_eq!(records[1].time, 100);
        assert_eq!(records[1].label, RoiLabel::TargetRoi);
    }
}

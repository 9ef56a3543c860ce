use gazetag_core::Screen;

/// Sampling interval assumed when the log carries no usable `RATE`
/// message.
pub const DEFAULT_SAMPLE_INTERVAL_MS: f64 = 4.0;

/// Per-file recording metadata recovered from the first pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionMetadata {
    /// Milliseconds between consecutive gaze samples (1000 / rate in Hz).
    pub sample_interval_ms: f64,
    pub screen: Screen,
}

/// The first pass over a session log failed.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum MetadataError {
    /// No usable `GAZE_COORDS` message: without the screen resolution the
    /// display halves cannot be constructed, so the file is unusable.
    #[display("screen resolution not found (no usable GAZE_COORDS message)")]
    ResolutionNotFound,
}

/// Scans a session log for the sampling rate and screen resolution.
///
/// The scan stops as soon as both have been found; both messages appear
/// once near the top of a well-formed log. A missing or unreadable `RATE`
/// message keeps `default_interval_ms` (with a diagnostic in the
/// unreadable case). `source` only labels diagnostics.
///
/// # Errors
///
/// Returns [`MetadataError::ResolutionNotFound`] if no `GAZE_COORDS`
/// message yields a resolution; the caller skips the file and continues.
pub fn read_metadata<'a, I>(
    source: &str,
    lines: I,
    default_interval_ms: f64,
) -> Result<SessionMetadata, MetadataError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut interval = default_interval_ms;
    let mut found_rate = false;
    let mut screen: Option<Screen> = None;

    for line in lines {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.first() != Some(&"MSG") {
            continue;
        }

        if parts.get(3) == Some(&"RATE") {
            match parts.get(4).and_then(|token| token.parse::<f64>().ok()) {
                Some(hz) if hz > 0.0 => {
                    interval = 1000.0 / hz;
                    found_rate = true;
                }
                _ => eprintln!(
                    "warning: {source}: unreadable RATE message; \
                     keeping the default interval ({default_interval_ms} ms)"
                ),
            }
        } else if parts.get(2) == Some(&"GAZE_COORDS") {
            let max_x = parts.get(5).and_then(|token| token.parse::<f64>().ok());
            let max_y = parts.get(6).and_then(|token| token.parse::<f64>().ok());
            match (max_x, max_y) {
                (Some(max_x), Some(max_y)) if max_x != 0.0 && max_y != 0.0 => {
                    screen = Some(Screen::new(max_x, max_y));
                }
                _ => eprintln!("warning: {source}: unreadable GAZE_COORDS message"),
            }
        }

        if found_rate && screen.is_some() {
            break;
        }
    }

    let screen = screen.ok_or(MetadataError::ResolutionNotFound)?;
    Ok(SessionMetadata {
        sample_interval_ms: interval,
        screen,
    })
}

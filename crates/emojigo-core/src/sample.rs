//! Classifier output as discrete samples.
//!
//! The on-device classifier runs on its own schedule and may take longer
//! than a sample interval to answer, or not answer at all. Whatever drives it
//! only has to implement [`SampleSource`]; the engine sees plain
//! [`EmotionSample`] values.

use std::collections::VecDeque;
use std::io::BufRead;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// One classifier observation, stamped on the engine's game clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionSample {
    pub label: String,
    pub observed_at: Duration,
}

impl EmotionSample {
    pub fn new(label: impl Into<String>, observed_at: Duration) -> Self {
        Self {
            label: label.into(),
            observed_at,
        }
    }
}

/// Producer of classifier results.
pub trait SampleSource {
    /// Next sample observed at or before `now`, if one is ready.
    fn poll(&mut self, now: Duration) -> Option<EmotionSample>;
}

/// A silent classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSamples;

impl SampleSource for NoSamples {
    fn poll(&mut self, _now: Duration) -> Option<EmotionSample> {
        None
    }
}

/// Replays a fixed, time-ordered list of samples.
///
/// Script format, one sample per line:
///
/// ```text
/// # seconds  label
/// 0.5        happy
/// 1.0        happy
/// 1.5        -        # classifier returned nothing
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pending: VecDeque<EmotionSample>,
}

impl ScriptedSource {
    pub fn new<I: IntoIterator<Item = EmotionSample>>(samples: I) -> Self {
        let mut samples: Vec<_> = samples.into_iter().collect();
        samples.sort_by_key(|s| s.observed_at);
        Self {
            pending: samples.into(),
        }
    }

    /// Parse a script from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Script`] for a malformed line and
    /// [`CoreError::Io`] if reading fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut samples = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            if let Some(sample) = parse_line(idx + 1, &line?)? {
                samples.push(sample);
            }
        }
        Ok(Self::new(samples))
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FromStr for ScriptedSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}

impl SampleSource for ScriptedSource {
    fn poll(&mut self, now: Duration) -> Option<EmotionSample> {
        if self.pending.front()?.observed_at <= now {
            self.pending.pop_front()
        } else {
            None
        }
    }
}

fn parse_line(line: usize, raw: &str) -> Result<Option<EmotionSample>> {
    let content = raw.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(None);
    }
    let err = |message: String| CoreError::Script { line, message };

    let mut fields = content.split_whitespace();
    let (Some(at), Some(label), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(err(format!("expected '<seconds> <label>', got '{content}'")));
    };
    let secs: f64 = at
        .parse()
        .map_err(|_| err(format!("invalid timestamp '{at}'")))?;
    let observed_at =
        Duration::try_from_secs_f64(secs).map_err(|_| err(format!("invalid timestamp '{at}'")))?;

    if label == "-" {
        return Ok(None);
    }
    Ok(Some(EmotionSample::new(label, observed_at)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_and_skips_gaps() {
        let script = "# warmup\n0.5 happy\n\n1.0 - # nothing\n1.5 Fear\n";
        let src: ScriptedSource = script.parse().unwrap();
        assert_eq!(src.remaining(), 2);
    }

    #[test]
    fn poll_releases_samples_in_time_order() {
        let mut src = ScriptedSource::new([
            EmotionSample::new("fear", Duration::from_millis(1000)),
            EmotionSample::new("happy", Duration::from_millis(500)),
        ]);
        assert_eq!(src.poll(Duration::from_millis(400)), None);
        assert_eq!(
            src.poll(Duration::from_millis(1200)).map(|s| s.label),
            Some("happy".to_string())
        );
        assert_eq!(
            src.poll(Duration::from_millis(1200)).map(|s| s.label),
            Some("fear".to_string())
        );
        assert_eq!(src.poll(Duration::from_secs(10)), None);
        assert!(src.is_exhausted());
    }

    #[test]
    fn malformed_lines_report_line_number() {
        let err = "0.5 happy\nhappy\n".parse::<ScriptedSource>().unwrap_err();
        assert!(matches!(err, CoreError::Script { line: 2, .. }));

        let err = "soon happy\n".parse::<ScriptedSource>().unwrap_err();
        assert!(matches!(err, CoreError::Script { line: 1, .. }));

        let err = "-1 happy\n".parse::<ScriptedSource>().unwrap_err();
        assert!(matches!(err, CoreError::Script { line: 1, .. }));

        let err = "1 happy sad\n".parse::<ScriptedSource>().unwrap_err();
        assert!(matches!(err, CoreError::Script { line: 1, .. }));
    }

    #[test]
    fn silent_source_never_yields() {
        assert_eq!(NoSamples.poll(Duration::from_secs(100)), None);
    }
}

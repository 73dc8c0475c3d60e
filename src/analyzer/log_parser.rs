//! Parse log lines and extract structured `Sample` data.
//!
//! Supports the following log line formats:
//! - `Time: <t> W`, `TDP Power: <p> W`, `Board Power: <p> W`: one power
//!   sample spread over three consecutive lines
//! - `named_event: { name = "<n>", arg0 = <a>, arg1 = <b> }`: one event per line

use regex::Regex;
use std::sync::LazyLock;

use super::types::{NamedEvent, PowerSample, Sample};

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Time: ([\d.]+) W").expect("time pattern"));
static TDP_POWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TDP Power: ([\d.]+) W").expect("TDP power pattern"));
static BOARD_POWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Board Power: ([\d.]+) W").expect("board power pattern"));
static NAMED_EVENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"named_event:\s*\{\s*name\s*=\s*"([^"]*)"\s*,\s*arg0\s*=\s*(\d+)\s*,\s*arg1\s*=\s*(\d+)\s*\}"#)
        .expect("named event pattern")
});

/// A single power telemetry line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerLine {
    Time(f64),
    TdpPower(f64),
    BoardPower(f64),
}

/// Capture group 1 of `re` in `line`, parsed as a float.
fn capture_f64(re: &Regex, line: &str) -> Option<f64> {
    let text = re.captures(line)?.get(1)?.as_str();
    match text.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::debug!("Ignoring unparseable number {:?} in line: {}", text, line);
            None
        }
    }
}

/// Classify a line as one of the three power signals.
///
/// `Time:` is checked first, so a line carrying several signals counts as time.
pub fn parse_power_line(line: &str) -> Option<PowerLine> {
    if line.contains("Time:") {
        if let Some(time) = capture_f64(&TIME_RE, line) {
            return Some(PowerLine::Time(time));
        }
    }
    if line.contains("TDP Power:") {
        if let Some(power) = capture_f64(&TDP_POWER_RE, line) {
            return Some(PowerLine::TdpPower(power));
        }
    }
    if line.contains("Board Power:") {
        if let Some(power) = capture_f64(&BOARD_POWER_RE, line) {
            return Some(PowerLine::BoardPower(power));
        }
    }
    None
}

/// Parse a `named_event` line.
///
/// # Returns
///
/// `Some(event)` for a matching line, `None` otherwise (including arguments
/// that overflow `u64`).
pub fn parse_named_event(line: &str) -> Option<NamedEvent> {
    let caps = NAMED_EVENT_RE.captures(line)?;
    let name = caps.get(1)?.as_str().to_string();
    let arg0 = caps.get(2)?.as_str().parse().ok()?;
    let arg1 = caps.get(3)?.as_str().parse().ok()?;

    Some(NamedEvent { name, arg0, arg1 })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TripletState {
    Idle,
    HaveTime(f64),
    HaveTdp { time: f64, tdp_power: f64 },
}

/// Assembles Time / TDP Power / Board Power lines into `PowerSample`s.
///
/// The three signals must arrive in that order. A new `Time:` line restarts
/// the triplet; a power line arriving out of order drops the partial triplet.
#[derive(Debug)]
pub struct TripletAssembler {
    state: TripletState,
    discarded: usize,
}

impl TripletAssembler {
    pub fn new() -> Self {
        Self {
            state: TripletState::Idle,
            discarded: 0,
        }
    }

    /// Feed one classified line, returning a sample when a triplet closes.
    pub fn push(&mut self, line: PowerLine) -> Option<PowerSample> {
        let (next, sample) = match (self.state, line) {
            (state, PowerLine::Time(time)) => {
                if state != TripletState::Idle {
                    self.discarded += 1;
                }
                (TripletState::HaveTime(time), None)
            }
            (TripletState::HaveTime(time), PowerLine::TdpPower(tdp_power)) => (TripletState::HaveTdp { time, tdp_power }, None),
            (TripletState::HaveTdp { time, tdp_power }, PowerLine::BoardPower(board_power)) => (
                TripletState::Idle,
                Some(PowerSample {
                    time,
                    tdp_power,
                    board_power,
                }),
            ),
            (state, out_of_order) => {
                if state != TripletState::Idle {
                    log::debug!("Dropping partial power triplet on {:?}", out_of_order);
                    self.discarded += 1;
                }
                (TripletState::Idle, None)
            }
        };
        self.state = next;
        sample
    }

    /// Number of partial triplets dropped so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl Default for TripletAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateful parser over a whole log, yielding samples of both kinds.
#[derive(Debug, Default)]
pub struct LogParser {
    assembler: TripletAssembler,
    lines_seen: usize,
}

impl LogParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a log line.
    ///
    /// Named events are self-contained; power lines go through the triplet
    /// assembler and only produce a sample when the triplet closes.
    pub fn parse_line(&mut self, line: &str) -> Option<Sample> {
        self.lines_seen += 1;
        if let Some(event) = parse_named_event(line) {
            return Some(Sample::Event(event));
        }
        let power_line = parse_power_line(line)?;
        self.assembler.push(power_line).map(Sample::Power)
    }

    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    pub fn discarded_triplets(&self) -> usize {
        self.assembler.discarded()
    }
}

/// Extract all samples from a sequence of lines, in log order.
pub fn extract_samples<I, S>(lines: I) -> Vec<Sample>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = LogParser::new();
    let samples: Vec<Sample> = lines.into_iter().filter_map(|line| parser.parse_line(line.as_ref())).collect();
    log::debug!(
        "Extracted {} samples from {} lines ({} partial power triplets dropped)",
        samples.len(),
        parser.lines_seen(),
        parser.discarded_triplets()
    );
    samples
}

/// Keep only the power samples.
pub fn power_samples(samples: &[Sample]) -> Vec<PowerSample> {
    samples
        .iter()
        .filter_map(|sample| match sample {
            Sample::Power(power) => Some(*power),
            Sample::Event(_) => None,
        })
        .collect()
}

/// Keep only the named events.
pub fn named_events(samples: &[Sample]) -> Vec<NamedEvent> {
    samples
        .iter()
        .filter_map(|sample| match sample {
            Sample::Event(event) => Some(event.clone()),
            Sample::Power(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power(lines: &[&str]) -> Vec<PowerSample> {
        power_samples(&extract_samples(lines))
    }

    #[test]
    fn test_parse_triplet() {
        let samples = power(&["Time: 12.5 W", "TDP Power: 150.2 W", "Board Power: 160.8 W"]);
        assert_eq!(
            samples,
            vec![PowerSample {
                time: 12.5,
                tdp_power: 150.2,
                board_power: 160.8,
            }]
        );
    }

    #[test]
    fn test_triplet_with_noise_between_lines() {
        let samples = power(&[
            "[00:00:01.000] <inf> throttler: Time: 1.0 W",
            "unrelated line",
            "[00:00:01.000] <inf> throttler: TDP Power: 100.0 W",
            "[00:00:01.000] <inf> throttler: Board Power: 120.0 W",
        ]);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].time, 1.0);
        assert_eq!(samples[0].board_power, 120.0);
    }

    #[test]
    fn test_new_time_discards_incomplete_triplet() {
        let mut parser = LogParser::new();
        let lines = [
            "Time: 1.0 W",
            "TDP Power: 100.0 W",
            "Time: 2.0 W",
            "TDP Power: 110.0 W",
            "Board Power: 130.0 W",
        ];
        let samples: Vec<Sample> = lines.iter().filter_map(|l| parser.parse_line(l)).collect();

        assert_eq!(
            samples,
            vec![Sample::Power(PowerSample {
                time: 2.0,
                tdp_power: 110.0,
                board_power: 130.0,
            })]
        );
        assert_eq!(parser.discarded_triplets(), 1);
    }

    #[test]
    fn test_out_of_order_discards_triplet() {
        // Board before TDP
        assert!(power(&["Time: 1.0 W", "Board Power: 120.0 W", "TDP Power: 100.0 W"]).is_empty());
        // TDP repeated
        assert!(power(&["Time: 1.0 W", "TDP Power: 100.0 W", "TDP Power: 101.0 W", "Board Power: 120.0 W"]).is_empty());
        // Power lines without a time
        assert!(power(&["TDP Power: 100.0 W", "Board Power: 120.0 W"]).is_empty());
    }

    #[test]
    fn test_missing_board_power_emits_nothing() {
        assert!(power(&["Time: 1.0 W", "TDP Power: 100.0 W"]).is_empty());
    }

    #[test]
    fn test_consecutive_triplets() {
        let samples = power(&[
            "Time: 1.0 W",
            "TDP Power: 100.0 W",
            "Board Power: 120.0 W",
            "Time: 2.0 W",
            "TDP Power: 101.0 W",
            "Board Power: 121.0 W",
        ]);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].time, 2.0);
    }

    #[test]
    fn test_malformed_number_is_ignored() {
        assert_eq!(parse_power_line("Time: 1.2.3 W"), None);
        assert_eq!(parse_power_line("Time: . W"), None);
        assert_eq!(parse_power_line("TDP Power: 7 W"), Some(PowerLine::TdpPower(7.0)));
    }

    #[test]
    fn test_parse_named_event() {
        let event = parse_named_event(r#"named_event: { name = "1", arg0 = 42, arg1 = 7 }"#).unwrap();
        assert_eq!(
            event,
            NamedEvent {
                name: "1".to_string(),
                arg0: 42,
                arg1: 7,
            }
        );
    }

    #[test]
    fn test_parse_named_event_with_prefix_and_spacing() {
        let line = r#"[00:00:03.125,000] <inf> update_throttler: named_event:{name="2",arg0=0,arg1=18446744073709551615}"#;
        let event = parse_named_event(line).unwrap();
        assert_eq!(event.name, "2");
        assert_eq!(event.arg0, 0);
        assert_eq!(event.arg1, u64::MAX);
    }

    #[test]
    fn test_named_event_overflow_and_mismatch() {
        assert!(parse_named_event(r#"named_event: { name = "1", arg0 = 18446744073709551616, arg1 = 7 }"#).is_none());
        assert!(parse_named_event(r#"named_event: { name = "1", arg0 = -4, arg1 = 7 }"#).is_none());
        assert!(parse_named_event(r#"named_event: { name = "1", arg0 = 4 }"#).is_none());
        assert!(parse_named_event("This is not a valid log line").is_none());
    }

    #[test]
    fn test_one_sample_per_matching_event_line() {
        let lines = [
            r#"named_event: { name = "1", arg0 = 1, arg1 = 2 }"#,
            "noise",
            r#"named_event: { name = "2", arg0 = 3, arg1 = 4 }"#,
            "",
            r#"named_event: { name = "1", arg0 = 5, arg1 = 6 }"#,
        ];
        let events = named_events(&extract_samples(lines));
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].arg0, 5);
    }

    #[test]
    fn test_mixed_log_keeps_order_and_kinds() {
        let lines = [
            "Time: 1.0 W",
            r#"named_event: { name = "1", arg0 = 1, arg1 = 2 }"#,
            "TDP Power: 100.0 W",
            "Board Power: 120.0 W",
        ];
        let samples = extract_samples(lines);
        assert_eq!(samples.len(), 2);
        assert!(matches!(samples[0], Sample::Event(_)));
        assert!(matches!(samples[1], Sample::Power(_)));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let lines = ["Time: 3.0 W", "TDP Power: 1.0 W", "Board Power: 2.0 W"];
        assert_eq!(extract_samples(lines), extract_samples(lines));
    }

    #[test]
    fn test_empty_input_yields_no_samples() {
        let lines: [&str; 0] = [];
        assert!(extract_samples(lines).is_empty());
    }
}

//! Frame sources
//!
//! Landmark detection happens upstream; a source only hands over per-frame
//! landmarks, or the absence of a detection.

use crate::MonitorError;
use cognitive_state::{FrameObservation, LandmarkSet, Point2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Source of frames for the polling loop
pub trait FrameSource {
    /// Next frame, or `None` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<FrameObservation>, MonitorError>;
}

/// Wire format of one frame (one JSON object per line)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub landmarks: Option<Vec<Point2>>,
}

impl FrameRecord {
    /// Malformed landmark sets become missed detections
    pub fn into_observation(self) -> FrameObservation {
        let Some(points) = self.landmarks else {
            return FrameObservation::missing(self.timestamp_ms);
        };
        match LandmarkSet::new(points) {
            Ok(set) => FrameObservation::detected(self.timestamp_ms, set),
            Err(e) => {
                debug!(timestamp_ms = self.timestamp_ms, error = %e, "Dropping landmarks");
                FrameObservation::missing(self.timestamp_ms)
            }
        }
    }
}

/// JSON Lines frame reader
pub struct JsonLinesSource<R> {
    reader: R,
    line: Vec<u8>,
    line_no: u64,
    last_timestamp_ms: u64,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            line_no: 0,
            last_timestamp_ms: 0,
        }
    }
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, MonitorError> {
        info!("Reading frames from {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameObservation>, MonitorError> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let text = match std::str::from_utf8(&self.line) {
                Ok(text) => text.trim(),
                Err(e) => {
                    warn!(line = self.line_no, error = %e, "Frame is not valid UTF-8");
                    return Ok(Some(FrameObservation::missing(self.last_timestamp_ms)));
                }
            };
            if text.is_empty() {
                continue;
            }

            return Ok(Some(match serde_json::from_str::<FrameRecord>(text) {
                Ok(record) => {
                    self.last_timestamp_ms = record.timestamp_ms;
                    record.into_observation()
                }
                Err(e) => {
                    // Treated as a frame where detection failed
                    warn!(line = self.line_no, error = %e, "Unparseable frame");
                    FrameObservation::missing(self.last_timestamp_ms)
                }
            }));
        }
    }
}

/// In-memory frames
pub struct VecSource {
    frames: std::vec::IntoIter<FrameObservation>,
}

impl VecSource {
    pub fn new(frames: Vec<FrameObservation>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> Result<Option<FrameObservation>, MonitorError> {
        Ok(self.frames.next())
    }
}

//! Line framing in front of a [`LogSink`]: optional prefix and timestamp
//! header, one newline-terminated line per record.

use crate::sink::LogSink;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;
use std::sync::Arc;

/// Header options for each written line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineFlags(u8);

impl LineFlags {
    /// No header at all; the line is the prefix followed by the payload.
    pub const NONE: LineFlags = LineFlags(0);
    /// `2009/01/23 `
    pub const DATE: LineFlags = LineFlags(1);
    /// `01:23:23 `
    pub const TIME: LineFlags = LineFlags(1 << 1);
    /// `01:23:23.123123 `, implies TIME.
    pub const MICROSECONDS: LineFlags = LineFlags(1 << 2);
    /// Render date and time in UTC instead of the local zone.
    pub const UTC: LineFlags = LineFlags(1 << 3);
    /// Put the prefix right before the payload instead of at line start.
    pub const MSG_PREFIX: LineFlags = LineFlags(1 << 4);
    /// `DATE | TIME`
    pub const STD: LineFlags = LineFlags(1 | 1 << 1);

    pub const fn contains(self, other: LineFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    fn has_time(self) -> bool {
        self.contains(Self::TIME) || self.contains(Self::MICROSECONDS)
    }
}

impl BitOr for LineFlags {
    type Output = LineFlags;

    fn bitor(self, rhs: LineFlags) -> LineFlags {
        LineFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for LineFlags {
    fn bitor_assign(&mut self, rhs: LineFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for LineFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(LineFlags, &str); 5] = [
            (LineFlags::DATE, "DATE"),
            (LineFlags::TIME, "TIME"),
            (LineFlags::MICROSECONDS, "MICROSECONDS"),
            (LineFlags::UTC, "UTC"),
            (LineFlags::MSG_PREFIX, "MSG_PREFIX"),
        ];
        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            f.write_str("LineFlags(NONE)")
        } else {
            write!(f, "LineFlags({})", set.join(" | "))
        }
    }
}

/// Error returned when a flag list names an unknown flag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown line flag: {0:?}")]
pub struct ParseFlagsError(pub String);

impl FromStr for LineFlags {
    type Err = ParseFlagsError;

    /// Parse a comma or `|` separated list such as `"date,time,utc"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = LineFlags::NONE;
        for name in s.split([',', '|']).map(str::trim).filter(|n| !n.is_empty()) {
            flags |= match name.to_ascii_lowercase().as_str() {
                "none" => LineFlags::NONE,
                "std" => LineFlags::STD,
                "date" => LineFlags::DATE,
                "time" => LineFlags::TIME,
                "microseconds" | "micro" => LineFlags::MICROSECONDS,
                "utc" => LineFlags::UTC,
                "msgprefix" | "msg_prefix" => LineFlags::MSG_PREFIX,
                _ => return Err(ParseFlagsError(name.to_string())),
            };
        }
        Ok(flags)
    }
}

/// Frames payloads into lines and hands each one to the sink in a single
/// write.
pub struct LineWriter {
    sink: Arc<dyn LogSink>,
    prefix: String,
    flags: LineFlags,
}

impl LineWriter {
    pub fn new(sink: Arc<dyn LogSink>, prefix: impl Into<String>, flags: LineFlags) -> Self {
        Self {
            sink,
            prefix: prefix.into(),
            flags,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn flags(&self) -> LineFlags {
        self.flags
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Write `payload` as one line. An empty payload writes nothing; sink
    /// failures are swallowed.
    pub fn print(&self, payload: &[u8]) {
        if payload.is_empty() {
            return;
        }
        let line = self.frame(Local::now(), payload);
        if let Err(e) = self.sink.write(&line) {
            tracing::debug!(target: crate::SELF_TARGET, error = %e, "log sink write failed");
        }
    }

    pub fn flush(&self) {
        if let Err(e) = self.sink.flush() {
            tracing::debug!(target: crate::SELF_TARGET, error = %e, "log sink flush failed");
        }
    }

    fn frame(&self, now: DateTime<Local>, payload: &[u8]) -> Vec<u8> {
        let mut line = Vec::with_capacity(self.prefix.len() + 32 + payload.len() + 1);
        if !self.flags.contains(LineFlags::MSG_PREFIX) {
            line.extend_from_slice(self.prefix.as_bytes());
        }
        if self.flags.contains(LineFlags::UTC) {
            self.header(&now.with_timezone(&Utc), &mut line);
        } else {
            self.header(&now, &mut line);
        }
        if self.flags.contains(LineFlags::MSG_PREFIX) {
            line.extend_from_slice(self.prefix.as_bytes());
        }
        line.extend_from_slice(payload);
        if line.last() != Some(&b'\n') {
            line.push(b'\n');
        }
        line
    }

    fn header<Tz: TimeZone>(&self, now: &DateTime<Tz>, out: &mut Vec<u8>)
    where
        Tz::Offset: fmt::Display,
    {
        if self.flags.contains(LineFlags::DATE) {
            out.extend_from_slice(now.format("%Y/%m/%d ").to_string().as_bytes());
        }
        if self.flags.contains(LineFlags::MICROSECONDS) {
            out.extend_from_slice(now.format("%H:%M:%S%.6f ").to_string().as_bytes());
        } else if self.flags.has_time() {
            out.extend_from_slice(now.format("%H:%M:%S ").to_string().as_bytes());
        }
    }
}

impl fmt::Debug for LineWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineWriter")
            .field("prefix", &self.prefix)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

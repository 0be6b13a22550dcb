//! Per-method history of recorded calls

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Timestamp wrapper for consistent time handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }
}

/// One recorded invocation of a mocked method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// 1-based position of the call since the count was last reset
    pub sequence: u64,

    /// When the call was recorded
    pub at: Timestamp,

    /// Captured arguments rendered as `name=value`
    pub arguments: Vec<String>,
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}({})", self.sequence, self.arguments.join(", "))
    }
}

/// Bounded, ordered call history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallHistory {
    records: VecDeque<CallRecord>,
    limit: Option<usize>,
}

impl CallHistory {
    /// Create an empty history keeping at most `limit` records
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
        }
    }

    /// Append a record, evicting the oldest one past the limit
    pub fn push(&mut self, record: CallRecord) {
        if self.limit == Some(0) {
            return;
        }
        self.records.push_back(record);
        if let Some(limit) = self.limit {
            while self.records.len() > limit {
                self.records.pop_front();
            }
        }
    }

    /// Recorded calls, oldest first
    pub fn records(&self) -> impl Iterator<Item = &CallRecord> {
        self.records.iter()
    }

    /// Most recent call
    pub fn last(&self) -> Option<&CallRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sequence: u64) -> CallRecord {
        CallRecord {
            sequence,
            at: Timestamp::from_nanos(sequence as i64 * 10),
            arguments: vec![format!("x={}", sequence)],
        }
    }

    #[test]
    fn test_history_limit_evicts_oldest() {
        let mut history = CallHistory::new(Some(2));
        history.push(record(1));
        history.push(record(2));
        history.push(record(3));

        let sequences: Vec<_> = history.records().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![2, 3]);
        assert_eq!(history.last().unwrap().sequence, 3);
    }

    #[test]
    fn test_zero_limit_keeps_nothing() {
        let mut history = CallHistory::new(Some(0));
        history.push(record(1));
        assert!(history.is_empty());
    }

    #[test]
    fn test_history_json() {
        let mut history = CallHistory::new(None);
        history.push(record(1));

        let json = history.to_json().unwrap();
        let restored: Vec<CallRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, vec![record(1)]);
    }

    #[test]
    fn test_timestamp_ordering() {
        let t1 = Timestamp::from_nanos(100);
        let t2 = Timestamp::from_nanos(200);
        assert!(t1 < t2);
        assert_eq!(t1.as_nanos(), 100);
        assert_eq!(record(4).to_string(), "#4(x=4)");
    }
}

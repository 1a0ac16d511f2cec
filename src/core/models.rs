//! Statistics and export records.
//!
//! - [`ConversationStats`]: running totals for one address
//! - [`ConversationTable`]: address → stats, built by the aggregator
//! - [`ExportRecord`]: one formatted transcript line, built by the exporter

use std::collections::HashMap;
use std::collections::hash_map;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::MalformedKind;
use crate::message::{Direction, SmsMessage};

/// Display name used while no non-empty contact name has been seen.
pub const UNKNOWN_CONTACT: &str = "(Unknown)";

/// Timestamp layout used in transcripts.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts epoch milliseconds to local time.
pub fn local_datetime(timestamp_ms: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|dt| dt.with_timezone(&Local))
}

/// Per-address message statistics.
///
/// Counts only grow and the date bounds only widen while a pass runs.
/// `count == sent + received` and `first_date <= last_date` always hold for
/// records obtained from a [`ConversationTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStats {
    pub count: u64,
    pub sent: u64,
    pub received: u64,

    /// First real contact name seen for this address. Backups write the
    /// `"(Unknown)"` placeholder for unsaved numbers; it never counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub contact_name: Option<String>,

    /// Earliest timestamp (ms).
    pub first_date: i64,

    /// Latest timestamp (ms).
    pub last_date: i64,
}

impl ConversationStats {
    /// Zero counts, inverted bounds. Only ever observed after one `record`.
    fn empty() -> Self {
        Self {
            count: 0,
            sent: 0,
            received: 0,
            contact_name: None,
            first_date: i64::MAX,
            last_date: i64::MIN,
        }
    }

    fn record(&mut self, contact_name: Option<String>, timestamp: i64, direction: Direction) {
        self.count += 1;
        match direction {
            Direction::Sent => self.sent += 1,
            Direction::Received => self.received += 1,
        }

        if self.contact_name.is_none() {
            self.contact_name = contact_name.filter(|name| !name.is_empty() && name != UNKNOWN_CONTACT);
        }

        self.first_date = self.first_date.min(timestamp);
        self.last_date = self.last_date.max(timestamp);
    }

    /// Contact name, or `"(Unknown)"` if none was ever seen.
    pub fn display_name(&self) -> &str {
        self.contact_name.as_deref().unwrap_or(UNKNOWN_CONTACT)
    }

    pub fn first_datetime(&self) -> Option<DateTime<Local>> {
        local_datetime(self.first_date)
    }

    pub fn last_datetime(&self) -> Option<DateTime<Local>> {
        local_datetime(self.last_date)
    }

    /// Local calendar dates of the first and last message.
    ///
    /// Exporting this range returns every message of the conversation.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((
            self.first_datetime()?.date_naive(),
            self.last_datetime()?.date_naive(),
        ))
    }
}

/// Statistics for every address in a backup.
///
/// Entries are inserted on the first message for an address and mutated in
/// place afterwards; there is no implicit defaulting on lookup.
///
/// # Example
///
/// ```
/// use smsslicer::core::ConversationTable;
/// use smsslicer::{Direction, SmsMessage};
///
/// let mut table = ConversationTable::new();
/// table.record(SmsMessage::new("A", 1000, Direction::Sent));
/// table.record(SmsMessage::new("A", 500, Direction::Received));
/// table.record(SmsMessage::new("B", 700, Direction::Received));
///
/// let a = table.get("A").unwrap();
/// assert_eq!((a.count, a.sent, a.received), (2, 1, 1));
/// assert_eq!((a.first_date, a.last_date), (500, 1000));
/// assert_eq!(table.total_messages(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationTable {
    conversations: HashMap<String, ConversationStats>,
}

impl ConversationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one message into the table.
    pub fn record(&mut self, msg: SmsMessage) {
        let SmsMessage {
            address,
            contact_name,
            timestamp,
            direction,
            ..
        } = msg;

        self.conversations
            .entry(address)
            .or_insert_with(ConversationStats::empty)
            .record(contact_name, timestamp, direction);
    }

    /// Folds a batch of messages into the table.
    pub fn record_batch(&mut self, messages: impl IntoIterator<Item = SmsMessage>) {
        for msg in messages {
            self.record(msg);
        }
    }

    pub fn get(&self, address: &str) -> Option<&ConversationStats> {
        self.conversations.get(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.conversations.contains_key(address)
    }

    /// Number of distinct addresses.
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, ConversationStats> {
        self.conversations.iter()
    }

    /// Sum of `count` over all addresses.
    pub fn total_messages(&self) -> u64 {
        self.conversations.values().map(|stats| stats.count).sum()
    }

    /// The `n` busiest conversations, most messages first.
    ///
    /// Ties are ordered by address so the result is deterministic.
    pub fn top_by_count(&self, n: usize) -> Vec<(&str, &ConversationStats)> {
        let mut entries: Vec<_> = self
            .conversations
            .iter()
            .map(|(address, stats)| (address.as_str(), stats))
            .collect();
        entries.sort_by(|(a_addr, a), (b_addr, b)| b.count.cmp(&a.count).then_with(|| a_addr.cmp(b_addr)));
        entries.truncate(n);
        entries
    }

    /// Returns the plain address → stats mapping.
    pub fn into_inner(self) -> HashMap<String, ConversationStats> {
        self.conversations
    }
}

impl From<ConversationTable> for HashMap<String, ConversationStats> {
    fn from(table: ConversationTable) -> Self {
        table.conversations
    }
}

impl IntoIterator for ConversationTable {
    type Item = (String, ConversationStats);
    type IntoIter = hash_map::IntoIter<String, ConversationStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.conversations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConversationTable {
    type Item = (&'a String, &'a ConversationStats);
    type IntoIter = hash_map::Iter<'a, String, ConversationStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.conversations.iter()
    }
}

/// One line of an exported transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub direction: Direction,
    pub body: String,
    /// Sort key (epoch ms).
    pub raw_timestamp: i64,
}

impl ExportRecord {
    /// Formats a message for export.
    ///
    /// Fails only if the timestamp is outside chrono's representable range.
    pub fn from_message(msg: SmsMessage) -> Result<Self, MalformedKind> {
        let timestamp = local_datetime(msg.timestamp)
            .ok_or(MalformedKind::TimestampOutOfRange(msg.timestamp))?
            .format(TIMESTAMP_FORMAT)
            .to_string();

        Ok(Self {
            timestamp,
            direction: msg.direction,
            body: msg.body,
            raw_timestamp: msg.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn msg(address: &str, ts: i64, direction: Direction, name: &str) -> SmsMessage {
        SmsMessage::new(address, ts, direction).with_contact_name(name)
    }

    #[test]
    fn test_record_creates_entry_lazily() {
        let mut table = ConversationTable::new();
        assert!(table.get("A").is_none());

        table.record(msg("A", 10, Direction::Sent, ""));
        let stats = table.get("A").unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.sent, 1);
        assert_eq!(stats.received, 0);
        assert_eq!(stats.first_date, 10);
        assert_eq!(stats.last_date, 10);
    }

    #[test]
    fn test_first_non_empty_name_wins() {
        let mut table = ConversationTable::new();
        table.record(msg("A", 1, Direction::Received, ""));
        assert_eq!(table.get("A").unwrap().display_name(), UNKNOWN_CONTACT);
        assert!(table.get("A").unwrap().contact_name.is_none());

        table.record(msg("A", 2, Direction::Received, "Alice"));
        table.record(msg("A", 3, Direction::Received, "Alicia"));
        table.record(msg("A", 4, Direction::Received, ""));
        assert_eq!(table.get("A").unwrap().display_name(), "Alice");
    }

    #[test]
    fn test_placeholder_name_is_not_stored() {
        let mut table = ConversationTable::new();
        table.record(msg("A", 1, Direction::Received, UNKNOWN_CONTACT));
        assert!(table.get("A").unwrap().contact_name.is_none());

        table.record(msg("A", 2, Direction::Received, "Bob"));
        assert_eq!(table.get("A").unwrap().contact_name.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_date_bounds_widen() {
        let mut table = ConversationTable::new();
        table.record_batch([
            msg("A", 1000, Direction::Sent, ""),
            msg("A", 500, Direction::Received, ""),
            msg("A", 1500, Direction::Sent, ""),
        ]);
        let stats = table.get("A").unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.received, 1);
        assert_eq!(stats.first_date, 500);
        assert_eq!(stats.last_date, 1500);
    }

    #[test]
    fn test_top_by_count_orders_and_breaks_ties() {
        let mut table = ConversationTable::new();
        for (address, n) in [("C", 2), ("A", 2), ("B", 5), ("D", 1)] {
            for i in 0..n {
                table.record(msg(address, i, Direction::Received, ""));
            }
        }

        let top: Vec<&str> = table.top_by_count(3).into_iter().map(|(a, _)| a).collect();
        assert_eq!(top, vec!["B", "A", "C"]);
        assert_eq!(table.top_by_count(10).len(), 4);
    }

    #[test]
    fn test_total_messages() {
        let mut table = ConversationTable::new();
        assert_eq!(table.total_messages(), 0);
        table.record(msg("A", 1, Direction::Sent, ""));
        table.record(msg("B", 1, Direction::Sent, ""));
        assert_eq!(table.total_messages(), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_date_span_is_local() {
        let first = Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let last = Local.with_ymd_and_hms(2024, 3, 5, 21, 0, 0).unwrap();

        let mut table = ConversationTable::new();
        table.record(msg("A", first.timestamp_millis(), Direction::Sent, ""));
        table.record(msg("A", last.timestamp_millis(), Direction::Sent, ""));

        let (start, end) = table.get("A").unwrap().date_span().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_export_record_formats_local_time() {
        let dt = Local.with_ymd_and_hms(2024, 6, 15, 12, 30, 5).unwrap();
        let record = ExportRecord::from_message(
            SmsMessage::new("A", dt.timestamp_millis() + 999, Direction::Received).with_body("hi"),
        )
        .unwrap();
        assert_eq!(record.timestamp, "2024-06-15 12:30:05");
        assert_eq!(record.direction, Direction::Received);
        assert_eq!(record.body, "hi");
    }

    #[test]
    fn test_export_record_out_of_range() {
        let result = ExportRecord::from_message(SmsMessage::new("A", i64::MAX, Direction::Sent));
        assert!(matches!(result, Err(MalformedKind::TimestampOutOfRange(_))));
    }

    #[test]
    fn test_table_serializes_as_plain_map() {
        let mut table = ConversationTable::new();
        table.record(msg("A", 1, Direction::Sent, "Alice"));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["A"]["count"], 1);
        assert_eq!(json["A"]["contact_name"], "Alice");
    }
}

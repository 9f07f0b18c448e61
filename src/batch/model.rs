//! Message batch records as returned by `/v1.1/messagebatches`.
//!
//! Field bindings are declared on the types themselves: attributes are bound with an `@` prefix,
//! child elements by their local name.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use time::OffsetDateTime;

use crate::common::serde::{status_counts, utc_timestamp};

/// Delivery status names a batch reports counts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusKind {
    Acknowledged,
    AuthorisationFailed,
    Connecting,
    Delivered,
    Failed,
    PartiallyDelivered,
    Rejected,
    Scheduled,
    Sent,
    Submitted,
    ValidityPeriodExpired,
    Cancelled,
}

impl StatusKind {
    /// Every status, in the order the server lists them.
    pub const ALL: [StatusKind; 12] = [
        StatusKind::Acknowledged,
        StatusKind::AuthorisationFailed,
        StatusKind::Connecting,
        StatusKind::Delivered,
        StatusKind::Failed,
        StatusKind::PartiallyDelivered,
        StatusKind::Rejected,
        StatusKind::Scheduled,
        StatusKind::Sent,
        StatusKind::Submitted,
        StatusKind::ValidityPeriodExpired,
        StatusKind::Cancelled,
    ];

    /// The element name used for this status inside `<status>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Acknowledged => "acknowledged",
            StatusKind::AuthorisationFailed => "authorisationfailed",
            StatusKind::Connecting => "connecting",
            StatusKind::Delivered => "delivered",
            StatusKind::Failed => "failed",
            StatusKind::PartiallyDelivered => "partiallydelivered",
            StatusKind::Rejected => "rejected",
            StatusKind::Scheduled => "scheduled",
            StatusKind::Sent => "sent",
            StatusKind::Submitted => "submitted",
            StatusKind::ValidityPeriodExpired => "validityperiodexpired",
            StatusKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message batch, as listed in a collection or fetched on its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchSummary {
    /// Batch identifier.
    #[serde(rename = "@id")]
    pub id: String,

    /// Resource URI of the batch.
    #[serde(rename = "@uri")]
    pub uri: String,

    /// Creation time, in UTC.
    #[serde(rename = "createdat", deserialize_with = "utc_timestamp::deserialize")]
    pub created_at: OffsetDateTime,

    /// Number of messages submitted in the batch.
    #[serde(rename = "batchsize")]
    pub batch_size: u32,

    /// Number of messages the server persisted.
    #[serde(rename = "persistedbatchsize")]
    pub persisted_batch_size: u32,

    /// Message counts keyed by status name. Statuses with no messages are absent.
    #[serde(default, deserialize_with = "status_counts::deserialize")]
    pub status: BTreeMap<String, u32>,

    #[serde(rename = "accountreference", default)]
    pub account_reference: String,

    /// Login of the user who created the batch.
    #[serde(rename = "createdby", default)]
    pub created_by: String,

    #[serde(default)]
    pub name: String,
}

/// A single batch fetched by id. Same shape as a listed batch.
pub type BatchDetail = BatchSummary;

impl BatchSummary {
    /// Number of messages currently in `kind`, zero when the server reported none.
    pub fn status_count(&self, kind: StatusKind) -> u32 {
        self.status.get(kind.as_str()).copied().unwrap_or(0)
    }

    /// Counts for every known status, including zeros, in server order.
    pub fn total_by_status(&self) -> Vec<(StatusKind, u32)> {
        StatusKind::ALL
            .iter()
            .map(|kind| (*kind, self.status_count(*kind)))
            .collect()
    }
}

/// One page of the batch collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchPage {
    /// Zero-based offset of the first batch in this page.
    #[serde(rename = "@startindex")]
    pub start_index: u32,

    /// Number of batches in this page.
    #[serde(rename = "@count")]
    pub count: u32,

    /// Number of batches across all pages.
    #[serde(rename = "@totalcount")]
    pub total_count: u32,

    /// Batches in server order.
    #[serde(rename = "messagebatch", default)]
    pub batches: Vec<BatchSummary>,
}

impl BatchPage {
    /// True when no batches exist beyond this page.
    pub fn is_last(&self) -> bool {
        self.batches.is_empty()
            || u64::from(self.start_index) + self.batches.len() as u64
                >= u64::from(self.total_count)
    }

    /// Paging that requests the page following this one, given the `requested` paging that
    /// produced it. `None` once the collection is exhausted.
    ///
    /// The offset advances from what was requested, not from the `startindex` the server echoes
    /// back, which may differ.
    pub fn next_paging(&self, requested: Paging) -> Option<Paging> {
        if self.batches.is_empty() {
            return None;
        }
        let seen = u32::try_from(self.batches.len()).ok()?;
        let start_index = requested.start_index.checked_add(seen)?;
        if start_index >= self.total_count {
            return None;
        }
        Some(Paging::new(start_index, requested.count))
    }
}

/// Selects a slice of the batch collection via the `startindex` and `count` query parameters.
///
/// Without paging the server applies its own default page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub start_index: u32,
    pub count: u32,
}

impl Paging {
    pub fn new(start_index: u32, count: u32) -> Self {
        Self { start_index, count }
    }

    /// The first page of `count` batches.
    pub fn first(count: u32) -> Self {
        Self::new(0, count)
    }

    pub(crate) fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("startindex", self.start_index.to_string()),
            ("count", self.count.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::from_xml;
    use time::macros::datetime;

    const BATCH: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<messagebatch id="messagebatchid" uri="messagebatchuri" xmlns="http://api.esendex.com/ns/">
 <createdat>2012-01-01T12:00:00Z</createdat>
 <batchsize>1</batchsize>
 <persistedbatchsize>1</persistedbatchsize>
 <status>
  <acknowledged>0</acknowledged>
  <authorisationfailed>0</authorisationfailed>
  <connecting>0</connecting>
  <delivered>0</delivered>
  <failed>0</failed>
  <partiallydelivered>0</partiallydelivered>
  <rejected>0</rejected>
  <scheduled>0</scheduled>
  <sent>0</sent>
  <submitted>1</submitted>
  <validityperiodexpired>0</validityperiodexpired>
  <cancelled>0</cancelled>
 </status>
 <accountreference>EXHEYEYE</accountreference>
 <createdby>efiwewe@example.com</createdby>
 <name>my cool batch</name>
</messagebatch>"#;

    fn page(start_index: u32, count: u32, total_count: u32, batches: usize) -> BatchPage {
        let batch: BatchSummary = from_xml(BATCH).unwrap();
        BatchPage {
            start_index,
            count,
            total_count,
            batches: vec![batch; batches],
        }
    }

    #[test]
    fn test_batch_field_mapping() {
        let batch: BatchDetail = from_xml(BATCH).unwrap();

        assert_eq!(batch.id, "messagebatchid");
        assert_eq!(batch.uri, "messagebatchuri");
        assert_eq!(batch.created_at, datetime!(2012-01-01 12:00:00 UTC));
        assert_eq!(batch.batch_size, 1);
        assert_eq!(batch.persisted_batch_size, 1);
        assert_eq!(batch.status, BTreeMap::from([("submitted".to_string(), 1)]));
        assert_eq!(batch.account_reference, "EXHEYEYE");
        assert_eq!(batch.created_by, "efiwewe@example.com");
        assert_eq!(batch.name, "my cool batch");
    }

    #[test]
    fn test_status_count_covers_omitted_statuses() {
        let batch: BatchSummary = from_xml(BATCH).unwrap();

        assert_eq!(batch.status_count(StatusKind::Submitted), 1);
        assert_eq!(batch.status_count(StatusKind::Delivered), 0);

        let totals = batch.total_by_status();
        assert_eq!(totals.len(), 12);
        assert_eq!(totals[0], (StatusKind::Acknowledged, 0));
        assert_eq!(totals[9], (StatusKind::Submitted, 1));
    }

    #[test]
    fn test_status_keeps_unknown_names() {
        let xml = BATCH.replace(
            "<cancelled>0</cancelled>",
            "<cancelled>0</cancelled><expired>3</expired>",
        );
        let batch: BatchSummary = from_xml(&xml).unwrap();
        assert_eq!(batch.status.get("expired"), Some(&3));
    }

    #[test]
    fn test_missing_status_block_is_empty() {
        let start = BATCH.find("<status>").unwrap();
        let end = BATCH.find("</status>").unwrap() + "</status>".len();
        let xml = format!("{}{}", &BATCH[..start], &BATCH[end..]);

        let batch: BatchSummary = from_xml(&xml).unwrap();
        assert!(batch.status.is_empty());
    }

    #[test]
    fn test_created_at_is_normalised_to_utc() {
        let xml = BATCH.replace("2012-01-01T12:00:00Z", "2012-01-01T14:00:00+02:00");
        let batch: BatchSummary = from_xml(&xml).unwrap();

        assert_eq!(batch.created_at, datetime!(2012-01-01 12:00:00 UTC));
        assert!(batch.created_at.offset().is_utc());
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let xml = BATCH.replace("2012-01-01T12:00:00Z", "yesterday");
        assert!(from_xml::<BatchSummary>(&xml).is_err());
    }

    #[test]
    fn test_non_integer_batch_size_is_rejected() {
        let xml = BATCH.replace("<batchsize>1</batchsize>", "<batchsize>one</batchsize>");
        assert!(from_xml::<BatchSummary>(&xml).is_err());
    }

    #[test]
    fn test_negative_status_count_is_rejected() {
        let xml = BATCH.replace("<sent>0</sent>", "<sent>-2</sent>");
        assert!(from_xml::<BatchSummary>(&xml).is_err());
    }

    #[test]
    fn test_empty_page() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<messagebatches startindex="4" count="10" totalcount="200" xmlns="http://api.esendex.com/ns/">
</messagebatches>"#;

        let page: BatchPage = from_xml(xml).unwrap();
        assert_eq!(page.start_index, 4);
        assert_eq!(page.count, 10);
        assert_eq!(page.total_count, 200);
        assert!(page.batches.is_empty());
        assert!(page.is_last());
    }

    #[test]
    fn test_page_preserves_document_order() {
        let first = BATCH
            .trim_start_matches(r#"<?xml version="1.0" encoding="utf-8"?>"#)
            .replace(r#" xmlns="http://api.esendex.com/ns/""#, "");
        let second = first.replace("messagebatchid", "second");
        let xml = format!(
            r#"<messagebatches startindex="0" count="2" totalcount="2" xmlns="http://api.esendex.com/ns/">{first}{second}</messagebatches>"#
        );

        let page: BatchPage = from_xml(&xml).unwrap();
        let ids: Vec<&str> = page.batches.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["messagebatchid", "second"]);
    }

    #[test]
    fn test_next_paging() {
        assert_eq!(page(0, 2, 5, 2).next_paging(Paging::new(0, 2)), Some(Paging::new(2, 2)));
        assert_eq!(page(2, 2, 5, 2).next_paging(Paging::new(2, 2)), Some(Paging::new(4, 2)));
        assert_eq!(page(4, 2, 5, 1).next_paging(Paging::new(4, 2)), None);
        assert_eq!(page(0, 0, 5, 0).next_paging(Paging::new(0, 2)), None);
    }

    #[test]
    fn test_next_paging_advances_from_requested_offset() {
        // Server echoes startindex 4 for a request at 5.
        assert_eq!(page(4, 2, 10, 2).next_paging(Paging::new(5, 2)), Some(Paging::new(7, 2)));
        assert_eq!(page(0, 2, 3, 2).next_paging(Paging::new(2, 2)), None);
    }

    #[test]
    fn test_next_paging_keeps_requested_count() {
        assert_eq!(page(0, 0, 5, 1).next_paging(Paging::new(0, 3)), Some(Paging::new(1, 3)));
    }

    #[test]
    fn test_paging_query_pairs() {
        let pairs = Paging::new(5, 10).query_pairs();
        assert_eq!(pairs[0], ("startindex", "5".to_string()));
        assert_eq!(pairs[1], ("count", "10".to_string()));
        assert_eq!(Paging::first(20), Paging::new(0, 20));
    }
}

/// Deserializes a `<status>` block into a map of status name to message count.
///
/// Zero counts are dropped: the server lists every status, but only the non-zero ones carry
/// information.
pub(crate) mod status_counts {
    use serde::{Deserialize, Deserializer};
    use std::collections::BTreeMap;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let counts = BTreeMap::<String, u32>::deserialize(deserializer)?;
        Ok(counts.into_iter().filter(|(_, count)| *count != 0).collect())
    }
}

/// RFC 3339 timestamps normalised to UTC.
pub(crate) mod utc_timestamp {
    use serde::Deserializer;
    use time::{OffsetDateTime, UtcOffset};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        time::serde::rfc3339::deserialize(deserializer).map(|value| value.to_offset(UtcOffset::UTC))
    }
}

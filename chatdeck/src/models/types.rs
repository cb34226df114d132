use serde::{Deserialize, Serialize};

/// Wall clock timestamp stored as milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(pub chrono::DateTime<chrono::Utc>);

impl DateTime {
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis).map(Self)
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.millis())
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        let millis = i64::deserialize(deserializer)?;
        Self::from_millis(millis).ok_or(Error::custom("cannot deserialize DateTime from millis"))
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One of the two named partitions of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    /// Jobs still generating, keyed by original URL.
    Pending,
    /// Finished jobs, keyed by short code.
    Completed,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Pending => "pending",
            Table::Completed => "completed",
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shortening job's lifecycle state.
///
/// The same job lives in [`Table::Pending`] under its original URL while the
/// short code is being generated, and in [`Table::Completed`] under the final
/// short code afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The input URL.
    pub original: String,
    /// The generated code; grows one character at a time while pending.
    pub short_code: String,
    /// Whether a consumer has acknowledged the completed result.
    #[serde(default)]
    pub ack: bool,
    /// Fraction of the code generated, in `[0, 1]`.
    #[serde(default)]
    pub progress: f64,
    /// Fully-qualified short URL, only set on completed records.
    #[serde(
        rename = "shortenedURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub shortened_url: Option<String>,
}

impl Record {
    /// A freshly accepted job with no code characters yet.
    pub fn pending(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            short_code: String::new(),
            ack: false,
            progress: 0.0,
            shortened_url: None,
        }
    }

    /// Whether generation has finished for this record.
    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Returns a copy of this record with every field set in `patch` overwritten.
    pub fn patched(&self, patch: &RecordPatch) -> Self {
        let mut next = self.clone();
        if let Some(original) = &patch.original {
            next.original = original.clone();
        }
        if let Some(short_code) = &patch.short_code {
            next.short_code = short_code.clone();
        }
        if let Some(ack) = patch.ack {
            next.ack = ack;
        }
        if let Some(progress) = patch.progress {
            next.progress = progress;
        }
        if let Some(shortened_url) = &patch.shortened_url {
            next.shortened_url = Some(shortened_url.clone());
        }
        next
    }
}

/// A partial [`Record`] used by `update`; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(
        rename = "shortenedURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub shortened_url: Option<String>,
}

impl RecordPatch {
    /// Patch that records one more generated character.
    pub fn progress(short_code: impl Into<String>, progress: f64) -> Self {
        Self {
            short_code: Some(short_code.into()),
            progress: Some(progress),
            ..Self::default()
        }
    }

    /// Patch that marks a completed record as acknowledged.
    pub fn ack() -> Self {
        Self {
            ack: Some(true),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let record = Record {
            original: "http://a".to_string(),
            short_code: "abc".to_string(),
            ack: false,
            progress: 0.3,
            shortened_url: Some("http://localhost:3000/abc".to_string()),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["original"], "http://a");
        assert_eq!(json["shortCode"], "abc");
        assert_eq!(json["shortenedURL"], "http://localhost:3000/abc");
        assert_eq!(json["progress"], 0.3);
    }

    #[test]
    fn pending_record_omits_shortened_url() {
        let json = serde_json::to_string(&Record::pending("http://a")).unwrap();
        assert!(!json.contains("shortenedURL"));
    }

    #[test]
    fn patch_overwrites_only_supplied_fields() {
        let record = Record::pending("http://a");

        let next = record.patched(&RecordPatch::progress("x1", 0.2));
        assert_eq!(next.original, "http://a");
        assert_eq!(next.short_code, "x1");
        assert_eq!(next.progress, 0.2);
        assert!(!next.ack);

        let acked = next.patched(&RecordPatch::ack());
        assert!(acked.ack);
        assert_eq!(acked.short_code, "x1");
    }

    #[test]
    fn table_names() {
        assert_eq!(Table::Pending.to_string(), "pending");
        assert_eq!(
            serde_json::to_string(&Table::Completed).unwrap(),
            "\"completed\""
        );
    }
}

//! Firestore REST implementation of [`DrawSource`].
//!
//! Layout of the documents tree:
//! ```text
//! Cities/{city}/categories/{category}                 fields.heads  = [string]
//! Cities/{city}/categories/{category}/data/{day}/values/*
//!                                                     fields.ts     = string (ISO 8601)
//!                                                     fields.data   = [integer]
//! ```

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tracing::debug;

use super::{classify_status, DrawSource, FetchError};
use crate::core::format::format_date_key;
use crate::core::grid::SampleRecord;
use crate::core::session::SessionConfig;

const PAGE_SIZE: &str = "300";

pub struct FirestoreSource {
    client: Client,
    documents_url: String,
    local_offset: UtcOffset,
}

impl FirestoreSource {
    /// `local_offset` applies to stored timestamps that carry no offset of their own.
    pub fn new(documents_url: impl Into<String>, local_offset: UtcOffset) -> Self {
        Self {
            client: Client::new(),
            documents_url: documents_url.into(),
            local_offset,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.documents_url)
            .map_err(|err| FetchError::Transport(format!("invalid documents url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport("documents url cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        token: &str,
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        if let Some(err) = classify_status(response.status().as_u16()) {
            return Err(err);
        }

        response
            .json::<T>()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))
    }
}

#[async_trait(?Send)]
impl DrawSource for FirestoreSource {
    async fn fetch_categories(&self, config: &SessionConfig) -> Result<Vec<String>, FetchError> {
        let url = self.endpoint(&["Cities", &config.city_id, "categories", &config.category_id])?;
        let doc: HeadsDocument = self
            .get_json(url, &[("mask.fieldPaths", "heads")], &config.token)
            .await?;
        Ok(doc.into_labels())
    }

    async fn fetch_samples(
        &self,
        config: &SessionConfig,
        date: Date,
    ) -> Result<Vec<SampleRecord>, FetchError> {
        let day = format_date_key(date);
        let url = self.endpoint(&[
            "Cities",
            &config.city_id,
            "categories",
            &config.category_id,
            "data",
            &day,
            "values",
        ])?;

        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![("pageSize", PAGE_SIZE)];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: ValuesPage = self.get_json(url.clone(), &query, &config.token).await?;
            records.extend(
                page.documents
                    .into_iter()
                    .filter_map(|doc| doc.into_record(self.local_offset)),
            );
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!(%day, records = records.len(), "fetched day");
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArrayField<T> {
    #[serde(default = "ArrayValue::empty")]
    array_value: ArrayValue<T>,
}

#[derive(Debug, Deserialize)]
struct ArrayValue<T> {
    // Firestore omits `values` for empty arrays.
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

impl<T> ArrayValue<T> {
    fn empty() -> Self {
        Self { values: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StringEntry {
    #[serde(default)]
    string_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntegerEntry {
    #[serde(default)]
    integer_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HeadsDocument {
    fields: HeadsFields,
}

#[derive(Debug, Deserialize)]
struct HeadsFields {
    heads: ArrayField<StringEntry>,
}

impl HeadsDocument {
    fn into_labels(self) -> Vec<String> {
        self.fields
            .heads
            .array_value
            .values
            .into_iter()
            .filter_map(|entry| entry.string_value)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValuesPage {
    #[serde(default)]
    documents: Vec<ValueDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: ValueFields,
}

#[derive(Debug, Default, Deserialize)]
struct ValueFields {
    #[serde(default)]
    data: Option<ArrayField<IntegerEntry>>,
    #[serde(default)]
    ts: Option<StringEntry>,
}

impl ValueDocument {
    /// `None` for documents without a readable timestamp or without values.
    fn into_record(self, local_offset: UtcOffset) -> Option<SampleRecord> {
        let raw = self.fields.ts.and_then(|ts| ts.string_value)?;
        let Some(at) = parse_timestamp(&raw, local_offset) else {
            debug!(document = %self.name, %raw, "skipping record with unreadable timestamp");
            return None;
        };
        let values: Vec<Option<String>> = self
            .fields
            .data
            .map(|data| {
                data.array_value
                    .values
                    .into_iter()
                    .map(|entry| entry.integer_value)
                    .collect()
            })
            .unwrap_or_default();
        if values.is_empty() {
            return None;
        }
        Some(SampleRecord { at, values })
    }
}

/// RFC 3339 first; offset-less ISO timestamps are read in `local_offset`.
fn parse_timestamp(raw: &str, local_offset: UtcOffset) -> Option<OffsetDateTime> {
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(at);
    }
    let with_fraction =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let without_fraction = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    PrimitiveDateTime::parse(raw, &with_fraction)
        .or_else(|_| PrimitiveDateTime::parse(raw, &without_fraction))
        .ok()
        .map(|local| local.assume_offset(local_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    const IST: UtcOffset = offset!(+05:30);

    #[test]
    fn heads_document_decodes_in_order() {
        let json = r#"{
            "name": "projects/p/databases/(default)/documents/Cities/c/categories/k",
            "fields": { "heads": { "arrayValue": { "values": [
                { "stringValue": "FR" }, { "stringValue": "SR" }, { "stringValue": "Night" }
            ] } } },
            "createTime": "2025-01-01T00:00:00Z",
            "updateTime": "2025-01-01T00:00:00Z"
        }"#;
        let doc: HeadsDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.into_labels(), vec!["FR", "SR", "Night"]);
    }

    #[test]
    fn empty_heads_array_decodes_to_nothing() {
        let json = r#"{ "fields": { "heads": { "arrayValue": {} } } }"#;
        let doc: HeadsDocument = serde_json::from_str(json).unwrap();
        assert!(doc.into_labels().is_empty());
    }

    #[test]
    fn values_page_decodes_records() {
        let json = r#"{
            "documents": [
                {
                    "name": "a",
                    "fields": {
                        "ts": { "stringValue": "2025-04-18T08:30:00.000+05:30" },
                        "data": { "arrayValue": { "values": [
                            { "integerValue": "5" }, { "nullValue": null }, { "integerValue": "12" }
                        ] } }
                    }
                },
                {
                    "name": "b",
                    "fields": {
                        "ts": { "stringValue": "2025-04-18T08:45:00.000+05:30" },
                        "data": { "arrayValue": {} }
                    }
                }
            ],
            "nextPageToken": "next"
        }"#;
        let page: ValuesPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("next"));
        let records: Vec<SampleRecord> = page
            .documents
            .into_iter()
            .filter_map(|doc| doc.into_record(IST))
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].at, datetime!(2025-04-18 08:30 +05:30));
        assert_eq!(
            records[0].values,
            vec![Some("5".to_string()), None, Some("12".to_string())]
        );
    }

    #[test]
    fn empty_collection_has_no_documents_key() {
        let page: ValuesPage = serde_json::from_str("{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn timestamps_without_offset_use_the_local_offset() {
        assert_eq!(
            parse_timestamp("2025-04-18T08:30:00", IST),
            Some(datetime!(2025-04-18 08:30 +05:30))
        );
        assert_eq!(
            parse_timestamp("2025-04-18T03:00:00Z", IST),
            Some(datetime!(2025-04-18 08:30 +05:30))
        );
        assert_eq!(parse_timestamp("yesterday", IST), None);
    }

    #[test]
    fn endpoint_encodes_segments() {
        let source = FirestoreSource::new("https://example.test/v1/documents/", IST);
        let url = source.endpoint(&["Cities", "north east", "categories"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/v1/documents/Cities/north%20east/categories"
        );
    }
}

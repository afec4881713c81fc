// es-client/src/models.rs
//! 数据模型定义

use crate::error::{EsError, Result};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_QUERY: &str = "{}";
pub const DEFAULT_PAGE_SIZE: usize = 10_000;
pub const DEFAULT_SCROLL: &str = "1m";
/// Scroll lifetime used by [`crate::es_search`]
pub const FETCH_ALL_SCROLL: &str = "5m";

/// Everything needed to run one search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpec {
    /// JSON query body
    pub query: String,
    /// Index to query; empty queries every index
    pub index: String,
    pub doc_type: Option<String>,
    /// Hits per page
    pub page_size: usize,
    /// Stop after this many hits; `None` returns everything
    pub max_hits: Option<usize>,
    /// How long the server keeps the scroll context alive between pages
    pub scroll: String,
}

impl Default for SearchSpec {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            index: String::new(),
            doc_type: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_hits: None,
            scroll: DEFAULT_SCROLL.to_string(),
        }
    }
}

impl SearchSpec {
    /// Defaults for pulling a whole index into a table
    pub fn for_index(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            scroll: FETCH_ALL_SCROLL.to_string(),
            ..Self::default()
        }
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = Some(max_hits);
        self
    }

    pub fn scroll(mut self, scroll: impl Into<String>) -> Self {
        self.scroll = scroll.into();
        self
    }

    /// `{endpoint}/{index}/{doc_type}/_search?scroll=..&size=..`, skipping
    /// empty path segments
    pub fn search_url(&self, endpoint: &str) -> String {
        let mut url = endpoint.to_string();
        for segment in [Some(self.index.as_str()), self.doc_type.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
        {
            url.push('/');
            url.push_str(segment);
        }
        url.push_str(&format!("/_search?scroll={}&size={}", self.scroll, self.page_size));
        url
    }
}

/// Reject queries that ask for aggregations: their responses carry no hits
/// to page through.
pub fn ensure_not_aggregation(query: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(query)
        .map_err(|e| EsError::InvalidQuery(format!("query body is not valid JSON: {}", e)))?;
    let Value::Object(body) = parsed else {
        return Err(EsError::InvalidQuery(
            "query body must be a JSON object".to_string(),
        ));
    };

    let has_aggs = ["aggs", "aggregations"]
        .iter()
        .any(|key| body.get(*key).is_some_and(|v| !v.is_null()));
    if has_aggs {
        tracing::info!("detected an aggs request, which only returns aggregation results");
        return Err(EsError::NotImplemented(
            "the aggs parser has not been implemented for searches yet".to_string(),
        ));
    }
    Ok(())
}

/// One page of a scrolled search
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(rename = "_scroll_id", default)]
    pub scroll_id: Option<String>,
    pub hits: PageHits,
}

#[derive(Debug, Deserialize)]
pub struct PageHits {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.hits.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }

    /// The `_source` of every hit, in order
    pub fn into_sources(self) -> Result<Vec<Value>> {
        self.hits
            .hits
            .into_iter()
            .map(|hit| {
                hit.source.ok_or_else(|| {
                    EsError::InvalidResponse(format!(
                        "hit {} has no _source",
                        hit.id.as_deref().unwrap_or("<unknown>")
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(SearchSpec::default(), "http://es:9200/_search?scroll=1m&size=10000")]
    #[case(
        SearchSpec::for_index("shakespeare"),
        "http://es:9200/shakespeare/_search?scroll=5m&size=10000"
    )]
    #[case(
        SearchSpec::for_index("logs").doc_type("event").page_size(500).scroll("2m"),
        "http://es:9200/logs/event/_search?scroll=2m&size=500"
    )]
    #[case(
        SearchSpec::for_index("logs").doc_type(""),
        "http://es:9200/logs/_search?scroll=5m&size=10000"
    )]
    fn test_search_url(#[case] spec: SearchSpec, #[case] expected: &str) {
        assert_eq!(spec.search_url("http://es:9200"), expected);
    }

    #[rstest]
    #[case(r#"{"aggs": {"x": {"terms": {"field": "f"}}}}"#)]
    #[case(r#"{"size": 0, "aggregations": {"x": {"stats": {"field": "f"}}}}"#)]
    fn test_aggregations_rejected(#[case] query: &str) {
        assert!(matches!(
            ensure_not_aggregation(query),
            Err(EsError::NotImplemented(_))
        ));
    }

    #[rstest]
    #[case("{}")]
    #[case(r#"{"query": {"match_all": {}}}"#)]
    #[case(r#"{"aggs": null}"#)]
    fn test_plain_queries_accepted(#[case] query: &str) {
        assert!(ensure_not_aggregation(query).is_ok());
    }

    #[test]
    fn test_query_must_be_object() {
        assert!(matches!(ensure_not_aggregation("[]"), Err(EsError::InvalidQuery(_))));
        assert!(matches!(ensure_not_aggregation("{"), Err(EsError::InvalidQuery(_))));
    }

    #[test]
    fn test_page_sources() {
        let page: Page = serde_json::from_value(json!({
            "_scroll_id": "abc",
            "hits": {"total": 2, "hits": [
                {"_id": "1", "_source": {"n": 1}},
                {"_id": "2", "_source": {"n": 2}},
            ]}
        }))
        .unwrap();
        assert_eq!(page.scroll_id.as_deref(), Some("abc"));
        assert_eq!(page.len(), 2);
        assert_eq!(page.into_sources().unwrap(), vec![json!({"n": 1}), json!({"n": 2})]);
    }

    #[test]
    fn test_hit_without_source() {
        let page: Page = serde_json::from_value(json!({
            "hits": {"hits": [{"_id": "7"}]}
        }))
        .unwrap();
        let err = page.into_sources().unwrap_err();
        assert!(matches!(err, EsError::InvalidResponse(ref m) if m.contains('7')));
    }
}

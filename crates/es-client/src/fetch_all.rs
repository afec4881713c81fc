// es-client/src/fetch_all.rs
//! Pull search results from a cluster straight into a table

use crate::client::Uptasticsearch;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::{ensure_not_aggregation, SearchSpec};
use crate::transport::Transport;
use tabular::Table;
use tracing::info;
use validate::convert_to_sec;

/// Query the cluster at `es_host` and flatten every hit into a table.
///
/// Returns `None` when nothing matched. The query and scroll lifetime are
/// checked before the cluster is contacted.
pub fn es_search(es_host: &str, spec: &SearchSpec, config: &ClientConfig) -> Result<Option<Table>> {
    ensure_not_aggregation(&spec.query)?;
    convert_to_sec(spec.scroll.as_str())?;

    let client = Uptasticsearch::connect(es_host, config)?;
    search_to_table(&client, spec)
}

/// Run `spec` through an existing client and flatten the hits
pub fn search_to_table<T: Transport>(
    client: &Uptasticsearch<T>,
    spec: &SearchSpec,
) -> Result<Option<Table>> {
    let docs = client.search(spec)?;
    if docs.is_empty() {
        info!(index = %spec.index, "query returned no documents");
        return Ok(None);
    }
    Ok(Some(Table::from_documents(&docs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EsError;
    use crate::strategy::ScrollStrategy;
    use crate::testing::{page, ScriptedTransport};
    use serde_json::json;

    // Port 1 is never listened on; these tests must fail before connecting.
    const UNREACHABLE: &str = "http://127.0.0.1:1";

    #[test]
    fn test_rectangle() {
        let transport = ScriptedTransport::new(vec![page(json!(10000), 0, 10000, "s1")]);
        let client = Uptasticsearch::with_strategy(UNREACHABLE, &transport, ScrollStrategy::V6).unwrap();
        let spec = SearchSpec::for_index("shakespeare").max_hits(10);

        let table = search_to_table(&client, &spec).unwrap().unwrap();
        assert_eq!(table.len(), 10);
        assert_eq!(table.columns(), &["id"]);
    }

    #[test]
    fn test_no_documents() {
        let spec = SearchSpec::for_index("empty");
        let transport = ScriptedTransport::new(vec![page(json!({"value": 0}), 0, 0, "s1")]);
        let client = Uptasticsearch::with_strategy(UNREACHABLE, &transport, ScrollStrategy::V7).unwrap();
        assert!(search_to_table(&client, &spec).unwrap().is_none());
    }

    #[test]
    fn test_aggs_rejected_before_connecting() {
        let spec = SearchSpec::for_index("shakespeare")
            .query(r#"{"aggs": {"speakers": {"terms": {"field": "speaker"}}}}"#);
        let err = es_search(UNREACHABLE, &spec, &ClientConfig::default()).unwrap_err();
        assert!(matches!(err, EsError::NotImplemented(_)));
    }

    #[test]
    fn test_bad_scroll_rejected_before_connecting() {
        let spec = SearchSpec::for_index("shakespeare").scroll("five minutes");
        let err = es_search(UNREACHABLE, &spec, &ClientConfig::default()).unwrap_err();
        assert!(matches!(err, EsError::Validation(_)));
    }
}

use super::{require_text, TextInput, ValidationError, ValidationErrorKind, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

const FIELD: &str = "es_host";
const DEFAULT_PROTOCOL: &str = "http://";

static TRAILING_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new("/+$").expect("valid regex"));
static PORT: Lazy<Regex> = Lazy::new(|| Regex::new(":[0-9]+$").expect("valid regex"));
static PROTOCOL: Lazy<Regex> = Lazy::new(|| Regex::new("^[A-Za-z]+://").expect("valid regex"));
// Also matches bare IP addresses, e.g. `0.0.0.0:9200`
static HOST_AND_PORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.?[A-Za-z0-9-]+)+:[0-9]+$").expect("valid regex"));

/// Validate an Elasticsearch hostname and, where possible, repair it.
///
/// A canonical hostname:
/// - begins with a transfer protocol, e.g. `http://`
/// - continues with a DNS name or IP, e.g. `es.mybusiness.com`
/// - ends with a port, e.g. `:9200`, and no trailing slash
///
/// A missing protocol is repaired by assuming `http://`. Anything between the
/// start of the string and the host is dropped in that case, so a mangled
/// `http:/es.com:9200` becomes `http://es.com:9200`.
pub fn format_es_url<T>(es_host: &T) -> ValidationResult<String>
where
    T: TextInput + ?Sized,
{
    let es_host = require_text(FIELD, es_host)?;

    if es_host.contains(' ') {
        return Err(ValidationError::new(
            FIELD,
            ValidationErrorKind::ContainsSpace {
                value: es_host.to_string(),
            },
        ));
    }

    let es_host = TRAILING_SLASHES.replace(es_host, "");

    if !PORT.is_match(&es_host) {
        return Err(ValidationError::new(
            FIELD,
            ValidationErrorKind::MissingPort {
                value: es_host.into_owned(),
            },
        ));
    }

    if PROTOCOL.is_match(&es_host) {
        return Ok(es_host.into_owned());
    }

    tracing::warn!("No protocol provided with es_host '{}'. Assuming http", es_host);

    match HOST_AND_PORT.find(&es_host) {
        Some(host) => Ok(format!("{}{}", DEFAULT_PROTOCOL, host.as_str())),
        None => Err(ValidationError::new(
            FIELD,
            ValidationErrorKind::MissingHost {
                value: es_host.into_owned(),
            },
        )),
    }
}

use tracing::debug;
use url::Url;

/// Resolves each string as a URL reference against everything before it,
/// left to right.
///
/// Fragments that fail to parse are treated as empty references and leave
/// the result unchanged. A chain with no absolute URL to anchor it yields an
/// empty string.
pub fn combine_urls<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut resolved: Option<Url> = None;
    for part in parts {
        let part = part.as_ref();
        resolved = match resolved {
            Some(base) => match base.join(part) {
                Ok(next) => Some(next),
                Err(err) => {
                    debug!(reference = part, error = %err, "ignoring unparsable url reference");
                    Some(base)
                }
            },
            None => Url::parse(part).ok(),
        };
    }
    resolved.map(String::from).unwrap_or_default()
}

use once_cell::sync::Lazy;
use regex::Regex;

static SLASHES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/+").unwrap());

static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.-]*)://").unwrap());

/// Joins path segments with a single `/` and collapses repeated slashes.
///
/// Empty segments are skipped. The result always starts with exactly one
/// `/`, unless the joined value opens with a `scheme://` prefix, in which
/// case it is returned as `scheme://host/path`. Trailing slashes are
/// dropped, so `normalize(&[normalize(x)]) == normalize(x)`.
pub fn normalize<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    let (scheme, rest) = match SCHEME_REGEX.captures(&joined) {
        Some(captures) => {
            let end = captures.get(0).map_or(0, |prefix| prefix.end());
            (captures.get(1).map(|scheme| scheme.as_str()), &joined[end..])
        }
        None => (None, joined.as_str()),
    };

    let collapsed = SLASHES_REGEX.replace_all(rest, "/");
    let trimmed = collapsed.trim_matches('/');

    match scheme {
        Some(scheme) => format!("{}://{}", scheme, trimmed),
        None => format!("/{}", trimmed),
    }
}

/// Combines a host with a path.
///
/// A single trailing slash is stripped from the host (unless the host ends in
/// `://`) and a single leading and trailing slash from the path.
pub fn build_url(host: &str, path: &str) -> String {
    let host = if host.ends_with("://") {
        host
    } else {
        host.strip_suffix('/').unwrap_or(host)
    };
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);

    if path.is_empty() {
        return host.to_string();
    }
    if host.ends_with("://") {
        return format!("{}{}", host, path);
    }
    format!("{}/{}", host, path)
}

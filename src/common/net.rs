use url::Url;

pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Parses a `http://host[:port]/path` target. Inputs without a scheme are
/// treated as plain HTTP.
pub fn parse_target_url(input: &str) -> Option<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains("://") {
        Url::parse(trimmed).ok()
    } else {
        Url::parse(&format!("http://{trimmed}")).ok()
    }
}

pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Renders the canonical URL of a probe target. Falls back to plain
/// formatting when the host is not something `url` accepts.
pub fn display_url(host: &str, port: u16, path: &str) -> String {
    let raw = format!("http://{host}:{port}{path}");
    match Url::parse(&raw) {
        Ok(url) => url.to_string(),
        Err(_) => raw,
    }
}

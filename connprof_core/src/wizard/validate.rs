use url::Url;

pub const INVALID_URL: &str = "Please enter a valid URL.";
pub const MISSING_PORT: &str = "Please include a port, e.g. https://host:443.";

/// Accepts any absolute URL with a host and an explicit port.
///
/// The scheme is not restricted. A port equal to the scheme default
/// (`https://host:443`) still counts as explicit, even though `url`
/// normalises it away.
pub fn validate_url(text: &str) -> Result<(), String> {
    let text = text.trim();
    let url = Url::parse(text).map_err(|_| INVALID_URL.to_string())?;
    if url.host().is_none() {
        return Err(INVALID_URL.to_string());
    }
    if url.port().is_some() || has_explicit_port(text) {
        Ok(())
    } else {
        Err(MISSING_PORT.to_string())
    }
}

/// Looks for `:<port>` in the authority as it was typed.
fn has_explicit_port(text: &str) -> bool {
    let Some((_, rest)) = text.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);
    // skip over a bracketed IPv6 literal
    let after_host = match host_port.rfind(']') {
        Some(i) => &host_port[i + 1..],
        None => host_port,
    };
    after_host
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty())
}

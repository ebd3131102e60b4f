use url::Url;

/// Outcome of a content request to open a new window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    Deny,
}

pub(crate) fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" | "mailto" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https/mailto are allowed."
        )),
    }
}

/// Never lets content spawn an in-app window; openable URLs go to the OS
/// handler exactly once.
pub fn route_new_window_request<O, F>(raw_url: &str, open: O, log: F) -> LinkDecision
where
    O: FnOnce(&Url) -> Result<(), String>,
    F: Fn(&str),
{
    let parsed = match parse_openable_url(raw_url) {
        Ok(parsed) => parsed,
        Err(error) => {
            log(&format!("new window request denied for '{raw_url}': {error}"));
            return LinkDecision::Deny;
        }
    };

    match open(&parsed) {
        Ok(()) => log(&format!("forwarded external link to system opener: {parsed}")),
        Err(error) => log(&format!("failed to open external link {parsed}: {error}")),
    }
    LinkDecision::Deny
}

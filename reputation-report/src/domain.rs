/// Reduce a website value to the bare domain used for backlink lookups.
///
/// `https://www.Acme.com:8080/about?x=1` becomes `acme.com`. Returns `None`
/// when nothing domain-like is left.
pub fn domain_from_website(website: &str) -> Option<String> {
    let mut rest = website.trim();

    if let Some(idx) = rest.find("://") {
        rest = &rest[idx + 3..];
    }
    // Drop path, query, and fragment
    if let Some(idx) = rest.find(|c| c == '/' || c == '?' || c == '#') {
        rest = &rest[..idx];
    }
    // Drop credentials and port
    if let Some(idx) = rest.rfind('@') {
        rest = &rest[idx + 1..];
    }
    if let Some(idx) = rest.find(':') {
        rest = &rest[..idx];
    }

    let mut domain = rest.trim_end_matches('.').to_lowercase();
    if let Some(stripped) = domain.strip_prefix("www.") {
        domain = stripped.to_string();
    }

    if domain.is_empty() || !domain.contains('.') || domain.contains(char::is_whitespace) {
        return None;
    }
    Some(domain)
}

use crate::constants::CANONICAL_POST_URL_PREFIX;

/// Builds the public URL of a post from its identifier.
///
/// # Example
/// ```
/// use tech_sniffer::utils::canonical_post_url;
///
/// assert_eq!(canonical_post_url("42"), "https://stackoverflow.com/questions/42");
/// ```
pub fn canonical_post_url(document_id: &str) -> String {
    format!("{}{}", CANONICAL_POST_URL_PREFIX, document_id.trim())
}

/// Turns a technology name into a file-name friendly slug: ASCII alphanumerics are kept
/// (lowercased), `#` and `+` are spelled out and everything else becomes `_`.
///
/// # Example
/// ```
/// use tech_sniffer::utils::slugify;
///
/// assert_eq!(slugify("React Native"), "react_native");
/// assert_eq!(slugify("C#"), "csharp");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for c in name.trim().chars() {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            'A'..='Z' => slug.push(c.to_ascii_lowercase()),
            '#' => slug.push_str("sharp"),
            '+' => slug.push_str("plus"),
            _ => slug.push('_'),
        }
    }

    slug
}

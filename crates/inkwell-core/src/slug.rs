//! URL slug derivation for posts and tags.

use crate::error::DomainError;

/// Derive a slug from a title or tag name.
///
/// ASCII alphanumerics are lowercased and kept; every other run of
/// characters becomes a single `-`. Leading and trailing separators are
/// dropped.
pub fn slugify(input: &str) -> Result<String, DomainError> {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        return Err(DomainError::Validation(format!(
            "cannot derive a slug from {input:?}"
        )));
    }

    Ok(slug)
}

/// Whether `slug` is already in canonical form.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(
            slugify("Getting Started with React Hooks").unwrap(),
            "getting-started-with-react-hooks"
        );
        assert_eq!(slugify("  Node.js -- Tips!  ").unwrap(), "node-js-tips");
        assert_eq!(slugify("CSS").unwrap(), "css");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café au lait").unwrap(), "caf-au-lait");
    }

    #[test]
    fn test_slugify_rejects_empty_result() {
        assert!(slugify("!!!").is_err());
        assert!(slugify("").is_err());
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("web-development"));
        assert!(is_valid_slug("es2024"));
        assert!(!is_valid_slug("Web-Development"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("double--dash"));
        assert!(!is_valid_slug(""));
    }
}

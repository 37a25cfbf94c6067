//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query string for `GET /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    /// Resolve defaults and check bounds, returning `(page, limit)`.
    pub fn resolve(&self) -> Result<(u64, u64), String> {
        let page = self.page.unwrap_or(Self::DEFAULT_PAGE);
        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT);

        if page < 1 {
            return Err("page must be at least 1".to_string());
        }
        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(format!("limit must be between 1 and {}", Self::MAX_LIMIT));
        }
        // The row offset is bound as a signed 64-bit integer by SQL backends.
        let offset = (page - 1).checked_mul(limit);
        if !offset.is_some_and(|o| i64::try_from(o).is_ok()) {
            return Err("page is out of range".to_string());
        }

        Ok((page, limit))
    }
}

/// Pagination block of the post listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Response for `GET /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse<P> {
    pub posts: Vec<P>,
    pub pagination: Pagination,
}

/// Body of `POST /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub reading_time: String,
    pub author_id: Option<i32>,
}

impl CreatePostRequest {
    /// Collect every field problem, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        require(&mut errors, "title", &self.title, 200);
        require(&mut errors, "excerpt", &self.excerpt, 1000);
        if self.content.trim().is_empty() {
            errors.push("content is required".to_string());
        }
        require(&mut errors, "readingTime", &self.reading_time, 50);
        if let Some(slug) = &self.slug {
            require(&mut errors, "slug", slug, 200);
        }
        if let Some(cover) = &self.cover_image {
            if cover.trim().is_empty() {
                errors.push("coverImage must not be blank".to_string());
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Body of `POST /api/tags`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    /// Derived from the name when omitted.
    pub slug: Option<String>,
}

impl CreateTagRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name, 100);
        if let Some(slug) = &self.slug {
            require(&mut errors, "slug", slug, 100);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Body of `POST /api/subscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

impl SubscribeRequest {
    /// Trimmed, lowercased address.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    pub fn validate(&self) -> Result<(), String> {
        let email = self.normalized_email();
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if valid {
            Ok(())
        } else {
            Err("Invalid email address".to_string())
        }
    }
}

fn require(errors: &mut Vec<String>, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.push(format!("{field} is required"));
    } else if value.chars().count() > max_len {
        errors.push(format!("{field} must be at most {max_len} characters"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::new(5, 2, 2).total_pages, 3);
        assert_eq!(Pagination::new(4, 1, 2).total_pages, 2);
        assert_eq!(Pagination::new(0, 1, 10).total_pages, 0);
    }

    #[test]
    fn test_page_query_defaults_and_bounds() {
        assert_eq!(PageQuery::default().resolve(), Ok((1, 10)));
        let q = PageQuery {
            page: Some(0),
            limit: None,
        };
        assert!(q.resolve().is_err());
        let q = PageQuery {
            page: Some(1),
            limit: Some(101),
        };
        assert!(q.resolve().is_err());
    }

    #[test]
    fn test_page_query_rejects_offset_past_bigint() {
        let q = PageQuery {
            page: Some(u64::MAX),
            limit: Some(2),
        };
        assert_eq!(q.resolve(), Err("page is out of range".to_string()));

        // (page - 1) * limit == i64::MAX exactly is still addressable.
        let q = PageQuery {
            page: Some(i64::MAX as u64 + 1),
            limit: Some(1),
        };
        assert_eq!(q.resolve(), Ok((i64::MAX as u64 + 1, 1)));

        let q = PageQuery {
            page: Some(i64::MAX as u64 + 2),
            limit: Some(1),
        };
        assert!(q.resolve().is_err());
    }

    #[test]
    fn test_create_post_collects_all_errors() {
        let req = CreatePostRequest {
            slug: None,
            title: " ".to_string(),
            excerpt: String::new(),
            content: "body".to_string(),
            cover_image: None,
            published_at: None,
            reading_time: "3 min read".to_string(),
            author_id: None,
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors, vec!["title is required", "excerpt is required"]);
    }

    #[test]
    fn test_subscribe_email_validation() {
        let ok = |e: &str| SubscribeRequest { email: e.to_string() }.validate().is_ok();
        assert!(ok("a@b.com"));
        assert!(ok("  Reader@Example.org "));
        assert!(!ok("no-at-sign.com"));
        assert!(!ok("a@b"));
        assert!(!ok("@b.com"));
        assert!(!ok("a b@c.com"));
        assert!(!ok("a@@b.com"));
    }

    #[test]
    fn test_create_post_request_reads_camel_case() {
        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "title": "Hello",
            "excerpt": "Intro",
            "content": "Body",
            "readingTime": "2 min read",
            "coverImage": "https://img.example.com/a.png",
            "authorId": 1
        }))
        .unwrap();
        assert_eq!(req.cover_image.as_deref(), Some("https://img.example.com/a.png"));
        assert_eq!(req.author_id, Some(1));
        assert!(req.slug.is_none());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tag;

/// Post entity - a published blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub reading_time: String,
    pub author_id: Option<i32>,
}

/// Insert payload for a post. `published_at` defaults to the insert time.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub reading_time: String,
    pub author_id: Option<i32>,
}

impl NewPost {
    /// Resolve the publication timestamp, falling back to `now`.
    pub fn published_at_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.published_at.unwrap_or(now)
    }
}

/// Partial update for a post. `None` leaves the field untouched.
///
/// The nullable columns use a nested option: `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<Option<String>>,
    pub published_at: Option<DateTime<Utc>>,
    pub reading_time: Option<String>,
    pub author_id: Option<Option<i32>>,
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.slug.is_none()
            && self.title.is_none()
            && self.excerpt.is_none()
            && self.content.is_none()
            && self.cover_image.is_none()
            && self.published_at.is_none()
            && self.reading_time.is_none()
            && self.author_id.is_none()
    }

    /// Apply the changes to an in-memory post.
    pub fn apply(self, post: &mut Post) {
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(cover_image) = self.cover_image {
            post.cover_image = cover_image;
        }
        if let Some(published_at) = self.published_at {
            post.published_at = published_at;
        }
        if let Some(reading_time) = self.reading_time {
            post.reading_time = reading_time;
        }
        if let Some(author_id) = self.author_id {
            post.author_id = author_id;
        }
    }
}

/// A post together with its tags, as returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithTags {
    #[serde(flatten)]
    pub post: Post,
    pub tags: Vec<Tag>,
}

impl PostWithTags {
    pub fn new(post: Post, tags: Vec<Tag>) -> Self {
        Self { post, tags }
    }
}

/// One page of posts plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedPosts {
    pub posts: Vec<Post>,
    pub total: u64,
}

/// Sort posts newest first. The sort is stable, so equal timestamps keep
/// their incoming order.
pub fn sort_by_recency(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(id: i32, day: u32) -> Post {
        Post {
            id,
            slug: format!("post-{id}"),
            title: format!("Post {id}"),
            excerpt: String::new(),
            content: String::new(),
            cover_image: None,
            published_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            reading_time: "1 min read".to_string(),
            author_id: None,
        }
    }

    #[test]
    fn test_sort_by_recency_keeps_ties_in_order() {
        let mut posts = vec![post(1, 1), post(2, 3), post(3, 3), post(4, 2)];
        sort_by_recency(&mut posts);
        let ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_update_clears_nullable_fields() {
        let mut p = post(1, 1);
        p.cover_image = Some("cover.png".to_string());
        p.author_id = Some(7);

        PostUpdate {
            title: Some("Renamed".to_string()),
            cover_image: Some(None),
            author_id: Some(None),
            ..Default::default()
        }
        .apply(&mut p);

        assert_eq!(p.title, "Renamed");
        assert_eq!(p.cover_image, None);
        assert_eq!(p.author_id, None);
        assert_eq!(p.slug, "post-1");
    }

    #[test]
    fn test_post_with_tags_serializes_flat_camel_case() {
        let json = serde_json::to_value(PostWithTags::new(post(1, 1), vec![])).unwrap();
        assert_eq!(json["slug"], "post-1");
        assert!(json["publishedAt"].is_string());
        assert!(json["readingTime"].is_string());
        assert!(json["tags"].as_array().unwrap().is_empty());
        assert!(json.get("post").is_none());
    }
}

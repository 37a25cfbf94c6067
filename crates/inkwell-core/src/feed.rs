//! RSS 2.0 feed rendering.
//!
//! Rendering is a pure function of the channel metadata and the posts, so
//! the HTTP layer only has to gather data and pick the base URL.

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

use crate::domain::PostWithTags;

/// Feed rendering failures.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Feed is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Channel-level metadata for the feed.
#[derive(Debug, Clone)]
pub struct FeedChannel {
    pub title: String,
    pub description: String,
    /// Absolute site URL; a trailing `/` is ignored.
    pub base_url: String,
    pub language: String,
}

impl FeedChannel {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            base_url: base_url.into(),
            language: "en-us".to_string(),
        }
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Public URL of a post.
    pub fn post_link(&self, slug: &str) -> String {
        format!("{}/posts/{}", self.base(), slug)
    }
}

/// Format a timestamp the way RSS readers expect (RFC 1123, GMT).
pub fn rfc1123(ts: &DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Split text into CDATA section bodies. Each `]]>` is broken between its
/// `]]` and `>` so no section contains the terminator.
fn cdata_sections(text: &str) -> Vec<String> {
    let pieces: Vec<&str> = text.split("]]>").collect();
    let last = pieces.len() - 1;
    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            let open = if i > 0 { ">" } else { "" };
            let close = if i < last { "]]" } else { "" };
            format!("{open}{piece}{close}")
        })
        .collect()
}

fn text_element(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), quick_xml::Error> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn write_item(
    writer: &mut Writer<Vec<u8>>,
    channel: &FeedChannel,
    entry: &PostWithTags,
) -> Result<(), quick_xml::Error> {
    let post = &entry.post;
    let link = channel.post_link(&post.slug);

    writer.write_event(Event::Start(BytesStart::new("item")))?;
    text_element(writer, BytesStart::new("title"), &post.title)?;
    text_element(writer, BytesStart::new("link"), &link)?;
    text_element(
        writer,
        BytesStart::new("guid").with_attributes([("isPermaLink", "true")]),
        &link,
    )?;
    text_element(writer, BytesStart::new("pubDate"), &rfc1123(&post.published_at))?;

    writer.write_event(Event::Start(BytesStart::new("description")))?;
    for section in cdata_sections(&post.excerpt) {
        writer.write_event(Event::CData(BytesCData::new(section)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("description")))?;

    for tag in &entry.tags {
        text_element(writer, BytesStart::new("category"), &tag.name)?;
    }
    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// Render the feed. Items appear in the order given.
pub fn render_feed(channel: &FeedChannel, posts: &[PostWithTags]) -> Result<String, FeedError> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None))).map_err(quick_xml::Error::from)?;
    writer.write_event(Event::Start(
        BytesStart::new("rss").with_attributes([("version", "2.0")]),
    )).map_err(quick_xml::Error::from)?;
    writer.write_event(Event::Start(BytesStart::new("channel"))).map_err(quick_xml::Error::from)?;

    text_element(&mut writer, BytesStart::new("title"), &channel.title)?;
    text_element(&mut writer, BytesStart::new("link"), channel.base())?;
    text_element(&mut writer, BytesStart::new("description"), &channel.description)?;
    text_element(&mut writer, BytesStart::new("language"), &channel.language)?;

    if let Some(newest) = posts.iter().map(|p| p.post.published_at).max() {
        text_element(&mut writer, BytesStart::new("lastBuildDate"), &rfc1123(&newest))?;
    }

    for entry in posts {
        write_item(&mut writer, channel, entry)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel"))).map_err(quick_xml::Error::from)?;
    writer.write_event(Event::End(BytesEnd::new("rss"))).map_err(quick_xml::Error::from)?;

    Ok(String::from_utf8(writer.into_inner())?)
}

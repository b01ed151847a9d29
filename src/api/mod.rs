pub mod transport;

use std::str::FromStr;

use serde_json::Value as Json;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::config::ClientConfig;
use crate::error::{ClientError, ConfigError};
use crate::internal::decode::Decoder;
use crate::internal::models::{CategoryPage, CommentPage, DiscussionDetail};
use transport::{Query, RequestOptions, Transport};

/// Forum sections a discussion listing can be filtered by.
///
/// `Display` gives the English section name; the value sent on the wire comes
/// from [`Category::as_api_str`]. Parsing accepts either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    #[default]
    #[strum(to_string = "All", serialize = "all")]
    All,
    #[strum(to_string = "Bugs and issues", serialize = "1")]
    BugsAndIssues,
    #[strum(to_string = "Site suggestions", serialize = "2")]
    SiteSuggestions,
    #[strum(to_string = "Title search", serialize = "3")]
    TitleSearch,
    #[strum(to_string = "Job search", serialize = "4")]
    JobSearch,
    #[strum(to_string = "Manga discussion", serialize = "5")]
    MangaDiscussion,
    #[strum(to_string = "Anime discussion", serialize = "6")]
    AnimeDiscussion,
    #[strum(to_string = "Ranobe discussion", serialize = "7")]
    RanobeDiscussion,
    #[strum(to_string = "Video games", serialize = "8")]
    VideoGames,
    #[strum(to_string = "For translators", serialize = "9")]
    ForTranslators,
    #[strum(to_string = "How to translate manga", serialize = "10")]
    HowToTranslateManga,
    #[strum(to_string = "How to draw manga", serialize = "11")]
    HowToDrawManga,
    #[strum(to_string = "General chat", serialize = "12")]
    GeneralChat,
    #[strum(to_string = "Other", serialize = "13")]
    Other,
}

impl Category {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::BugsAndIssues => "1",
            Self::SiteSuggestions => "2",
            Self::TitleSearch => "3",
            Self::JobSearch => "4",
            Self::MangaDiscussion => "5",
            Self::AnimeDiscussion => "6",
            Self::RanobeDiscussion => "7",
            Self::VideoGames => "8",
            Self::ForTranslators => "9",
            Self::HowToTranslateManga => "10",
            Self::HowToDrawManga => "11",
            Self::GeneralChat => "12",
            Self::Other => "13",
        }
    }

    pub fn all() -> impl Iterator<Item = Category> {
        Self::iter()
    }

    /// Parses a wire value or English name, mapping failure to [`ConfigError`].
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        Self::from_str(value.trim()).map_err(|_| ConfigError::UnknownVariant {
            kind: "category",
            value: value.to_string(),
        })
    }
}

/// Ordering of a discussion listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Sort {
    #[default]
    #[strum(to_string = "Newest", serialize = "newest")]
    Newest,
    #[strum(to_string = "Recently updated", serialize = "updates")]
    Updates,
    #[strum(to_string = "Popular", serialize = "popular")]
    Popular,
}

impl Sort {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Updates => "updates",
            Self::Popular => "popular",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        Self::from_str(value.trim()).map_err(|_| ConfigError::UnknownVariant {
            kind: "sort",
            value: value.to_string(),
        })
    }
}

/// Blocking client for the forum API.
///
/// Holds one pooled HTTP connection resource, released when the client is
/// dropped or [`close`](ForumLib::close)d. Every call blocks until the
/// response has been received and decoded. The client is `Send + Sync`;
/// share it behind an `Arc` or build one per thread.
#[derive(Debug)]
pub struct ForumLib {
    transport: Transport,
    decoder: Decoder,
}

impl ForumLib {
    /// Client for the public instance with default settings.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = Transport::new(&config)?;
        let decoder = Decoder::new().with_embedded_json(config.embedded_json);
        tracing::debug!(
            base_url = %config.base_url,
            api_endpoint = %config.api_endpoint,
            "forumlib client opened"
        );
        Ok(Self { transport, decoder })
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// `GET /discussion` for one page of a category listing.
    pub fn list_category(
        &self,
        category: Category,
        page: i64,
        sort: Sort,
    ) -> Result<CategoryPage, ClientError> {
        let options = RequestOptions::get("/discussion")
            .param("category", category.as_api_str())
            .param("page", page)
            .param("sort", sort.as_api_str());
        let raw = self.transport.request(&options)?;
        Ok(self.decoder.decode_record(&raw)?)
    }

    /// `GET /discussion/{id}`: the discussion and its opening post.
    pub fn get_discussion(&self, discussion_id: i64) -> Result<DiscussionDetail, ClientError> {
        let raw = self
            .transport
            .request(&RequestOptions::get(format!("/discussion/{discussion_id}")))?;
        Ok(self.decoder.decode_record(&raw)?)
    }

    /// `GET /posts` for one page of comments under a discussion.
    pub fn list_comments(&self, discussion_id: i64, page: i64) -> Result<CommentPage, ClientError> {
        let options = RequestOptions::get("/posts")
            .param("discussion_id", discussion_id)
            .param("page", page);
        let raw = self.transport.request(&options)?;
        Ok(self.decoder.decode_record(&raw)?)
    }

    /// Undecoded JSON for endpoints without a typed model.
    pub fn get_json(&self, path: &str, params: Query) -> Result<Json, ClientError> {
        self.transport.get(path, params)
    }

    /// Releases the connection pool. Equivalent to dropping the client.
    pub fn close(self) {}
}

impl Drop for ForumLib {
    fn drop(&mut self) {
        tracing::debug!("forumlib client closed");
    }
}

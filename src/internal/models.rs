use crate::api::Category;
use crate::utils::url::page_from_url;

record! {
    /// Author of a discussion, post or comment.
    pub struct User as USER {
        id: i64,
        username: String,
        avatar: String,
    }
}

record! {
    /// Thread metadata shown in category listings.
    pub struct Discussion as DISCUSSION {
        id: i64,
        title: String,
        category_id: i64,
        user_id: i64,
        created_at: String,
        updated_at: String,
        last_post_at: String,
        user: User,
        views_count: i64,
        posts_count: i64,
        is_locked: bool,
        is_sticky: bool,
    }
}

record! {
    pub struct NameVersion as NAME_VERSION {
        name: String,
        version: String,
    }
}

record! {
    /// Client that submitted a post or comment.
    pub struct UserAgent as USER_AGENT {
        platform: NameVersion,
        browser: NameVersion,
        is_mobile: bool => "isMobile",
        is_tablet: bool => "isTablet",
        is_desktop: bool => "isDesktop",
    }
}

record! {
    pub struct OpAttributes as OP_ATTRIBUTES {
        italic: bool,
        bold: bool,
        link: String,
    }
}

record! {
    /// One rich-text operation: inserted text plus its formatting.
    pub struct Op as OP {
        insert: String,
        attributes: OpAttributes,
    }
}

record! {
    /// Rich-text content of a post or comment.
    pub struct Body as BODY {
        ops: Vec<Op>,
        user_agent: UserAgent => "userAgent",
    }
}

record! {
    /// Opening message of a discussion.
    pub struct Post as POST {
        id: i64,
        discussion_id: i64,
        user_id: i64,
        created_at: String,
        updated_at: String,
        user: User,
        body: Body,
    }
}

record! {
    /// Response of `GET /discussion/{id}`.
    pub struct DiscussionDetail as DISCUSSION_DETAIL {
        discussion: Discussion,
        post: Post,
    }
}

record! {
    pub struct Comment as COMMENT {
        id: i64,
        discussion_id: i64,
        user_id: i64,
        user: User,
        reply_id: i64,
        reply_user: User,
        /// Author role; some deployments send it as a number.
        role: String,
        created_at: String,
        updated_at: String,
        body: Body,
    }
}

record! {
    /// Response of `GET /discussion`.
    pub struct CategoryPage as CATEGORY_PAGE {
        current_page: i64,
        per_page: i64,
        from: i64,
        to: i64,
        path: String,
        first_page_url: String,
        next_page_url: String,
        prev_page_url: String,
        data: Vec<Discussion>,
    }
}

record! {
    /// Response of `GET /posts`.
    pub struct CommentPage as COMMENT_PAGE {
        current_page: i64,
        per_page: i64,
        from: i64,
        to: i64,
        path: String,
        first_page_url: String,
        next_page_url: String,
        prev_page_url: String,
        data: Vec<Comment>,
    }
}

/// Navigation shared by the paginated envelopes.
pub trait Envelope {
    type Item;

    fn current_page(&self) -> Option<i64>;
    fn next_page_url(&self) -> Option<&str>;
    fn prev_page_url(&self) -> Option<&str>;
    fn items(&self) -> &[Self::Item];

    fn has_next_page(&self) -> bool {
        self.next_page_url().is_some()
    }

    /// Page number of the next page, read from its navigation URL.
    fn next_page(&self) -> Option<i64> {
        self.next_page_url().and_then(page_from_url)
    }

    fn prev_page(&self) -> Option<i64> {
        self.prev_page_url().and_then(page_from_url)
    }
}

impl Envelope for CategoryPage {
    type Item = Discussion;

    fn current_page(&self) -> Option<i64> {
        self.current_page
    }

    fn next_page_url(&self) -> Option<&str> {
        self.next_page_url.as_deref()
    }

    fn prev_page_url(&self) -> Option<&str> {
        self.prev_page_url.as_deref()
    }

    fn items(&self) -> &[Discussion] {
        self.data.as_deref().unwrap_or_default()
    }
}

impl Envelope for CommentPage {
    type Item = Comment;

    fn current_page(&self) -> Option<i64> {
        self.current_page
    }

    fn next_page_url(&self) -> Option<&str> {
        self.next_page_url.as_deref()
    }

    fn prev_page_url(&self) -> Option<&str> {
        self.prev_page_url.as_deref()
    }

    fn items(&self) -> &[Comment] {
        self.data.as_deref().unwrap_or_default()
    }
}

impl Discussion {
    /// Section the thread belongs to. The payload carries it as `category_id`.
    pub fn category(&self) -> Option<Category> {
        let id = self.category_id?;
        Category::all().find(|c| c.as_api_str() == id.to_string())
    }

    pub fn created_at_timestamp(&self) -> Option<jiff::Timestamp> {
        self.created_at
            .as_deref()
            .and_then(crate::utils::datetime::parse_timestamp)
    }
}

impl Body {
    pub fn ops(&self) -> &[Op] {
        self.ops.as_deref().unwrap_or_default()
    }
}

/// Username shown when the input carries no author.
pub const UNKNOWN_USER: &str = "未知用户";

/// One top-level comment with its replies.
///
/// Identity is positional: the index in the parsed sequence. Values are never mutated after
/// parsing; layout produces a new wrapping value instead.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Comment {
    /// Display name without the leading `@`.
    pub username: String,
    /// Comment body.
    pub text: String,
    /// Like count; `None` hides the like badge.
    pub likes: Option<u64>,
    /// Free-form timestamp text.
    pub datetime: Option<String>,
    /// Replies in original order.
    pub replies: Vec<Reply>,
}

/// A reply owned by its parent [`Comment`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Reply {
    /// Display name without the leading `@`.
    pub username: String,
    /// Reply body.
    pub text: String,
    /// Free-form timestamp text.
    pub datetime: Option<String>,
}

impl Comment {
    /// Convenience constructor for a comment without replies.
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
            likes: Some(0),
            datetime: None,
            replies: Vec::new(),
        }
    }

    /// Set the like count.
    pub fn with_likes(mut self, likes: Option<u64>) -> Self {
        self.likes = likes;
        self
    }

    /// Set the timestamp text.
    pub fn with_datetime(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    /// Append a reply.
    pub fn with_reply(mut self, reply: Reply) -> Self {
        self.replies.push(reply);
        self
    }
}

impl Reply {
    /// Convenience constructor for a reply without a timestamp.
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
            datetime: None,
        }
    }

    /// Set the timestamp text.
    pub fn with_datetime(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }
}

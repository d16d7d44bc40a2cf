use serde::Deserialize;
use serde_json::Value;

use crate::comments::model::{Comment, Reply, UNKNOWN_USER};
use crate::foundation::error::{CardError, CardResult};

// Scalars stay untyped; `adapt_comment` coerces them.
#[derive(Deserialize)]
struct RawComment {
    #[serde(default)]
    author: Option<Value>,
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    like_count: Option<Value>,
    #[serde(default)]
    datetime: Option<Value>,
    #[serde(default)]
    replies: Option<Value>,
}

// Only these three reply fields survive; ids, parents, uploader flags etc. are dropped.
#[derive(Deserialize)]
struct RawReply {
    #[serde(default)]
    author: Option<Value>,
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    datetime: Option<Value>,
}

/// Parse comment-thread JSON into ordered [`Comment`] values.
///
/// Accepted shapes:
///
/// - a top-level array of comment objects
/// - an object whose `comments` field is such an array (a missing `comments` yields no comments)
///
/// Field mapping and defaults: `author → username` (empty or missing becomes
/// [`UNKNOWN_USER`]), `text` (missing becomes `""`), `like_count → likes` (missing or `null`
/// becomes `0`), `datetime` (empty or missing becomes `None`). Replies keep `author`, `text` and
/// `datetime` only; a `replies` value that is not an array is ignored. Unknown fields are ignored.
///
/// Scalars of the wrong type are adapted rather than rejected: numbers and `true` in text fields
/// are written out as text, `like_count` accepts floats (truncated), negatives (clamped to `0`)
/// and numeric strings. Anything else falls back to the field's default.
pub fn parse_comments(json_text: &str) -> CardResult<Vec<Comment>> {
    let trimmed = json_text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Err(CardError::parse(
            "unrecognized input format, expected a JSON array or object",
        ));
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| CardError::parse(format!("invalid JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("comments") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(CardError::parse(format!(
                    "`comments` must be an array, got {}",
                    json_kind(&other)
                )));
            }
        },
        other => {
            return Err(CardError::parse(format!(
                "expected a JSON array or object, got {}",
                json_kind(&other)
            )));
        }
    };

    let mut comments = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let raw: RawComment = serde_json::from_value(item)
            .map_err(|e| CardError::parse(format!("comment {idx}: {e}")))?;
        comments.push(adapt_comment(idx, raw)?);
    }

    tracing::debug!(comments = comments.len(), "parsed comment input");
    Ok(comments)
}

fn adapt_comment(idx: usize, raw: RawComment) -> CardResult<Comment> {
    let mut replies = Vec::new();
    if let Some(Value::Array(raw_replies)) = raw.replies {
        replies.reserve(raw_replies.len());
        for (reply_idx, value) in raw_replies.into_iter().enumerate() {
            let r: RawReply = serde_json::from_value(value)
                .map_err(|e| CardError::parse(format!("comment {idx}, reply {reply_idx}: {e}")))?;
            replies.push(Reply {
                username: username_or_default(r.author),
                text: text_field(r.text).unwrap_or_default(),
                datetime: text_field(r.datetime),
            });
        }
    }

    Ok(Comment {
        username: username_or_default(raw.author),
        text: text_field(raw.text).unwrap_or_default(),
        likes: Some(like_count(raw.like_count)),
        datetime: text_field(raw.datetime),
        replies,
    })
}

fn username_or_default(author: Option<Value>) -> String {
    text_field(author).unwrap_or_else(|| UNKNOWN_USER.to_string())
}

/// Text of a truthy scalar; `None` for `null`, `""`, `0`, `false` and containers.
fn text_field(v: Option<Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => {
            let f = n.as_f64()?;
            (f != 0.0).then(|| number_text(&n))
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

// Integral floats print without a fractional part, as they would in a browser.
fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
        && f.fract() == 0.0
        && f.abs() < 1e15
    {
        return format!("{}", f as i64);
    }
    n.to_string()
}

fn like_count(v: Option<Value>) -> u64 {
    match v {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|i| i.max(0) as u64))
            .or_else(|| n.as_f64().map(saturate_count))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(saturate_count))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

// `as` saturates and maps NaN to 0.
fn saturate_count(f: f64) -> u64 {
    f.max(0.0) as u64
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/comments/parse.rs"]
mod tests;

//! Git commit object
//!
//! Commits record a snapshot of the repository at a point in time:
//! - A tree object ID (directory snapshot)
//! - An optional parent commit ID
//! - Author and committer information
//! - A commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Root commits carry an empty `parent ` line. The message is stored
//! verbatim, without trailing newline normalization.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{ObjectError, ObjectResult};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

pub const DEFAULT_AUTHOR_NAME: &str = "bitstore";
pub const DEFAULT_AUTHOR_EMAIL: &str = "bitstore@localhost";

/// Author or committer information
///
/// Contains name, email, and timestamp with timezone information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current local time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Load author information from environment variables
    ///
    /// Reads GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL and GIT_AUTHOR_DATE, falling back
    /// to the default identity and the current time. An unparsable date is
    /// ignored.
    pub fn load_from_env() -> Self {
        let name = std::env::var("GIT_AUTHOR_NAME").unwrap_or_else(|_| DEFAULT_AUTHOR_NAME.into());
        let email =
            std::env::var("GIT_AUTHOR_EMAIL").unwrap_or_else(|_| DEFAULT_AUTHOR_EMAIL.into());

        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date| {
            let timestamp = parse_date(&date);
            if timestamp.is_none() {
                tracing::warn!(%date, "ignoring unparsable GIT_AUTHOR_DATE");
            }
            timestamp
        });

        match timestamp {
            Some(timestamp) => Author::new_with_timestamp(name, email, timestamp),
            None => Author::new(name, email),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

impl TryFrom<&str> for Author {
    type Error = ObjectError;

    fn try_from(value: &str) -> ObjectResult<Self> {
        // "name <email> timestamp timezone": split the date off the right
        let email_end = value
            .rfind('>')
            .ok_or_else(|| ObjectError::malformed(format!("author without email: {value:?}")))?;
        let email_start = value[..email_end]
            .rfind('<')
            .ok_or_else(|| ObjectError::malformed(format!("author without email: {value:?}")))?;

        let name = value[..email_start].trim().to_string();
        let email = value[email_start + 1..email_end].to_string();
        let timestamp = parse_raw_date(value[email_end + 1..].trim())
            .ok_or_else(|| ObjectError::malformed(format!("invalid author date: {value:?}")))?;

        Ok(Author::new_with_timestamp(name, email, timestamp))
    }
}

/// Parse `<unix-seconds> <+hhmm|-hhmm>`
fn parse_raw_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let (seconds, zone) = value.trim_start_matches('@').split_once(' ')?;
    let seconds = seconds.parse::<i64>().ok()?;

    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours = digits[..2].parse::<i32>().ok()?;
    let minutes = digits[2..].parse::<i32>().ok()?;
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;

    Some(DateTime::from_timestamp(seconds, 0)?.with_timezone(&offset))
}

fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    parse_raw_date(value)
        .or_else(|| DateTime::parse_from_rfc2822(value).ok())
        .or_else(|| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z").ok())
}

/// Git commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    tree_oid: ObjectId,
    parent: Option<ObjectId>,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit; the author is also recorded as committer
    pub fn new(tree_oid: ObjectId, parent: Option<ObjectId>, author: Author, message: String) -> Self {
        Commit {
            tree_oid,
            parent,
            committer: author.clone(),
            author,
            message,
        }
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        // root commits carry an empty parent line
        match &self.parent {
            Some(parent) => lines.push(format!("parent {parent}")),
            None => lines.push("parent ".to_string()),
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));

        lines
    }
}

impl Packable for Commit {
    fn payload(&self) -> Bytes {
        let mut content = self.header_lines().join("\n");
        content.push_str("\n\n");
        content.push_str(&self.message);

        Bytes::from(content)
    }
}

impl Unpackable for Commit {
    fn deserialize(payload: Bytes) -> ObjectResult<Self> {
        let content = std::str::from_utf8(&payload)
            .map_err(|_| ObjectError::malformed("commit is not valid UTF-8"))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| ObjectError::malformed("commit without blank line before message"))?;
        let mut lines = headers.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| ObjectError::malformed("commit without tree line"))?;
        let tree_oid = ObjectId::try_parse(tree_oid)?;

        let mut next_line = lines
            .next()
            .ok_or_else(|| ObjectError::malformed("commit without author line"))?;

        let mut parent = None;
        if let Some(parent_oid) = next_line
            .strip_prefix("parent")
            .filter(|rest| rest.is_empty() || rest.starts_with(' '))
        {
            // an empty parent line stands for a root commit
            let parent_oid = parent_oid.trim();
            if !parent_oid.is_empty() {
                parent = Some(ObjectId::try_parse(parent_oid)?);
            }
            next_line = lines
                .next()
                .ok_or_else(|| ObjectError::malformed("commit without author line"))?;
        }

        let author = next_line
            .strip_prefix("author ")
            .ok_or_else(|| ObjectError::malformed("commit without author line"))?;
        let author = Author::try_from(author)?;

        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .ok_or_else(|| ObjectError::malformed("commit without committer line"))?;
        let committer = Author::try_from(committer)?;

        Ok(Commit {
            tree_oid,
            parent,
            author,
            committer,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.payload()).into_owned()
    }
}

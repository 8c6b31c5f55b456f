//! Post read-back repository.
//!
//! # Responsibility
//! - Provide minimal get/list read APIs over persisted posts.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - All mutations go through the session save pipeline, never here.

use crate::model::{EntityMeta, Post, PostId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, Row};
use uuid::Uuid;

const POST_SELECT_SQL: &str = "SELECT
    id,
    title,
    slug,
    summary,
    content,
    created_at,
    created_by,
    updated_at,
    updated_by
FROM posts";

/// Repository interface for post read-back.
pub trait PostRepository {
    /// Gets one post by stable id.
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Lists posts, newest first.
    fn list_posts(&self) -> RepoResult<Vec<Post>>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(row)?));
        }

        Ok(None)
    }

    fn list_posts(&self) -> RepoResult<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} ORDER BY created_at DESC, id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in posts.id")))?;

    Ok(Post {
        id,
        title: row.get("title")?,
        slug: row.get("slug")?,
        summary: row.get("summary")?,
        content: row.get("content")?,
        meta: EntityMeta {
            created_at: row.get("created_at")?,
            created_by: row.get("created_by")?,
            updated_at: row.get("updated_at")?,
            updated_by: row.get("updated_by")?,
        },
    })
}

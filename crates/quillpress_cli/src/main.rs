//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable that runs one audited commit against
//!   an in-memory store.
//! - Keep output deterministic for quick local sanity checks.

use quillpress_core::db::open_db_in_memory;
use quillpress_core::{Actor, CommitContext, Post, PostRepository, Session, SqlitePostRepository};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = open_db_in_memory()?;

    let post = Post::new("Hello QuillPress", "hello-quillpress", "First committed body");
    let rows_affected = {
        let mut session = Session::new(&mut conn);
        session.stage_insert(&post)?;
        session.save_changes(&CommitContext::authenticated(
            Actor::new("smoke-probe", "Smoke Probe"),
            1_700_000_000_000,
        ))?
    };

    let posts = SqlitePostRepository::new(&conn).list_posts()?;

    println!("quillpress_core version={}", quillpress_core::core_version());
    println!("posts={} rows_affected={rows_affected}", posts.len());
    Ok(())
}

use quillpress_core::db::open_db_in_memory;
use quillpress_core::{
    Actor, AuditPolicy, Category, CommitContext, Post, PostCategory, PostRepository, SaveError,
    Session, SqlitePostRepository,
};
use rusqlite::Connection;
use serde_json::Value as JsonValue;

fn editor() -> Actor {
    Actor::new("editor-1", "Editor One")
}

fn first_post() -> Post {
    let mut post = Post::new("First Post", "first-post", "This is a big content");
    post.summary = Some("This is a first post".to_string());
    post
}

struct AuditRow {
    table_name: String,
    audit_kind: String,
    key_values: JsonValue,
    old_values: Option<JsonValue>,
    new_values: Option<JsonValue>,
    changed_columns: Option<JsonValue>,
    user_id: Option<String>,
    user_name: Option<String>,
    recorded_at: i64,
}

fn audit_rows(conn: &Connection) -> Vec<AuditRow> {
    let mut stmt = conn
        .prepare(
            "SELECT
                table_name,
                audit_kind,
                key_values,
                old_values,
                new_values,
                changed_columns,
                user_id,
                user_name,
                recorded_at
             FROM audit_trail
             ORDER BY rowid ASC;",
        )
        .unwrap();

    let mut rows = stmt.query([]).unwrap();
    let mut records = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        records.push(AuditRow {
            table_name: row.get("table_name").unwrap(),
            audit_kind: row.get("audit_kind").unwrap(),
            key_values: parse_json(row.get("key_values").unwrap()),
            old_values: parse_optional_json(row.get("old_values").unwrap()),
            new_values: parse_optional_json(row.get("new_values").unwrap()),
            changed_columns: parse_optional_json(row.get("changed_columns").unwrap()),
            user_id: row.get("user_id").unwrap(),
            user_name: row.get("user_name").unwrap(),
            recorded_at: row.get("recorded_at").unwrap(),
        });
    }
    records
}

fn parse_json(text: String) -> JsonValue {
    serde_json::from_str(&text).unwrap()
}

fn parse_optional_json(text: Option<String>) -> Option<JsonValue> {
    text.map(parse_json)
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn create_commit_writes_post_and_audit_row_atomically() {
    let mut conn = open_db_in_memory().unwrap();
    let post = first_post();

    let rows_affected = {
        let mut session = Session::new(&mut conn);
        session.stage_insert(&post).unwrap();
        session
            .save_changes(&CommitContext::authenticated(editor(), 1_000))
            .unwrap()
    };
    assert_eq!(rows_affected, 2);

    let stored = SqlitePostRepository::new(&conn)
        .get_post(post.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "First Post");
    assert_eq!(stored.meta.created_at, Some(1_000));
    assert_eq!(stored.meta.created_by.as_deref(), Some("editor-1"));
    assert_eq!(stored.meta.updated_at, None);
    assert_eq!(stored.meta.updated_by, None);

    let records = audit_rows(&conn);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.table_name, "posts");
    assert_eq!(record.audit_kind, "create");
    assert_eq!(record.key_values["id"], post.id.to_string().as_str());
    let new_values = record.new_values.as_ref().unwrap();
    assert_eq!(new_values["title"], "First Post");
    assert_eq!(new_values["slug"], "first-post");
    assert_eq!(new_values["summary"], "This is a first post");
    assert!(new_values.get("id").is_none());
    assert!(new_values.get("created_at").is_none());
    assert!(record.old_values.is_none());
    assert!(record.changed_columns.is_none());
    assert_eq!(record.user_id.as_deref(), Some("editor-1"));
    assert_eq!(record.user_name.as_deref(), Some("Editor One"));
    assert_eq!(record.recorded_at, 1_000);
}

#[test]
fn update_commit_captures_only_changed_columns() {
    let mut conn = open_db_in_memory().unwrap();
    let post = first_post();
    {
        let mut session = Session::new(&mut conn);
        session.stage_insert(&post).unwrap();
        session
            .save_changes(&CommitContext::authenticated(editor(), 1_000))
            .unwrap();
    }

    let stored = SqlitePostRepository::new(&conn)
        .get_post(post.id)
        .unwrap()
        .unwrap();
    let mut updated = stored.clone();
    updated.title = "Updated Post".to_string();
    {
        let mut session = Session::new(&mut conn);
        session.stage_update(&stored, &updated).unwrap();
        let rows_affected = session
            .save_changes(&CommitContext::authenticated(editor(), 2_000))
            .unwrap();
        assert_eq!(rows_affected, 2);
    }

    let reread = SqlitePostRepository::new(&conn)
        .get_post(post.id)
        .unwrap()
        .unwrap();
    assert_eq!(reread.title, "Updated Post");
    assert_eq!(reread.meta.created_at, Some(1_000));
    assert_eq!(reread.meta.updated_at, Some(2_000));
    assert_eq!(reread.meta.updated_by.as_deref(), Some("editor-1"));

    let records = audit_rows(&conn);
    assert_eq!(records.len(), 2);
    let record = &records[1];
    assert_eq!(record.audit_kind, "update");
    assert_eq!(record.key_values["id"], post.id.to_string().as_str());
    assert_eq!(
        record.changed_columns,
        Some(JsonValue::from(vec!["title"]))
    );
    assert_eq!(record.old_values.as_ref().unwrap()["title"], "First Post");
    assert_eq!(record.new_values.as_ref().unwrap()["title"], "Updated Post");
    assert_eq!(record.recorded_at, 2_000);
}

#[test]
fn delete_commit_captures_prior_values() {
    let mut conn = open_db_in_memory().unwrap();
    let post = first_post();
    {
        let mut session = Session::new(&mut conn);
        session.stage_insert(&post).unwrap();
        session
            .save_changes(&CommitContext::authenticated(editor(), 1_000))
            .unwrap();
    }

    let stored = SqlitePostRepository::new(&conn)
        .get_post(post.id)
        .unwrap()
        .unwrap();
    {
        let mut session = Session::new(&mut conn);
        session.stage_delete(&stored);
        session
            .save_changes(&CommitContext::authenticated(editor(), 3_000))
            .unwrap();
    }

    assert_eq!(count(&conn, "posts"), 0);

    let records = audit_rows(&conn);
    assert_eq!(records.len(), 2);
    let record = &records[1];
    assert_eq!(record.audit_kind, "delete");
    assert_eq!(record.key_values["id"], post.id.to_string().as_str());
    let old_values = record.old_values.as_ref().unwrap();
    assert_eq!(old_values["title"], "First Post");
    assert_eq!(old_values["slug"], "first-post");
    assert_eq!(old_values["content"], "This is a big content");
    assert!(record.new_values.is_none());
    assert!(record.changed_columns.is_none());
}

#[test]
fn empty_commit_is_a_no_op() {
    let mut conn = open_db_in_memory().unwrap();

    let rows_affected = {
        let mut session = Session::new(&mut conn);
        session
            .save_changes(&CommitContext::authenticated(editor(), 1_000))
            .unwrap()
    };

    assert_eq!(rows_affected, 0);
    assert_eq!(count(&conn, "audit_trail"), 0);
}

#[test]
fn failed_commit_leaves_no_audit_rows_behind() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut session = Session::new(&mut conn);
        session.stage_insert(&first_post()).unwrap();
        session
            .save_changes(&CommitContext::authenticated(editor(), 1_000))
            .unwrap();
    }
    assert_eq!(count(&conn, "audit_trail"), 1);

    // Second insert reuses an existing slug, so the batch fails after its
    // audit rows were already staged.
    let fresh = Post::new("Another Post", "another-post", "body");
    let duplicate = Post::new("Duplicate Slug", "first-post", "body");
    {
        let mut session = Session::new(&mut conn);
        session.stage_insert(&fresh).unwrap();
        session.stage_insert(&duplicate).unwrap();
        let err = session
            .save_changes(&CommitContext::authenticated(editor(), 2_000))
            .unwrap_err();
        assert!(matches!(err, SaveError::Repo(_)));
        assert_eq!(session.pending_count(), 2);
    }

    assert_eq!(count(&conn, "posts"), 1);
    assert_eq!(count(&conn, "audit_trail"), 1);
}

#[test]
fn update_of_missing_row_rolls_back_staged_audit() {
    let mut conn = open_db_in_memory().unwrap();

    let before = first_post();
    let mut after = before.clone();
    after.title = "Updated Post".to_string();
    {
        let mut session = Session::new(&mut conn);
        session.stage_update(&before, &after).unwrap();
        let err = session
            .save_changes(&CommitContext::authenticated(editor(), 2_000))
            .unwrap_err();
        assert!(matches!(err, SaveError::Repo(_)));
    }

    assert_eq!(count(&conn, "audit_trail"), 0);
}

#[test]
fn anonymous_commit_skips_audit_capture_by_default() {
    let mut conn = open_db_in_memory().unwrap();
    let post = first_post();

    let rows_affected = {
        let mut session = Session::new(&mut conn);
        session.stage_insert(&post).unwrap();
        session
            .save_changes(&CommitContext::anonymous(1_000))
            .unwrap()
    };

    assert_eq!(rows_affected, 1);
    assert_eq!(count(&conn, "audit_trail"), 0);

    let stored = SqlitePostRepository::new(&conn)
        .get_post(post.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.meta.created_at, Some(1_000));
    assert_eq!(stored.meta.created_by, None);
}

#[test]
fn anonymous_commit_can_be_captured_by_policy() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let mut session = Session::with_policy(&mut conn, AuditPolicy::CaptureAnonymous);
        session.stage_insert(&first_post()).unwrap();
        session
            .save_changes(&CommitContext::anonymous(1_000))
            .unwrap();
    }

    let records = audit_rows(&conn);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].audit_kind, "create");
    assert_eq!(records[0].user_id, None);
    assert_eq!(records[0].user_name, None);
}

#[test]
fn update_without_changes_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let post = first_post();
    {
        let mut session = Session::new(&mut conn);
        session.stage_insert(&post).unwrap();
        session
            .save_changes(&CommitContext::authenticated(editor(), 1_000))
            .unwrap();
    }

    let stored = SqlitePostRepository::new(&conn)
        .get_post(post.id)
        .unwrap()
        .unwrap();
    let rows_affected = {
        let mut session = Session::new(&mut conn);
        session.stage_update(&stored, &stored.clone()).unwrap();
        session
            .save_changes(&CommitContext::authenticated(editor(), 2_000))
            .unwrap()
    };

    assert_eq!(rows_affected, 0);
    assert_eq!(count(&conn, "audit_trail"), 1);

    let reread = SqlitePostRepository::new(&conn)
        .get_post(post.id)
        .unwrap()
        .unwrap();
    assert_eq!(reread.meta.updated_at, None);
}

#[test]
fn composite_key_link_rows_audit_both_keys() {
    let mut conn = open_db_in_memory().unwrap();
    let post = first_post();
    let category = Category::new("News", "news");
    let link = PostCategory::new(post.id, category.id);

    let rows_affected = {
        let mut session = Session::new(&mut conn);
        session.stage_insert(&post).unwrap();
        session.stage_insert(&category).unwrap();
        session.stage_insert(&link).unwrap();
        session
            .save_changes(&CommitContext::authenticated(editor(), 1_000))
            .unwrap()
    };
    assert_eq!(rows_affected, 6);

    let records = audit_rows(&conn);
    assert_eq!(records.len(), 3);
    let link_record = records
        .iter()
        .find(|record| record.table_name == "post_categories")
        .unwrap();
    assert_eq!(link_record.audit_kind, "create");
    assert_eq!(
        link_record.key_values["post_id"],
        post.id.to_string().as_str()
    );
    assert_eq!(
        link_record.key_values["category_id"],
        category.id.to_string().as_str()
    );
    assert!(link_record.new_values.is_none());
}

#[test]
fn staging_validates_before_anything_is_written() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let mut session = Session::new(&mut conn);
        let err = session
            .stage_insert(&Post::new("First Post", "Bad Slug", "body"))
            .unwrap_err();
        assert!(matches!(err, SaveError::Validation(_)));
        assert_eq!(session.pending_count(), 0);
    }

    assert_eq!(count(&conn, "posts"), 0);
}

use quillpress_core::{Category, ModelValidationError, Post, Record};

#[test]
fn new_post_starts_without_attribution() {
    let post = Post::new("First Post", "first-post", "This is a big content");

    assert_eq!(post.summary, None);
    assert_eq!(post.meta.created_at, None);
    assert_eq!(post.meta.created_by, None);
    assert_eq!(post.meta.updated_at, None);
    assert_eq!(post.meta.updated_by, None);
}

#[test]
fn valid_post_passes_validation() {
    let mut post = Post::new("First Post", "first-post", "This is a big content");
    post.summary = Some("This is a first post".to_string());

    assert!(post.validate().is_ok());
}

#[test]
fn empty_title_is_rejected() {
    let post = Post::new("   ", "first-post", "body");

    let err = post.validate().unwrap_err();
    assert_eq!(
        err,
        ModelValidationError::EmptyField {
            entity: "posts",
            field: "title",
        }
    );
}

#[test]
fn malformed_slugs_are_rejected() {
    for slug in ["First-Post", "first post", "a--b", "-first", "first-", ""] {
        let post = Post::new("First Post", slug, "body");
        let err = post.validate().unwrap_err();
        assert_eq!(
            err,
            ModelValidationError::InvalidSlug {
                entity: "posts",
                value: slug.to_string(),
            },
            "slug `{slug}` should be rejected"
        );
    }
}

#[test]
fn well_formed_slugs_are_accepted() {
    for slug in ["a", "1", "first-post", "a-1-b2"] {
        let post = Post::new("First Post", slug, "body");
        assert!(post.validate().is_ok(), "slug `{slug}` should be accepted");
    }
}

#[test]
fn category_requires_name_and_slug() {
    assert!(Category::new("News", "news").validate().is_ok());

    let unnamed = Category::new("", "news");
    assert_eq!(
        unnamed.validate().unwrap_err(),
        ModelValidationError::EmptyField {
            entity: "categories",
            field: "name",
        }
    );

    let bad_slug = Category::new("News", "News!");
    assert_eq!(
        bad_slug.validate().unwrap_err(),
        ModelValidationError::InvalidSlug {
            entity: "categories",
            value: "News!".to_string(),
        }
    );
}

mod common;

use bindery_core::prelude::*;
use bindery_core::ResourceLoader;
use common::*;
use std::sync::Arc;

#[tokio::test]
async fn test_load_by_primary_key() {
    let mut ctx = bound_context("posts/:post", "PostsController", "show", &[("post", "1")]);

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[post_slot()]).await.unwrap();
    let resources = loader.into_resources();

    let post = resources.get_as::<Post>("post").unwrap();
    assert_eq!(post.id, 1);
    assert_eq!(post.slug, "hello-world");
}

#[tokio::test]
async fn test_load_by_model_lookup_key() {
    let mut ctx = bound_context(
        "posts/:post",
        "PostsController",
        "show",
        &[("post", "second-post")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[ModelSlot::model(PostModel::by_slug())]).await.unwrap();

    let post = loader.resources().get_as::<Post>("post").unwrap();
    assert_eq!(post.id, 2);
}

#[tokio::test]
async fn test_route_lookup_key_wins_over_model_lookup_key() {
    let mut ctx = bound_context(
        "posts/:post(title)",
        "PostsController",
        "show",
        &[("post(title)", "Hello world")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[ModelSlot::model(PostModel::by_slug())]).await.unwrap();
    let resources = loader.into_resources();

    assert_eq!(resources.get_as::<Post>("post").unwrap().id, 1);
    // 原始 token 被改写为规范名称
    assert_eq!(ctx.params.get("post"), Some("Hello world"));
    assert!(!ctx.params.contains("post(title)"));
}

#[tokio::test]
async fn test_missing_row_is_not_found() {
    let mut ctx = bound_context("posts/:post", "PostsController", "show", &[("post", "42")]);

    let mut loader = ResourceLoader::new(&mut ctx);
    let err = loader.load(&[post_slot()]).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Row not found: no \"Post\" where \"id\" = \"42\"");
}

#[tokio::test]
async fn test_load_scoped_resource_through_relation() {
    let mut ctx = bound_context(
        "posts/:post/comments/:>comment",
        "CommentsController",
        "show",
        &[("post", "1"), (">comment", "2")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[post_slot(), comment_slot()]).await.unwrap();
    let resources = loader.into_resources();

    assert_eq!(resources.get_as::<Post>("post").unwrap().id, 1);
    let comment = resources.get_as::<Comment>("comment").unwrap();
    assert_eq!(comment.id, 2);
    assert_eq!(comment.post_id, 1);
    assert_eq!(ctx.params.get("comment"), Some("2"));
    assert!(!ctx.params.contains(">comment"));
}

#[tokio::test]
async fn test_scoped_resource_of_another_parent_is_not_found() {
    // comment 3 属于 post 2
    let mut ctx = bound_context(
        "posts/:post/comments/:>comment",
        "CommentsController",
        "show",
        &[("post", "1"), (">comment", "3")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    let err = loader.load(&[post_slot(), comment_slot()]).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_scoped_resource_with_custom_key() {
    let mut ctx = bound_context(
        "posts/:post(slug)/comments/:>comment(slug)",
        "CommentsController",
        "show",
        &[("post(slug)", "hello-world"), (">comment(slug)", "second")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[post_slot(), comment_slot()]).await.unwrap();
    let resources = loader.into_resources();

    assert_eq!(resources.get_as::<Comment>("comment").unwrap().id, 2);
    assert_eq!(ctx.params.get("post"), Some("hello-world"));
    assert_eq!(ctx.params.get("comment"), Some("second"));
}

#[tokio::test]
async fn test_missing_relationship() {
    let mut ctx = bound_context(
        "posts/:post/comments/:>comment",
        "CommentsController",
        "show",
        &[("post", "1"), (">comment", "1")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    let err = loader
        .load(&[ModelSlot::model(PostModel::without_relations()), comment_slot()])
        .await
        .unwrap_err();

    assert_eq!(err.code(), "E_MISSING_RELATIONSHIP");
    assert_eq!(
        err.to_string(),
        "Cannot load \"comment\" for route \"posts/:post/comments/:>comment\". Make sure to define it as a relationship on model \"Post\""
    );
}

async fn load_member(pattern: &str, token: &str) -> BindingResult<Arc<Member>> {
    let mut ctx = bound_context(
        pattern,
        "RestaurantsController",
        "show",
        &[("restaurant", "1"), (token, "7")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[restaurant_slot(), member_slot()]).await?;
    let name = token.trim_start_matches('>');
    Ok(loader.resources().get_as::<Member>(name).unwrap())
}

#[tokio::test]
async fn test_scoped_param_resolves_plural_relation() {
    let chef = load_member("restaurants/:restaurant/chefs/:>chef", ">chef").await.unwrap();
    assert_eq!(chef.relation, "chefs");
    assert_eq!(chef.column, "id");
    assert_eq!(chef.value, "7");

    let roof = load_member("restaurants/:restaurant/roofs/:>roof", ">roof").await.unwrap();
    assert_eq!(roof.relation, "roofs");

    let quiz = load_member("restaurants/:restaurant/quizzes/:>quiz", ">quiz").await.unwrap();
    assert_eq!(quiz.relation, "quizzes");
}

#[tokio::test]
async fn test_scoped_param_resolves_camel_case_relation() {
    let post = load_member("restaurants/:restaurant/posts/:>blog_post", ">blog_post")
        .await
        .unwrap();
    assert_eq!(post.relation, "blogPost");

    let item = load_member("restaurants/:restaurant/items/:>line_item", ">line_item")
        .await
        .unwrap();
    assert_eq!(item.relation, "lineItems");
}

#[tokio::test]
async fn test_unknown_relation_on_restaurant() {
    let err = load_member("restaurants/:restaurant/tables/:>table", ">table")
        .await
        .unwrap_err();

    assert_eq!(err.code(), "E_MISSING_RELATIONSHIP");
    assert!(err.to_string().contains("model \"Restaurant\""));
}

#[tokio::test]
async fn test_skip_slot_leaves_resource_unset() {
    let mut ctx = bound_context(
        "posts/:post/comments/:comment",
        "CommentsController",
        "show",
        &[("post", "1"), ("comment", "3")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[ModelSlot::Skip, comment_slot()]).await.unwrap();
    let resources = loader.into_resources();

    assert!(!resources.contains("post"));
    assert_eq!(resources.get_as::<Comment>("comment").unwrap().id, 3);
}

#[tokio::test]
async fn test_fewer_slots_than_params() {
    let mut ctx = bound_context(
        "posts/:post/comments/:comment",
        "CommentsController",
        "show",
        &[("post", "1"), ("comment", "3")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[post_slot()]).await.unwrap();

    assert_eq!(loader.resources().len(), 1);
    assert!(loader.resources().contains("post"));
}

#[tokio::test]
async fn test_absent_and_null_values_are_skipped() {
    let mut ctx = bound_context("posts/:post/comments/:comment", "CommentsController", "show", &[]);
    ctx.params.set_null("comment");

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[post_slot(), comment_slot()]).await.unwrap();

    assert!(loader.resources().is_empty());
}

#[tokio::test]
async fn test_empty_string_is_a_value() {
    let mut ctx = bound_context("posts/:post", "PostsController", "show", &[("post", "")]);

    let mut loader = ResourceLoader::new(&mut ctx);
    let err = loader.load(&[post_slot()]).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_scoped_param_without_loaded_parent() {
    let mut ctx = bound_context(
        "posts/:post/comments/:>comment",
        "CommentsController",
        "show",
        &[("post", "1"), (">comment", "1")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    let err = loader.load(&[ModelSlot::Skip, comment_slot()]).await.unwrap_err();

    assert!(matches!(
        &err,
        BindingError::MissingParentResource { param, parent, .. } if param == "comment" && parent == "post"
    ));
}

#[tokio::test]
async fn test_first_param_scoped_fails_before_lookup() {
    let mut ctx = bound_context(
        "/:>post/comments/:>comment",
        "CommentsController",
        "show",
        &[(">post", "1"), (">comment", "1")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    let err = loader.load(&[post_slot(), comment_slot()]).await.unwrap_err();

    assert_eq!(err.code(), "E_SCOPED_FIRST_PARAM");
    assert!(loader.resources().is_empty());
}

#[tokio::test]
async fn test_request_finder_takes_priority() {
    let mut ctx = bound_context(
        "users/:user(id)",
        "UsersController",
        "show",
        &[("user(id)", "linus@example.com")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[user_slot()]).await.unwrap();

    assert_eq!(loader.resources().get_as::<User>("user").unwrap().id, 2);
}

#[tokio::test]
async fn test_related_finder_takes_priority() {
    let mut ctx = bound_context(
        "users/:user/comments/:>comment",
        "UsersController",
        "comment",
        &[("user", "me"), (">comment", "3")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    loader.load(&[user_slot(), comment_slot()]).await.unwrap();
    assert_eq!(loader.resources().get_as::<Comment>("comment").unwrap().id, 3);

    // comment 2 不是用户 1 写的
    let mut ctx = bound_context(
        "users/:user/comments/:>comment",
        "UsersController",
        "comment",
        &[("user", "me"), (">comment", "2")],
    );
    let mut loader = ResourceLoader::new(&mut ctx);
    let err = loader.load(&[user_slot(), comment_slot()]).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_rewrite_can_be_disabled() {
    let mut ctx = bound_context(
        "posts/:post(slug)",
        "PostsController",
        "show",
        &[("post(slug)", "hello-world")],
    );

    let mut loader = ResourceLoader::new(&mut ctx).rewrite_params(false);
    loader.load(&[post_slot()]).await.unwrap();
    assert!(loader.resources().contains("post"));
    drop(loader);

    assert_eq!(ctx.params.get("post(slug)"), Some("hello-world"));
    assert!(!ctx.params.contains("post"));
}

#[tokio::test]
async fn test_params_are_not_rewritten_on_failure() {
    let mut ctx = bound_context(
        "posts/:post(slug)",
        "PostsController",
        "show",
        &[("post(slug)", "missing")],
    );

    let mut loader = ResourceLoader::new(&mut ctx);
    assert!(loader.load(&[post_slot()]).await.is_err());
    drop(loader);

    assert!(ctx.params.contains("post(slug)"));
}

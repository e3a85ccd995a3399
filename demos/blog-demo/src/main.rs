//! 博客示例
//!
//! 启动后可以访问：
//!
//! - `GET  /users/me`、`GET /users/ada@example.com`
//! - `GET  /users/me/posts/hello-bindery` - 只能加载该用户写的文章
//! - `GET  /posts/hello-bindery`、`GET /post-ids/1`
//! - `GET  /posts/hello-bindery/comments/1` - 评论必须属于该文章
//! - `POST /posts/hello-bindery/comments`
//! - `GET  /health` - 内联路由，不做资源加载

mod controllers;
mod models;

use bindery_core::prelude::*;
use bindery_core::{BindingProperties, Environment, LoggingConfig};
use bindery_web::prelude::*;
use std::path::Path as FsPath;
use std::sync::Arc;

use controllers::{CommentsController, PostsController, UsersController};
use models::{Comment, NewComment, Post, User};

type ApiResult<T> = Result<Json<T>, BindingRejection>;

fn resource<T: ModelRow>(args: &BoundArguments, index: usize, name: &str) -> Result<Arc<T>, BindingRejection> {
    args.get_as::<T>(index)
        .ok_or_else(|| BindingRejection::MissingResource(name.to_string()))
}

async fn show_user(ctx: BoundContext, args: BoundArguments) -> ApiResult<User> {
    let user = resource::<User>(&args, 0, "user")?;
    Ok(Json(UsersController.show(&ctx, user).await))
}

async fn show_user_post(ctx: BoundContext, resources: Resources) -> ApiResult<Post> {
    let user = resources.require::<User>("user")?;
    let post = resources.require::<Post>("post")?;
    Ok(Json(UsersController.post(&ctx, user, post).await))
}

async fn show_post(ctx: BoundContext, args: BoundArguments) -> ApiResult<Post> {
    let post = resource::<Post>(&args, 0, "post")?;
    Ok(Json(PostsController.show(&ctx, post).await))
}

async fn show_post_by_id(ctx: BoundContext, args: BoundArguments) -> ApiResult<Post> {
    let post = resource::<Post>(&args, 0, "post")?;
    Ok(Json(PostsController.show_by_id(&ctx, post).await))
}

async fn list_comments(ctx: BoundContext, args: BoundArguments) -> ApiResult<Vec<Comment>> {
    let post = resource::<Post>(&args, 0, "post")?;
    Ok(Json(CommentsController.index(&ctx, post).await))
}

async fn show_comment(ctx: BoundContext, args: BoundArguments) -> ApiResult<Comment> {
    let post = resource::<Post>(&args, 0, "post")?;
    let comment = resource::<Comment>(&args, 1, "comment")?;
    Ok(Json(CommentsController.show(&ctx, post, comment).await))
}

async fn create_comment(
    ctx: BoundContext,
    args: BoundArguments,
    Json(input): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>), BindingRejection> {
    let post = resource::<Post>(&args, 0, "post")?;
    let comment = CommentsController.create(&ctx, post, input).await;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_file = FsPath::new("config/application.toml");
    let env = Environment::standard(config_file.exists().then_some(config_file), "BLOG_")?;

    LoggingConfig::from_environment(&env).init()?;

    let registry = BindingRegistry::from_inventory()?;
    let middleware = BindingMiddleware::new(Arc::new(registry))
        .with_properties(BindingProperties::from_environment(&env));

    let app = BoundRouter::new()
        .get::<UsersController, _, _>("/users/:user", "show", show_user)
        .get::<UsersController, _, _>("/users/:user/posts/:>post", "post", show_user_post)
        .get::<PostsController, _, _>("/posts/:post", "show", show_post)
        .get::<PostsController, _, _>("/post-ids/:post(id)", "show_by_id", show_post_by_id)
        .get::<CommentsController, _, _>("/posts/:post/comments", "index", list_comments)
        .post::<CommentsController, _, _>("/posts/:post/comments", "create", create_comment)
        .get::<CommentsController, _, _>("/posts/:post/comments/:>comment", "show", show_comment)
        .inline("/health", get(|| async { "ok" }))
        .into_router(middleware);

    serve(app, &ServerProperties::from_environment(&env)).await
}

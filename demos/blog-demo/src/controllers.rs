//! 博客示例控制器
//!
//! 控制器方法的第一个参数是请求 context，之后的参数按路由参数的顺序由绑定中间件加载。

use bindery_core::prelude::*;
use bindery_macros::bindings;
use std::sync::Arc;

use crate::models::{store, Comment, NewComment, Post, User};

pub struct UsersController;

#[bindings]
impl UsersController {
    /// GET /users/:user
    #[bind]
    pub async fn show(&self, _ctx: &HttpContext, user: Arc<User>) -> User {
        user.as_ref().clone()
    }

    /// GET /users/:user/posts/:>post
    #[bind]
    pub async fn post(&self, _ctx: &HttpContext, _user: Arc<User>, post: Arc<Post>) -> Post {
        post.as_ref().clone()
    }
}

pub struct PostsController;

#[bindings]
impl PostsController {
    /// GET /posts/:post
    #[bind]
    pub async fn show(&self, _ctx: &HttpContext, post: Arc<Post>) -> Post {
        post.as_ref().clone()
    }

    /// GET /post-ids/:post(id)
    #[bind]
    pub async fn show_by_id(&self, _ctx: &HttpContext, post: Arc<Post>) -> Post {
        post.as_ref().clone()
    }
}

/// 评论接口继承文章接口的绑定声明
pub struct CommentsController;

#[bindings(extends = PostsController)]
impl CommentsController {
    /// GET /posts/:post/comments
    #[bind]
    pub async fn index(&self, _ctx: &HttpContext, post: Arc<Post>) -> Vec<Comment> {
        store().read().comments_of(post.id)
    }

    /// GET /posts/:post/comments/:>comment
    #[bind]
    pub async fn show(&self, _ctx: &HttpContext, _post: Arc<Post>, comment: Arc<Comment>) -> Comment {
        comment.as_ref().clone()
    }

    /// POST /posts/:post/comments
    #[bind(Post)]
    pub async fn create(&self, ctx: &HttpContext, post: Arc<Post>, input: NewComment) -> Comment {
        let comment = store().write().add_comment(post.id, input);
        tracing::info!(
            route = ctx.route_pattern().unwrap_or_default(),
            post = post.id,
            comment = comment.id,
            "Comment created"
        );
        comment
    }
}

//! 博客示例的内存数据层
//!
//! - `User` 支持 `me` 别名和按 email 查找
//! - `Post` 默认按 slug 查找，声明了 `comments` 关联
//! - `Comment` 只能通过所属的 Post 加载

use bindery_core::prelude::*;
use bindery_core::Param;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: u64,
    pub author_id: u64,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub author_id: u64,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub author_id: u64,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct BlogStore {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl BlogStore {
    fn seeded() -> Self {
        Self {
            users: vec![
                User {
                    id: 1,
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                },
                User {
                    id: 2,
                    name: "Linus".into(),
                    email: "linus@example.com".into(),
                },
            ],
            posts: vec![
                Post {
                    id: 1,
                    author_id: 1,
                    slug: "hello-bindery".into(),
                    title: "Hello, Bindery".into(),
                },
                Post {
                    id: 2,
                    author_id: 2,
                    slug: "scoped-bindings".into(),
                    title: "Scoped bindings".into(),
                },
            ],
            comments: vec![
                Comment {
                    id: 1,
                    post_id: 1,
                    author_id: 2,
                    body: "Nice intro".into(),
                },
                Comment {
                    id: 2,
                    post_id: 2,
                    author_id: 1,
                    body: "Very useful".into(),
                },
            ],
        }
    }

    pub fn add_comment(&mut self, post_id: u64, input: NewComment) -> Comment {
        let id = self.comments.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let comment = Comment {
            id,
            post_id,
            author_id: input.author_id,
            body: input.body,
        };
        self.comments.push(comment.clone());
        comment
    }

    pub fn comments_of(&self, post_id: u64) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }
}

pub fn store() -> &'static RwLock<BlogStore> {
    static STORE: OnceLock<RwLock<BlogStore>> = OnceLock::new();
    STORE.get_or_init(|| RwLock::new(BlogStore::seeded()))
}

fn column_matches(column: &str, value: &str, attr: impl Fn(&str) -> Option<String>) -> bool {
    attr(column).as_deref() == Some(value)
}

impl User {
    fn attr(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "email" => Some(self.email.clone()),
            _ => None,
        }
    }
}

impl Post {
    fn attr(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "slug" => Some(self.slug.clone()),
            _ => None,
        }
    }
}

impl Comment {
    fn attr(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            _ => None,
        }
    }
}

// ==================== User ====================

pub struct UserModel;

#[async_trait]
impl RouteModel for UserModel {
    fn name(&self) -> &str {
        "User"
    }

    fn request_finder(&self) -> Option<&dyn FindForRequest> {
        Some(self)
    }

    async fn find_or_fail(&self, value: &str) -> BindingResult<Resource> {
        self.find_by_or_fail("id", value).await
    }

    async fn find_by_or_fail(&self, column: &str, value: &str) -> BindingResult<Resource> {
        store()
            .read()
            .users
            .iter()
            .find(|user| column_matches(column, value, |c| user.attr(c)))
            .map(|user| Arc::new(user.clone()) as Resource)
            .ok_or_else(|| BindingError::not_found("User", column, value))
    }
}

/// `me` 指向当前登录用户，其余值按 email 查找
#[async_trait]
impl FindForRequest for UserModel {
    async fn find_for_request(
        &self,
        _ctx: &HttpContext,
        param: &Param,
        value: &str,
    ) -> BindingResult<Resource> {
        match (value, param.lookup_key.attribute()) {
            ("me", _) => self.find_or_fail("1").await,
            (_, Some(column)) => self.find_by_or_fail(column, value).await,
            (_, None) => self.find_by_or_fail("email", value).await,
        }
    }
}

impl ModelRow for User {
    fn model_name(&self) -> &str {
        "User"
    }

    fn has_relation(&self, name: &str) -> bool {
        name == "posts"
    }

    fn related(&self, relation: &str) -> BindingResult<Box<dyn RelatedQuery>> {
        match relation {
            "posts" => Ok(Box::new(PostsOfUser { user_id: self.id })),
            other => Err(anyhow::anyhow!("User has no relation {}", other).into()),
        }
    }
}

impl BindTarget for User {
    fn slot_hint() -> SlotHint {
        SlotHint::model(UserModel)
    }
}

struct PostsOfUser {
    user_id: u64,
}

#[async_trait]
impl RelatedQuery for PostsOfUser {
    async fn first_where_or_fail(self: Box<Self>, column: &str, value: &str) -> BindingResult<Resource> {
        store()
            .read()
            .posts
            .iter()
            .filter(|post| post.author_id == self.user_id)
            .find(|post| column_matches(column, value, |c| post.attr(c)))
            .map(|post| Arc::new(post.clone()) as Resource)
            .ok_or_else(|| BindingError::not_found("Post", column, value))
    }
}

// ==================== Post ====================

pub struct PostModel;

#[async_trait]
impl RouteModel for PostModel {
    fn name(&self) -> &str {
        "Post"
    }

    fn route_lookup_key(&self) -> Option<&str> {
        Some("slug")
    }

    async fn find_or_fail(&self, value: &str) -> BindingResult<Resource> {
        self.find_by_or_fail("id", value).await
    }

    async fn find_by_or_fail(&self, column: &str, value: &str) -> BindingResult<Resource> {
        store()
            .read()
            .posts
            .iter()
            .find(|post| column_matches(column, value, |c| post.attr(c)))
            .map(|post| Arc::new(post.clone()) as Resource)
            .ok_or_else(|| BindingError::not_found("Post", column, value))
    }
}

impl ModelRow for Post {
    fn model_name(&self) -> &str {
        "Post"
    }

    fn has_relation(&self, name: &str) -> bool {
        name == "comments"
    }

    fn related(&self, relation: &str) -> BindingResult<Box<dyn RelatedQuery>> {
        match relation {
            "comments" => Ok(Box::new(CommentsOfPost { post_id: self.id })),
            other => Err(anyhow::anyhow!("Post has no relation {}", other).into()),
        }
    }
}

impl BindTarget for Post {
    fn slot_hint() -> SlotHint {
        SlotHint::model(PostModel)
    }
}

struct CommentsOfPost {
    post_id: u64,
}

#[async_trait]
impl RelatedQuery for CommentsOfPost {
    async fn first_where_or_fail(self: Box<Self>, column: &str, value: &str) -> BindingResult<Resource> {
        store()
            .read()
            .comments
            .iter()
            .filter(|comment| comment.post_id == self.post_id)
            .find(|comment| column_matches(column, value, |c| comment.attr(c)))
            .map(|comment| Arc::new(comment.clone()) as Resource)
            .ok_or_else(|| BindingError::not_found("Comment", column, value))
    }
}

// ==================== Comment ====================

pub struct CommentModel;

#[async_trait]
impl RouteModel for CommentModel {
    fn name(&self) -> &str {
        "Comment"
    }

    async fn find_or_fail(&self, value: &str) -> BindingResult<Resource> {
        self.find_by_or_fail("id", value).await
    }

    async fn find_by_or_fail(&self, column: &str, value: &str) -> BindingResult<Resource> {
        store()
            .read()
            .comments
            .iter()
            .find(|comment| column_matches(column, value, |c| comment.attr(c)))
            .map(|comment| Arc::new(comment.clone()) as Resource)
            .ok_or_else(|| BindingError::not_found("Comment", column, value))
    }
}

impl ModelRow for Comment {
    fn model_name(&self) -> &str {
        "Comment"
    }

    fn has_relation(&self, _name: &str) -> bool {
        false
    }

    fn related(&self, relation: &str) -> BindingResult<Box<dyn RelatedQuery>> {
        Err(anyhow::anyhow!("Comment has no relation {}", relation).into())
    }
}

impl BindTarget for Comment {
    fn slot_hint() -> SlotHint {
        SlotHint::model(CommentModel)
    }
}

//! 测试用的内存模型：Post / Comment / User
//!
//! - Post 声明了 `comments` 关联
//! - Comment 没有任何关联
//! - User 通过 FindForRequest / FindRelatedForRequest 自定义查找
//! - Restaurant 的关联名称需要 camelCase / 复数推导：`chefs`、`roofs`、`blogPost`、`lineItems`、`quizzes`

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use bindery_core::prelude::*;
use bindery_core::Param;

#[derive(Debug, Clone)]
pub struct Post {
    pub id: u64,
    pub slug: String,
    pub title: String,
    relations: bool,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub author_id: u64,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub email: String,
}

pub struct Store {
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub users: Vec<User>,
}

pub fn store() -> &'static Store {
    static STORE: OnceLock<Store> = OnceLock::new();
    STORE.get_or_init(|| Store {
        posts: vec![
            Post {
                id: 1,
                slug: "hello-world".into(),
                title: "Hello world".into(),
                relations: true,
            },
            Post {
                id: 2,
                slug: "second-post".into(),
                title: "Second post".into(),
                relations: true,
            },
        ],
        comments: vec![
            Comment {
                id: 1,
                post_id: 1,
                author_id: 1,
                slug: "first".into(),
            },
            Comment {
                id: 2,
                post_id: 1,
                author_id: 2,
                slug: "second".into(),
            },
            Comment {
                id: 3,
                post_id: 2,
                author_id: 1,
                slug: "third".into(),
            },
        ],
        users: vec![
            User {
                id: 1,
                email: "ada@example.com".into(),
            },
            User {
                id: 2,
                email: "linus@example.com".into(),
            },
        ],
    })
}

impl Post {
    fn attr(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "slug" => Some(self.slug.clone()),
            "title" => Some(self.title.clone()),
            _ => None,
        }
    }
}

impl Comment {
    fn attr(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "post_id" => Some(self.post_id.to_string()),
            "slug" => Some(self.slug.clone()),
            _ => None,
        }
    }
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

// ========== Post ==========

#[derive(Debug, Clone, Default)]
pub struct PostModel {
    pub lookup_key: Option<&'static str>,
    pub without_relations: bool,
}

impl PostModel {
    pub fn by_slug() -> Self {
        Self {
            lookup_key: Some("slug"),
            ..Self::default()
        }
    }

    pub fn without_relations() -> Self {
        Self {
            without_relations: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl RouteModel for PostModel {
    fn name(&self) -> &str {
        "Post"
    }

    fn route_lookup_key(&self) -> Option<&str> {
        self.lookup_key
    }

    async fn find_or_fail(&self, value: &str) -> BindingResult<Resource> {
        let key = self.primary_key().to_string();
        self.find_by_or_fail(&key, value).await
    }

    async fn find_by_or_fail(&self, column: &str, value: &str) -> BindingResult<Resource> {
        store()
            .posts
            .iter()
            .find(|post| post.attr(column).as_deref() == Some(value))
            .map(|post| {
                let mut post = post.clone();
                post.relations = !self.without_relations;
                Arc::new(post) as Resource
            })
            .ok_or_else(|| BindingError::not_found("Post", column, value))
    }
}

impl ModelRow for Post {
    fn model_name(&self) -> &str {
        "Post"
    }

    fn has_relation(&self, name: &str) -> bool {
        self.relations && name == "comments"
    }

    fn related(&self, relation: &str) -> BindingResult<Box<dyn RelatedQuery>> {
        match relation {
            "comments" if self.relations => Ok(Box::new(CommentsOfPost { post_id: self.id })),
            other => Err(anyhow::anyhow!("Post has no relation {}", other).into()),
        }
    }
}

impl BindTarget for Post {
    fn slot_hint() -> SlotHint {
        SlotHint::model(PostModel::default())
    }
}

pub struct CommentsOfPost {
    post_id: u64,
}

#[async_trait]
impl RelatedQuery for CommentsOfPost {
    async fn first_where_or_fail(self: Box<Self>, column: &str, value: &str) -> BindingResult<Resource> {
        store()
            .comments
            .iter()
            .filter(|comment| comment.post_id == self.post_id)
            .find(|comment| comment.attr(column).as_deref() == Some(value))
            .map(|comment| Arc::new(comment.clone()) as Resource)
            .ok_or_else(|| BindingError::not_found("Comment", column, value))
    }
}

// ========== Comment ==========

#[derive(Debug, Clone, Default)]
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
            .comments
            .iter()
            .find(|comment| comment.attr(column).as_deref() == Some(value))
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

// ========== User ==========

/// 按 email 查找用户，`me` 表示 id 为 1 的用户
#[derive(Debug, Clone, Default)]
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
            .users
            .iter()
            .find(|user| user.attr(column).as_deref() == Some(value))
            .map(|user| Arc::new(user.clone()) as Resource)
            .ok_or_else(|| BindingError::not_found("User", column, value))
    }
}

#[async_trait]
impl FindForRequest for UserModel {
    async fn find_for_request(
        &self,
        _ctx: &HttpContext,
        _param: &Param,
        value: &str,
    ) -> BindingResult<Resource> {
        if value == "me" {
            return self.find_or_fail("1").await;
        }
        self.find_by_or_fail("email", value).await
    }
}

impl ModelRow for User {
    fn model_name(&self) -> &str {
        "User"
    }

    fn has_relation(&self, _name: &str) -> bool {
        false
    }

    fn related(&self, relation: &str) -> BindingResult<Box<dyn RelatedQuery>> {
        Err(anyhow::anyhow!("User has no relation {}", relation).into())
    }

    fn related_finder(&self) -> Option<&dyn FindRelatedForRequest> {
        Some(self)
    }
}

/// 只能加载该用户自己写的评论
#[async_trait]
impl FindRelatedForRequest for User {
    async fn find_related_for_request(
        &self,
        _ctx: &HttpContext,
        _param: &Param,
        value: &str,
    ) -> BindingResult<Resource> {
        store()
            .comments
            .iter()
            .filter(|comment| comment.author_id == self.id)
            .find(|comment| comment.id.to_string() == value)
            .map(|comment| Arc::new(comment.clone()) as Resource)
            .ok_or_else(|| BindingError::not_found("Comment", "id", value))
    }
}

impl BindTarget for User {
    fn slot_hint() -> SlotHint {
        SlotHint::model(UserModel)
    }
}

// ========== Restaurant ==========

#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: u64,
}

/// 通过 Restaurant 的关联加载到的行，记录经过了哪个关联
#[derive(Debug, Clone)]
pub struct Member {
    pub relation: String,
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct RestaurantModel;

#[async_trait]
impl RouteModel for RestaurantModel {
    fn name(&self) -> &str {
        "Restaurant"
    }

    async fn find_or_fail(&self, value: &str) -> BindingResult<Resource> {
        self.find_by_or_fail("id", value).await
    }

    async fn find_by_or_fail(&self, column: &str, value: &str) -> BindingResult<Resource> {
        match (column, value) {
            ("id", "1") => Ok(Arc::new(Restaurant { id: 1 })),
            _ => Err(BindingError::not_found("Restaurant", column, value)),
        }
    }
}

impl ModelRow for Restaurant {
    fn model_name(&self) -> &str {
        "Restaurant"
    }

    fn has_relation(&self, name: &str) -> bool {
        matches!(name, "chefs" | "roofs" | "blogPost" | "lineItems" | "quizzes")
    }

    fn related(&self, relation: &str) -> BindingResult<Box<dyn RelatedQuery>> {
        if !self.has_relation(relation) {
            return Err(anyhow::anyhow!("Restaurant has no relation {}", relation).into());
        }
        Ok(Box::new(MembersOfRestaurant {
            relation: relation.to_string(),
        }))
    }
}

pub struct MembersOfRestaurant {
    relation: String,
}

#[async_trait]
impl RelatedQuery for MembersOfRestaurant {
    async fn first_where_or_fail(self: Box<Self>, column: &str, value: &str) -> BindingResult<Resource> {
        Ok(Arc::new(Member {
            relation: self.relation,
            column: column.to_string(),
            value: value.to_string(),
        }))
    }
}

impl ModelRow for Member {
    fn model_name(&self) -> &str {
        "Member"
    }

    fn has_relation(&self, _name: &str) -> bool {
        false
    }

    fn related(&self, relation: &str) -> BindingResult<Box<dyn RelatedQuery>> {
        Err(anyhow::anyhow!("Member has no relation {}", relation).into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemberModel;

#[async_trait]
impl RouteModel for MemberModel {
    fn name(&self) -> &str {
        "Member"
    }

    async fn find_or_fail(&self, value: &str) -> BindingResult<Resource> {
        self.find_by_or_fail("id", value).await
    }

    async fn find_by_or_fail(&self, column: &str, value: &str) -> BindingResult<Resource> {
        Err(BindingError::not_found("Member", column, value))
    }
}

// ========== helpers ==========

pub fn post_slot() -> ModelSlot {
    ModelSlot::model(PostModel::default())
}

pub fn comment_slot() -> ModelSlot {
    ModelSlot::model(CommentModel)
}

pub fn user_slot() -> ModelSlot {
    ModelSlot::model(UserModel)
}

pub fn restaurant_slot() -> ModelSlot {
    ModelSlot::model(RestaurantModel)
}

pub fn member_slot() -> ModelSlot {
    ModelSlot::model(MemberModel)
}

/// 构造匹配到控制器方法的请求上下文，参数以原始 token 为键
pub fn bound_context(
    pattern: &str,
    controller: &str,
    method: &str,
    params: &[(&str, &str)],
) -> HttpContext {
    HttpContext::new(
        RouteMatch::new(pattern, HandlerDescriptor::bound(controller, method)),
        params.iter().copied().collect(),
    )
}

//! Bindery Macros
//!
//! 在控制器的 impl 块上声明路由模型绑定

mod bindings;
mod utils;

use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;

/// 处理控制器实现块，收集 `#[bind]` 方法并在编译时注册
///
/// - `#[bind]`：隐式模式，从方法签名推断（跳过 `&self` 和第一个 context 参数）
/// - `#[bind(Post, _, Comment)]`：显式模式，`_` 表示该位置不绑定
///
/// # 示例
///
/// ```ignore
/// #[bindings(extends = BaseController)]
/// impl CommentsController {
///     #[bind]
///     async fn show(&self, ctx: &HttpContext, post: Arc<Post>, comment: Arc<Comment>) -> Json<Comment> {
///         // ...
///     }
///
///     #[bind(_, Comment)]
///     async fn update(&self, ctx: &HttpContext) -> StatusCode {
///         // ...
///     }
/// }
/// ```
///
/// 生成 `impl Controller`，并通过 inventory 提交一个 `ControllerBindingRegistration`，
/// 由 `BindingRegistry::from_inventory()` 统一执行
#[proc_macro_attribute]
#[proc_macro_error]
pub fn bindings(attr: TokenStream, item: TokenStream) -> TokenStream {
    bindings::bindings_impl(attr, item)
}

//! 宏辅助工具函数

use proc_macro_error::abort;
use syn::punctuated::Punctuated;
use syn::{Attribute, FnArg, ImplItemFn, Meta, Token, Type};

/// 方法上的绑定声明
pub enum BindDeclaration {
    /// `#[bind]`，从签名推断
    Implicit,
    /// `#[bind(A, _, B)]`
    Explicit(Vec<Type>),
}

pub fn is_bind_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("bind")
}

/// 解析方法上的 `#[bind]` 属性
pub fn extract_bind_declaration(method: &ImplItemFn) -> Option<BindDeclaration> {
    let attr = method.attrs.iter().find(|attr| is_bind_attr(attr))?;

    match &attr.meta {
        Meta::Path(_) => Some(BindDeclaration::Implicit),
        Meta::List(_) => {
            let types = attr
                .parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)
                .unwrap_or_else(|e| abort!(e.span(), "invalid #[bind] list: {}", e));
            Some(BindDeclaration::Explicit(types.into_iter().collect()))
        }
        Meta::NameValue(nv) => abort!(
            nv.eq_token,
            "#[bind] does not take a value";
            help = "use #[bind] or #[bind(Model, _, Model)]"
        ),
    }
}

/// 方法签名中参与绑定的参数类型：跳过 `self` 和第一个（context）参数
pub fn extract_bound_param_types(method: &ImplItemFn) -> Vec<Type> {
    let mut typed = method.sig.inputs.iter().filter_map(|arg| match arg {
        FnArg::Typed(pat_type) => Some(pat_type),
        FnArg::Receiver(_) => None,
    });

    if typed.next().is_none() {
        abort!(
            method.sig.ident.span(),
            "#[bind] method '{}' must take the request context as its first argument",
            method.sig.ident
        );
    }

    typed
        .map(|pat_type| {
            if let Type::ImplTrait(_) = pat_type.ty.as_ref() {
                abort!(
                    pat_type.ty,
                    "cannot infer a binding from `impl Trait`";
                    help = "use an explicit list: #[bind(Model, ...)]"
                );
            }
            pat_type.ty.as_ref().clone()
        })
        .collect()
}

/// 从 impl 的 self 类型得到控制器名称
pub fn controller_name(self_ty: &Type) -> String {
    match self_ty {
        Type::Path(type_path) => match type_path.path.segments.last() {
            Some(segment) => segment.ident.to_string(),
            None => abort!(self_ty, "#[bindings] requires a named controller type"),
        },
        _ => abort!(self_ty, "#[bindings] requires a named controller type"),
    }
}

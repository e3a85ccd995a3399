//! `#[bindings]` 宏实现

use proc_macro::TokenStream;
use proc_macro_error::abort;
use quote::quote;
use syn::{parse_macro_input, ImplItem, ItemImpl, Path, Type};

use crate::utils::{
    controller_name, extract_bind_declaration, extract_bound_param_types, is_bind_attr,
    BindDeclaration,
};

pub(crate) fn bindings_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut extends: Option<Path> = None;
    let attr_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("extends") {
            extends = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported #[bindings] property, expected `extends = Controller`"))
        }
    });
    parse_macro_input!(attr with attr_parser);

    let mut input = parse_macro_input!(item as ItemImpl);
    if let Some((_, trait_path, _)) = &input.trait_ {
        abort!(trait_path, "#[bindings] must be placed on an inherent impl block");
    }

    let self_ty = input.self_ty.clone();
    let name = controller_name(&self_ty);

    // 收集所有 #[bind] 方法
    let mut registrations = Vec::new();
    for item in &input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let Some(declaration) = extract_bind_declaration(method) else {
            continue;
        };

        let method_name = method.sig.ident.to_string();
        let hints = match declaration {
            BindDeclaration::Implicit => extract_bound_param_types(method)
                .iter()
                .map(slot_hint_tokens)
                .collect::<Vec<_>>(),
            BindDeclaration::Explicit(types) => types.iter().map(slot_hint_tokens).collect(),
        };

        registrations.push(quote! {
            registry.bind_hints(#name, #method_name, ::std::vec![#(#hints),*])?;
        });
    }

    // 去掉 #[bind] 标记
    for item in &mut input.items {
        if let ImplItem::Fn(method) = item {
            method.attrs.retain(|attr| !is_bind_attr(attr));
        }
    }

    let parent = match &extends {
        Some(path) => quote! {
            ::std::option::Option::Some(<#path as ::bindery_core::Controller>::CONTROLLER_NAME)
        },
        None => quote! { ::std::option::Option::None },
    };

    let expanded = quote! {
        #input

        impl ::bindery_core::Controller for #self_ty {
            const CONTROLLER_NAME: &'static str = #name;
        }

        ::bindery_core::inventory::submit! {
            ::bindery_core::ControllerBindingRegistration::new(
                #name,
                #parent,
                {
                    fn __register_bindings(
                        registry: &mut ::bindery_core::BindingRegistry,
                    ) -> ::bindery_core::BindingResult<()> {
                        #(#registrations)*
                        let _ = registry;
                        ::std::result::Result::Ok(())
                    }
                    __register_bindings
                },
            )
        }
    };

    TokenStream::from(expanded)
}

/// `_` 表示跳过，其余类型通过 BindTarget 报告槽位
fn slot_hint_tokens(ty: &Type) -> proc_macro2::TokenStream {
    match ty {
        Type::Infer(_) => quote! { ::bindery_core::SlotHint::Skip },
        ty => quote! { <#ty as ::bindery_core::BindTarget>::slot_hint() },
    }
}

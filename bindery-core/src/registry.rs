//! 控制器绑定注册表
//!
//! 为每个控制器方法记录有序的模型槽位列表，供加载器按位置消费。
//!
//! # 两种注册方式
//!
//! - **隐式**：由方法签名推断，每个参数类型通过 [`BindTarget`] 报告自己的槽位；
//!   原始类型（字符串、数字、布尔值、日期、对象、函数）会被拒绝
//! - **显式**：直接提供 `Vec<ModelSlot>`，用 [`ModelSlot::Skip`] 跳过某个位置
//!
//! # 继承
//!
//! 控制器可以声明父控制器。控制器第一次写入绑定时，会浅拷贝最近一个拥有绑定表的祖先的表，
//! 之后只覆盖正在声明的方法。没有自己绑定表的控制器直接读取祖先的表。
//!
//! # 编译时收集
//!
//! `#[bindings]` 宏为每个控制器提交一个 [`ControllerBindingRegistration`]，
//! [`BindingRegistry::from_inventory`] 按"父控制器优先"的顺序执行这些注册。

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::context::HttpContext;
use crate::error::{BindingError, BindingResult};
use crate::model::{Resource, RouteModel};
use crate::params::ParamsParser;

/// 模型槽位
#[derive(Clone)]
pub enum ModelSlot {
    /// 该位置绑定到指定模型
    Model(Arc<dyn RouteModel>),
    /// 该位置不做绑定
    Skip,
}

impl ModelSlot {
    pub fn model<M: RouteModel>(model: M) -> Self {
        ModelSlot::Model(Arc::new(model))
    }

    pub fn as_model(&self) -> Option<&Arc<dyn RouteModel>> {
        match self {
            ModelSlot::Model(model) => Some(model),
            ModelSlot::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, ModelSlot::Skip)
    }
}

impl fmt::Debug for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSlot::Model(model) => f.debug_tuple("Model").field(&model.name()).finish(),
            ModelSlot::Skip => f.write_str("Skip"),
        }
    }
}

/// 参数类型报告的槽位提示（隐式注册使用）
#[derive(Clone)]
pub enum SlotHint {
    Model(Arc<dyn RouteModel>),
    Skip,
    /// 原始类型，携带类型名称用于错误信息
    Primitive(&'static str),
}

impl SlotHint {
    pub fn model<M: RouteModel>(model: M) -> Self {
        SlotHint::Model(Arc::new(model))
    }
}

impl fmt::Debug for SlotHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotHint::Model(model) => f.debug_tuple("Model").field(&model.name()).finish(),
            SlotHint::Skip => f.write_str("Skip"),
            SlotHint::Primitive(name) => f.debug_tuple("Primitive").field(name).finish(),
        }
    }
}

/// 可以出现在控制器方法签名中的类型
///
/// 模型行类型实现该 trait 并返回自己的 [`RouteModel`]：
///
/// ```ignore
/// impl BindTarget for Post {
///     fn slot_hint() -> SlotHint {
///         SlotHint::model(PostModel::shared())
///     }
/// }
/// ```
pub trait BindTarget {
    fn slot_hint() -> SlotHint;
}

macro_rules! primitive_bind_target {
    ($label:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl BindTarget for $ty {
                fn slot_hint() -> SlotHint {
                    SlotHint::Primitive($label)
                }
            }
        )+
    };
}

primitive_bind_target!("String" => str, String, char);
primitive_bind_target!(
    "Number" => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);
primitive_bind_target!("Boolean" => bool);
primitive_bind_target!("Date" => chrono::NaiveDate, chrono::NaiveDateTime, chrono::NaiveTime);
primitive_bind_target!("Object" => serde_json::Value, serde_json::Map<String, serde_json::Value>);

impl<Tz: chrono::TimeZone> BindTarget for chrono::DateTime<Tz> {
    fn slot_hint() -> SlotHint {
        SlotHint::Primitive("Date")
    }
}

impl<K, V, S> BindTarget for HashMap<K, V, S> {
    fn slot_hint() -> SlotHint {
        SlotHint::Primitive("Object")
    }
}

impl<K, V> BindTarget for BTreeMap<K, V> {
    fn slot_hint() -> SlotHint {
        SlotHint::Primitive("Object")
    }
}

impl<T> BindTarget for Vec<T> {
    fn slot_hint() -> SlotHint {
        SlotHint::Primitive("Array")
    }
}

macro_rules! fn_pointer_bind_target {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> BindTarget for fn($($arg),*) -> R {
            fn slot_hint() -> SlotHint {
                SlotHint::Primitive("Function")
            }
        }
    };
}

fn_pointer_bind_target!();
fn_pointer_bind_target!(A);
fn_pointer_bind_target!(A, B);
fn_pointer_bind_target!(A, B, C);

/// `()` 占位，表示该位置不做绑定
impl BindTarget for () {
    fn slot_hint() -> SlotHint {
        SlotHint::Skip
    }
}

impl<T: BindTarget + ?Sized> BindTarget for &T {
    fn slot_hint() -> SlotHint {
        T::slot_hint()
    }
}

impl<T: BindTarget + ?Sized> BindTarget for Arc<T> {
    fn slot_hint() -> SlotHint {
        T::slot_hint()
    }
}

impl<T: BindTarget + ?Sized> BindTarget for Box<T> {
    fn slot_hint() -> SlotHint {
        T::slot_hint()
    }
}

/// 可选的路由段
impl<T: BindTarget> BindTarget for Option<T> {
    fn slot_hint() -> SlotHint {
        T::slot_hint()
    }
}

/// 带名称的控制器，由 `#[bindings]` 宏生成
pub trait Controller {
    const CONTROLLER_NAME: &'static str;
}

/// 方法名称到槽位列表的映射
pub type MethodBindings = HashMap<String, Arc<[ModelSlot]>>;

/// 处理器参数
#[derive(Debug, Clone)]
pub enum HandlerArgument<'a> {
    Context(&'a HttpContext),
    Resource(Resource),
}

impl<'a> HandlerArgument<'a> {
    pub fn as_context(&self) -> Option<&'a HttpContext> {
        match self {
            HandlerArgument::Context(ctx) => Some(ctx),
            HandlerArgument::Resource(_) => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            HandlerArgument::Context(_) => None,
            HandlerArgument::Resource(resource) => Some(resource),
        }
    }
}

/// 控制器绑定注册表
///
/// 在开始处理请求前构建完成，之后只读，可以通过 `Arc` 在请求间共享
#[derive(Debug, Default)]
pub struct BindingRegistry {
    parents: HashMap<String, Option<String>>,
    bindings: HashMap<String, MethodBindings>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册控制器及其父控制器
    ///
    /// 父控制器必须已经注册
    pub fn register_controller(
        &mut self,
        controller: impl Into<String>,
        parent: Option<&str>,
    ) -> BindingResult<()> {
        let controller = controller.into();

        if let Some(parent) = parent {
            if !self.parents.contains_key(parent) {
                return Err(BindingError::UnknownParent {
                    controller,
                    parent: parent.to_string(),
                });
            }

            let mut chain = vec![controller.clone()];
            let mut cursor = Some(parent.to_string());
            while let Some(current) = cursor {
                chain.push(current.clone());
                if current == controller {
                    return Err(BindingError::InheritanceCycle(chain.join(" -> ")));
                }
                cursor = self.parents.get(&current).cloned().flatten();
            }
        }

        tracing::debug!(controller = %controller, parent = ?parent, "Registered controller");
        self.parents.insert(controller, parent.map(str::to_string));
        Ok(())
    }

    pub fn contains_controller(&self, controller: &str) -> bool {
        self.parents.contains_key(controller)
    }

    /// 显式注册方法的槽位列表
    ///
    /// 未注册的控制器会作为无父控制器的根注册
    pub fn bind(&mut self, controller: &str, method: &str, slots: Vec<ModelSlot>) {
        if !self.parents.contains_key(controller) {
            self.parents.insert(controller.to_string(), None);
        }

        if !self.bindings.contains_key(controller) {
            let seed = self
                .ancestors(controller)
                .skip(1)
                .find_map(|ancestor| self.bindings.get(ancestor))
                .cloned()
                .unwrap_or_default();
            self.bindings.insert(controller.to_string(), seed);
        }

        tracing::debug!(
            controller,
            method,
            slots = slots.len(),
            "Registered method bindings"
        );

        if let Some(methods) = self.bindings.get_mut(controller) {
            methods.insert(method.to_string(), slots.into());
        }
    }

    /// 从参数类型推断并注册方法的槽位列表
    pub fn bind_hints(
        &mut self,
        controller: &str,
        method: &str,
        hints: Vec<SlotHint>,
    ) -> BindingResult<()> {
        let slots = hints
            .into_iter()
            .enumerate()
            .map(|(index, hint)| match hint {
                SlotHint::Model(model) => Ok(ModelSlot::Model(model)),
                SlotHint::Skip => Ok(ModelSlot::Skip),
                SlotHint::Primitive(type_name) => Err(BindingError::InvalidBindValue {
                    controller: controller.to_string(),
                    method: method.to_string(),
                    position: index + 1,
                    type_name: type_name.to_string(),
                }),
            })
            .collect::<BindingResult<Vec<_>>>()?;

        self.bind(controller, method, slots);
        Ok(())
    }

    /// 控制器自身及其所有祖先，从近到远
    pub fn ancestors<'a>(&'a self, controller: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut cursor = Some(controller);
        let mut seen = HashSet::new();
        std::iter::from_fn(move || {
            let current = cursor.take()?;
            if !seen.insert(current) {
                return None;
            }
            cursor = self
                .parents
                .get(current)
                .and_then(|parent| parent.as_deref());
            Some(current)
        })
    }

    /// 控制器生效的绑定表（自身的或最近祖先的）
    pub fn bindings(&self, controller: &str) -> Option<&MethodBindings> {
        self.ancestors(controller)
            .find_map(|ancestor| self.bindings.get(ancestor))
    }

    /// 方法的槽位列表
    pub fn slots(&self, controller: &str, method: &str) -> Option<Arc<[ModelSlot]>> {
        self.bindings(controller)?.get(method).cloned()
    }

    /// 当前请求的处理器是否注册了绑定
    pub fn slots_for(&self, ctx: &HttpContext) -> Option<Arc<[ModelSlot]>> {
        let (controller, method) = ctx.route.as_ref()?.handler().as_bound()?;
        self.slots(controller, method)
    }

    pub fn controller_count(&self) -> usize {
        self.parents.len()
    }

    /// 组装处理器参数
    ///
    /// 第一个参数总是 context。之后每个非跳过的槽位按位置对应路由参数，
    /// 从资源表中取出同名资源；资源不存在时跳过该位置。
    pub fn handler_arguments<'c>(
        &self,
        ctx: &'c HttpContext,
    ) -> BindingResult<Vec<HandlerArgument<'c>>> {
        let mut arguments = vec![HandlerArgument::Context(ctx)];

        let (Some(route), Some(slots)) = (ctx.route.as_ref(), self.slots_for(ctx)) else {
            return Ok(arguments);
        };

        let params = ParamsParser::new(route.params(), route.pattern()).parse()?;
        for (slot, param) in slots.iter().zip(params.iter()) {
            if slot.is_skip() {
                continue;
            }
            if let Some(resource) = ctx.resources.get(&param.name) {
                arguments.push(HandlerArgument::Resource(Arc::clone(resource)));
            }
        }

        Ok(arguments)
    }

    /// 使用编译时收集的注册信息构建注册表
    pub fn from_inventory() -> BindingResult<Self> {
        tracing::info!("🔍 Discovering controller bindings from inventory...");

        let registry = Self::from_registrations(get_all_controller_bindings())?;

        tracing::info!(
            "✅ Controller binding discovery completed: {} controllers registered",
            registry.controller_count()
        );

        Ok(registry)
    }

    /// 按"父控制器优先"的顺序执行注册
    ///
    /// 控制器名称必须唯一，同名的两个控制器会返回 [`BindingError::DuplicateController`]
    pub fn from_registrations<'a, I>(registrations: I) -> BindingResult<Self>
    where
        I: IntoIterator<Item = &'a ControllerBindingRegistration>,
    {
        let mut by_name: BTreeMap<&'static str, &'a ControllerBindingRegistration> =
            BTreeMap::new();
        for registration in registrations {
            if by_name.insert(registration.controller, registration).is_some() {
                return Err(BindingError::DuplicateController(
                    registration.controller.to_string(),
                ));
            }
        }

        let mut registry = BindingRegistry::new();
        let mut stack = Vec::new();
        for controller in by_name.keys().copied() {
            registry.apply_registration(controller, &by_name, &mut stack)?;
        }

        Ok(registry)
    }

    fn apply_registration(
        &mut self,
        controller: &'static str,
        by_name: &BTreeMap<&'static str, &ControllerBindingRegistration>,
        stack: &mut Vec<&'static str>,
    ) -> BindingResult<()> {
        if self.parents.contains_key(controller) {
            return Ok(());
        }

        if stack.contains(&controller) {
            let mut chain: Vec<&str> = stack
                .iter()
                .skip_while(|name| **name != controller)
                .copied()
                .collect();
            chain.push(controller);
            return Err(BindingError::InheritanceCycle(chain.join(" -> ")));
        }

        let Some(registration) = by_name.get(controller) else {
            return Ok(());
        };
        let parent = registration.parent;

        if let Some(parent) = parent {
            if !by_name.contains_key(parent) {
                return Err(BindingError::UnknownParent {
                    controller: controller.to_string(),
                    parent: parent.to_string(),
                });
            }
            stack.push(controller);
            self.apply_registration(parent, by_name, stack)?;
            stack.pop();
        }

        self.register_controller(controller, parent)?;
        (registration.register)(self)?;

        tracing::info!("✅ Auto-registered controller bindings: {}", controller);
        Ok(())
    }
}

/// 控制器绑定注册信息
pub struct ControllerBindingRegistration {
    pub controller: &'static str,
    pub parent: Option<&'static str>,
    pub register: fn(&mut BindingRegistry) -> BindingResult<()>,
}

impl ControllerBindingRegistration {
    pub const fn new(
        controller: &'static str,
        parent: Option<&'static str>,
        register: fn(&mut BindingRegistry) -> BindingResult<()>,
    ) -> Self {
        Self {
            controller,
            parent,
            register,
        }
    }
}

inventory::collect!(ControllerBindingRegistration);

/// 获取所有注册的控制器绑定
pub fn get_all_controller_bindings() -> Vec<&'static ControllerBindingRegistration> {
    inventory::iter::<ControllerBindingRegistration>
        .into_iter()
        .collect()
}

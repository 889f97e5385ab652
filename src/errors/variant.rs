use std::any::{type_name, TypeId};
use std::fmt;

use super::structured::StructuredError;

/// A specialised kind of [`StructuredError`].
///
/// Implementors are usually unit marker types declared with
/// [`structured_variant!`](crate::structured_variant). Neither method needs an
/// override: the name is read from the concrete type and the parent defaults to
/// the base error.
pub trait Variant: Sized + 'static {
    fn name() -> &'static str {
        short_type_name(type_name::<Self>())
    }

    fn parent() -> Option<VariantInfo> {
        Some(VariantInfo::of::<StructuredError>())
    }
}

/// Runtime identity of a variant, captured when an error is built
#[derive(Clone, Copy)]
pub struct VariantInfo {
    name: &'static str,
    type_id: TypeId,
    parent: fn() -> Option<VariantInfo>,
}

impl VariantInfo {
    pub fn of<V: Variant>() -> Self {
        Self {
            name: V::name(),
            type_id: TypeId::of::<V>(),
            parent: V::parent,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn parent(&self) -> Option<VariantInfo> {
        (self.parent)()
    }

    /// True when this is exactly `V`
    pub fn is<V: Variant>(&self) -> bool {
        self.type_id == TypeId::of::<V>()
    }

    /// True when this is `V` or specialises `V` at any depth
    pub fn is_a<V: Variant>(&self) -> bool {
        let mut current = Some(*self);
        while let Some(info) = current {
            if info.is::<V>() {
                return true;
            }
            current = info.parent();
        }
        false
    }

    /// Names from this variant up to the base
    pub fn lineage(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut current = Some(*self);
        while let Some(info) = current {
            names.push(info.name);
            current = info.parent();
        }
        names
    }
}

impl PartialEq for VariantInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for VariantInfo {}

impl fmt::Debug for VariantInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VariantInfo").field(&self.name).finish()
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Declares a marker type for a specialised [`StructuredError`] kind.
///
/// ```
/// use structured_error::structured_variant;
///
/// structured_variant!(pub TimeoutError);
/// structured_variant!(pub ConnectTimeoutError: TimeoutError);
///
/// let err = ConnectTimeoutError::new("net.connect-timeout", "connect timed out");
/// assert_eq!(err.name(), "ConnectTimeoutError");
/// assert!(err.is_a::<TimeoutError>());
/// ```
#[macro_export]
macro_rules! structured_variant {
    ($(#[$meta:meta])* $vis:vis $name:ident : $parent:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name;

        impl $crate::Variant for $name {
            fn parent() -> ::std::option::Option<$crate::VariantInfo> {
                ::std::option::Option::Some($crate::VariantInfo::of::<$parent>())
            }
        }

        #[allow(dead_code)]
        impl $name {
            pub fn builder() -> $crate::ErrorSpec {
                $crate::ErrorSpec::new::<Self>()
            }

            #[track_caller]
            pub fn new(
                code: impl ::std::convert::Into<::std::string::String>,
                message: impl ::std::convert::Into<::std::string::String>,
            ) -> $crate::StructuredError {
                Self::builder().code(code).message(message).build()
            }

            #[track_caller]
            pub fn with_props(
                code: impl ::std::convert::Into<::std::string::String>,
                message: impl ::std::convert::Into<::std::string::String>,
                props: impl ::std::convert::Into<$crate::Props>,
            ) -> $crate::StructuredError {
                Self::builder().code(code).message(message).props(props).build()
            }

            #[track_caller]
            pub fn caused_by<E>(
                cause: E,
                code: impl ::std::convert::Into<::std::string::String>,
                message: impl ::std::convert::Into<::std::string::String>,
            ) -> $crate::StructuredError
            where
                E: ::std::error::Error + ::std::marker::Send + ::std::marker::Sync + 'static,
            {
                Self::builder().cause(cause).code(code).message(message).build()
            }

            #[track_caller]
            pub fn caused_by_with_props<E>(
                cause: E,
                code: impl ::std::convert::Into<::std::string::String>,
                message: impl ::std::convert::Into<::std::string::String>,
                props: impl ::std::convert::Into<$crate::Props>,
            ) -> $crate::StructuredError
            where
                E: ::std::error::Error + ::std::marker::Send + ::std::marker::Sync + 'static,
            {
                Self::builder()
                    .cause(cause)
                    .code(code)
                    .message(message)
                    .props(props)
                    .build()
            }
        }
    };
    ($(#[$meta:meta])* $vis:vis $name:ident) => {
        $crate::structured_variant!($(#[$meta])* $vis $name : $crate::StructuredError);
    };
}

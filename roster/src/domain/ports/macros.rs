//! Helper macro for declaring port error enums.
//!
//! Each variant carries named fields and a display template. The macro
//! derives `thiserror::Error`, emits one snake_case constructor per variant
//! whose parameters accept `impl Into<T>`, and an `is_retryable` predicate
//! driven by variants tagged `retryable`.

macro_rules! define_port_error {
    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (@retryable retryable) => { true };
    (@retryable) => { false };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } $($flag:ident)? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    $(
                        #[allow(missing_docs, reason = "fields are described by the variant")]
                        $field: $ty
                    ),*
                },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant { $($field : $ty),* });
            )*

            /// Whether repeating the operation may succeed.
            pub fn is_retryable(&self) -> bool {
                match self {
                    $(Self::$variant { .. } => define_port_error!(@retryable $($flag)?),)*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

//! Helper macro for port error enums.
//!
//! Each variant gets a snake_case constructor accepting `impl Into<T>` for
//! its fields, so adapters can write `UserRepositoryError::query(err.to_string())`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $(
                    #[doc = concat!("`", stringify!($field), "` reported by the adapter.")]
                    $field : $ty
                ),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum StorePortError {
            Connection { message: String } => "store connection failed: {message}",
            Stale { rental_id: String } => "rental {rental_id} changed concurrently",
            Retries { attempts: u32 } => "gave up after {attempts} attempts",
            Detached => "record detached",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = StorePortError::stale("r-1");
        assert_eq!(err.to_string(), "rental r-1 changed concurrently");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = StorePortError::retries(2_u32);
        assert_eq!(err.to_string(), "gave up after 2 attempts");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(StorePortError::detached(), StorePortError::Detached);
        assert_eq!(
            StorePortError::connection("pool closed").to_string(),
            "store connection failed: pool closed"
        );
    }
}

//! Helper macro generating the error enums returned by driven ports.
//!
//! Each variant carries named fields and a display message. The macro emits
//! a `thiserror` enum plus one snake_case constructor per variant whose
//! parameters accept anything convertible into the field types, so adapters
//! can write `PostRepositoryError::query("timeout")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[allow(dead_code, reason = "not every port raises every variant")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@build $variant [] [] $( $field : $ty, )*);
    };

    (@build $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            #[allow(dead_code, reason = "not every port raises every variant")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@build $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @build
            $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
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
                $variant $( { $($field : $ty),* } )?,
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
    //! Constructor generation for the macro.
    define_port_error! {
        pub enum SamplePortError {
            Connection { message: String } => "connection lost: {message}",
            Missing { id: i64 } => "row {id} missing",
            Stale => "stale read",
            Mixed { message: String, attempts: u32 } => "{message} after {attempts} attempts",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "connection lost: refused");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        let err = SamplePortError::missing(42_i64);
        assert_eq!(err, SamplePortError::Missing { id: 42 });
        assert_eq!(err.to_string(), "row 42 missing");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SamplePortError::stale().to_string(), "stale read");
    }

    #[test]
    fn mixed_fields() {
        let err = SamplePortError::mixed("timeout", 3_u32);
        assert_eq!(err.to_string(), "timeout after 3 attempts");
    }
}

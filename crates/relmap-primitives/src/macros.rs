#[macro_export]
macro_rules! value_kind_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (
                Bool,
                Bool,
                name = "bool",
                is_numeric = false,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = true
            ),
            (
                Byte,
                Numeric,
                name = "byte",
                is_numeric = true,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = true
            ),
            (
                Bytes,
                Binary,
                name = "bytes",
                is_numeric = false,
                supports_max_length = true,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = true
            ),
            (
                Char,
                Textual,
                name = "char",
                is_numeric = false,
                supports_max_length = false,
                supports_unicode = true,
                supports_precision = false,
                is_keyable = true
            ),
            (
                Date,
                Temporal,
                name = "date",
                is_numeric = false,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = true
            ),
            (
                DateTime,
                Temporal,
                name = "datetime",
                is_numeric = false,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = true,
                is_keyable = true
            ),
            (
                DateTimeOffset,
                Temporal,
                name = "datetimeoffset",
                is_numeric = false,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = true,
                is_keyable = true
            ),
            (
                Decimal,
                Numeric,
                name = "decimal",
                is_numeric = true,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = true,
                is_keyable = true
            ),
            (
                Double,
                Numeric,
                name = "double",
                is_numeric = true,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = false
            ),
            (
                Float,
                Numeric,
                name = "float",
                is_numeric = true,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = false
            ),
            (
                Geometry,
                Spatial,
                name = "geometry",
                is_numeric = false,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = false
            ),
            (
                Guid,
                Identifier,
                name = "guid",
                is_numeric = false,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = true
            ),
            (
                Int,
                Numeric,
                name = "int",
                is_numeric = true,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = true
            ),
            (
                Long,
                Numeric,
                name = "long",
                is_numeric = true,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = true
            ),
            (
                Short,
                Numeric,
                name = "short",
                is_numeric = true,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = false,
                is_keyable = true
            ),
            (
                Text,
                Textual,
                name = "string",
                is_numeric = false,
                supports_max_length = true,
                supports_unicode = true,
                supports_precision = false,
                is_keyable = true
            ),
            (
                Time,
                Temporal,
                name = "time",
                is_numeric = false,
                supports_max_length = false,
                supports_unicode = false,
                supports_precision = true,
                is_keyable = true
            ),
        }
    };
}

macro_rules! value_kind_registry {
    ($macro:ident) => {
        $crate::value_kind_registry_entries!($macro)
    };
    ($macro:ident, $($args:tt)+) => {
        $crate::value_kind_registry_entries!($macro, @args $($args)+)
    };
}

macro_rules! metadata_from_registry {
    ( @args $kind:expr; @entries $( ($variant:ident, $family:ident, name = $name:expr, is_numeric = $is_numeric:expr, supports_max_length = $supports_max_length:expr, supports_unicode = $supports_unicode:expr, supports_precision = $supports_precision:expr, is_keyable = $is_keyable:expr) ),* $(,)? ) => {
        match $kind {
            $(
                $crate::ValueKind::$variant => $crate::ValueKindMetadata {
                    family: $crate::ValueFamily::$family,
                    name: $name,
                    is_numeric: $is_numeric,
                    supports_max_length: $supports_max_length,
                    supports_unicode: $supports_unicode,
                    supports_precision: $supports_precision,
                    is_keyable: $is_keyable,
                },
            )*
        }
    };
}

macro_rules! all_kinds_from_registry {
    ( @entries $( ($variant:ident, $family:ident, name = $name:expr, is_numeric = $is_numeric:expr, supports_max_length = $supports_max_length:expr, supports_unicode = $supports_unicode:expr, supports_precision = $supports_precision:expr, is_keyable = $is_keyable:expr) ),* $(,)? ) => {
        [ $( $crate::ValueKind::$variant ),* ]
    };
}

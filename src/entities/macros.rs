//! Macros for reducing boilerplate when defining view entities
//!
//! These macros generate the field-accessor table each entity hands to the
//! filter/sort engine and the keyword interpreter.

/// Implement [`Entity`](crate::core::entity::Entity) from a field table
///
/// Every listed field must be `Clone` and convertible into
/// [`FieldValue`](crate::core::field::FieldValue). The struct must have an
/// `id: String` field.
///
/// # Example
///
/// ```rust,ignore
/// impl_view_entity!(
///     Camera,
///     "cameras",
///     search: ["name", "location", "zone"],
///     fields: {
///         "name" => name,
///         "type" => camera_type,
///         "active" => active,
///     },
///     timestamp: added_on,
///     default_sort: SortSpec::ascending("name"),
/// );
/// ```
#[macro_export]
macro_rules! impl_view_entity {
    (
        $type:ident,
        $resource:expr,
        search: [ $( $search:expr ),* $(,)? ],
        fields: { $( $key:literal => $field:ident ),* $(,)? }
        $(, timestamp: $ts:ident )?
        $(, default_sort: $sort:expr )?
        $(,)?
    ) => {
        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $resource
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn searchable_fields() -> &'static [&'static str] {
                &[ $( $search ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    "id" => Some($crate::core::field::FieldValue::from(self.id.as_str())),
                    $( $key => Some($crate::core::field::FieldValue::from(self.$field.clone())), )*
                    _ => None,
                }
            }

            $(
                fn timestamp(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                    Some(self.$ts)
                }
            )?

            $(
                fn default_sort() -> Option<$crate::core::query::SortSpec> {
                    Some($sort)
                }
            )?
        }
    };
}

/// Implement string conversions for a fieldless enum used as a field value
///
/// Generates `as_str`, `ALL`, `Display`, `FromStr` and `From<Enum> for FieldValue`.
/// Keep the wire names in sync with the enum's serde attributes.
///
/// # Example
///
/// ```rust,ignore
/// impl_field_enum!(UserRole {
///     Admin => "admin",
///     Operator => "operator",
///     Viewer => "viewer",
/// });
/// ```
#[macro_export]
macro_rules! impl_field_enum {
    ( $type:ident { $( $variant:ident => $name:literal ),+ $(,)? } ) => {
        impl $type {
            /// Every variant, in declaration order
            pub const ALL: &'static [$type] = &[ $( $type::$variant ),+ ];

            /// The wire name of this variant
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $type::$variant => $name, )+
                }
            }
        }

        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $type {
            type Err = $crate::core::error::ValidationError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $( $name => Ok($type::$variant), )+
                    other => Err($crate::core::error::ValidationError::Invalid {
                        field: stringify!($type).to_string(),
                        message: format!("unknown value '{}'", other),
                    }),
                }
            }
        }

        impl From<$type> for $crate::core::field::FieldValue {
            fn from(value: $type) -> Self {
                $crate::core::field::FieldValue::String(value.as_str().to_string())
            }
        }
    };
}

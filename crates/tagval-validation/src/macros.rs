/// Declare the validated fields of a struct.
///
/// Implements [`Validate`](crate::Validate) with a descriptor built once and
/// cached in a static, and [`FieldAccess`](crate::FieldAccess) so the struct
/// can itself appear as a field. Fields are listed in declaration order;
/// each may carry `yaml = "key"` and `validate = "rules"`. Fields left out
/// of the list are never validated.
///
/// `yaml` only tells validation which document key to look at. Decoding is
/// serde's business, so a field whose `yaml` key differs from its name also
/// needs a matching `#[serde(rename = "...")]`; otherwise the rules check
/// the node under one key while the value was decoded from another.
///
/// ```rust
/// use serde::Deserialize;
/// use tagval_validation::{validated_struct, Validate};
///
/// #[derive(Debug, Default, Deserialize)]
/// #[serde(default)]
/// struct Person {
///     name: String,
///     age: i64,
/// }
///
/// validated_struct!(Person {
///     name(yaml = "name", validate = "required"),
///     age(validate = "required,gt=18"),
/// });
///
/// let doc = tagval_yaml::parse("age: 16\n").unwrap();
/// let person = Person { name: String::new(), age: 16 };
/// assert_eq!(person.validate(&doc).len(), 2);
/// ```
#[macro_export]
macro_rules! validated_struct {
    ($ty:ident { $( $field:ident $( ( $( $key:ident = $val:expr ),* $(,)? ) )? ),* $(,)? }) => {
        impl $crate::Validate for $ty {
            fn descriptor() -> &'static $crate::StructDescriptor<Self> {
                static DESCRIPTOR: $crate::__private::Lazy<$crate::StructDescriptor<$ty>> =
                    $crate::__private::Lazy::new(|| {
                        $crate::StructDescriptor::new(
                            stringify!($ty),
                            vec![
                                $({
                                    fn get(target: &$ty) -> &dyn $crate::FieldAccess {
                                        &target.$field
                                    }
                                    $crate::FieldDescriptor::new(stringify!($field), get)
                                        $( $( .$key($val) )* )?
                                }),*
                            ],
                        )
                    });
                &DESCRIPTOR
            }
        }

        impl $crate::FieldAccess for $ty {
            fn field_value(&self) -> $crate::FieldValue<'_> {
                $crate::FieldValue::Struct
            }

            fn as_validatable(&self) -> ::std::option::Option<&dyn $crate::DynValidate> {
                ::std::option::Option::Some(self)
            }
        }
    };
}

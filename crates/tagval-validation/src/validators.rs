//! Built-in validators: `required`, `gt` and `datetime`.

use crate::descriptor::FieldValue;
use crate::error::{ValidationError, ValidationErrorKind, ValidationFailure, ValidatorError};
use crate::layout::DatetimeLayout;
use tagval_yaml::YamlWithSourceInfo;

/// `required`: the value must not be the zero value of its kind.
pub fn validate_required(
    value: &FieldValue<'_>,
    field: &str,
    node: &YamlWithSourceInfo,
    _param: &str,
) -> Result<(), ValidationFailure> {
    if value.is_zero() {
        return Err(ValidationError::new(
            ValidationErrorKind::Required {
                field: field.to_string(),
            },
            node,
        )
        .into());
    }
    Ok(())
}

/// `gt=<n>`: the integer value must be strictly greater than `n`.
///
/// A parameter that is not a base-10 integer is reported as an opaque
/// [`ValidatorError::InvalidParameter`]. An absent optional passes.
pub fn validate_greater_than(
    value: &FieldValue<'_>,
    field: &str,
    node: &YamlWithSourceInfo,
    param: &str,
) -> Result<(), ValidationFailure> {
    let threshold: i64 = param
        .parse()
        .map_err(|e: std::num::ParseIntError| ValidatorError::InvalidParameter {
            rule: "gt".to_string(),
            param: param.to_string(),
            reason: e.to_string(),
        })?;

    let resolved = value.resolved();
    if matches!(resolved, FieldValue::Optional(None)) {
        return Ok(());
    }
    let Some(number) = resolved.as_i128() else {
        return Err(ValidatorError::UnsupportedKind {
            rule: "gt".to_string(),
            kind: resolved.kind_name(),
        }
        .into());
    };

    if number <= i128::from(threshold) {
        return Err(ValidationError::new(
            ValidationErrorKind::NotGreaterThan {
                field: field.to_string(),
                threshold,
            },
            node,
        )
        .into());
    }
    Ok(())
}

/// `datetime=<layout>`: the string value must parse against the layout.
///
/// Layouts are written against the reference time
/// `Mon Jan 2 15:04:05 MST 2006`, e.g. `2006-01-02T15:04:05Z07:00`.
/// Non-string values never match. An absent optional passes.
pub fn validate_datetime(
    value: &FieldValue<'_>,
    field: &str,
    node: &YamlWithSourceInfo,
    param: &str,
) -> Result<(), ValidationFailure> {
    let resolved = value.resolved();
    if matches!(resolved, FieldValue::Optional(None)) {
        return Ok(());
    }

    let valid = resolved
        .as_str()
        .is_some_and(|text| DatetimeLayout::new(param).matches(text));

    if !valid {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidDatetime {
                field: field.to_string(),
                layout: param.to_string(),
            },
            node,
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldAccess;

    fn node() -> YamlWithSourceInfo {
        tagval_yaml::parse("value").unwrap()
    }

    fn positioned_kind(result: Result<(), ValidationFailure>) -> ValidationErrorKind {
        match result {
            Err(ValidationFailure::Positioned(error)) => error.kind,
            other => panic!("expected positioned failure, got {other:?}"),
        }
    }

    #[test]
    fn test_required_on_each_zero_kind() {
        let zeros = [
            FieldValue::Str(""),
            FieldValue::Seq(0),
            FieldValue::Map(0),
            FieldValue::Optional(None),
            FieldValue::Int(0),
            FieldValue::Uint(0),
            FieldValue::Float(0.0),
            FieldValue::Bool(false),
        ];
        for zero in zeros {
            let kind = positioned_kind(validate_required(&zero, "f", &node(), ""));
            assert_eq!(
                kind,
                ValidationErrorKind::Required {
                    field: "f".to_string()
                }
            );
        }
    }

    #[test]
    fn test_required_on_non_zero() {
        let values = [
            FieldValue::Str("x"),
            FieldValue::Seq(1),
            FieldValue::Int(-3),
            FieldValue::Bool(true),
            FieldValue::Struct,
        ];
        for value in values {
            assert!(validate_required(&value, "f", &node(), "").is_ok());
        }
    }

    #[test]
    fn test_gt_threshold() {
        assert!(validate_greater_than(&FieldValue::Int(30), "age", &node(), "18").is_ok());

        let kind = positioned_kind(validate_greater_than(
            &FieldValue::Int(16),
            "age",
            &node(),
            "18",
        ));
        assert_eq!(kind.message(), "field 'age' must be greater than 18");

        // equal is not greater
        assert!(validate_greater_than(&FieldValue::Int(18), "age", &node(), "18").is_err());
    }

    #[test]
    fn test_gt_unsigned_and_negative_threshold() {
        assert!(validate_greater_than(&FieldValue::Uint(u64::MAX), "n", &node(), "0").is_ok());
        assert!(validate_greater_than(&FieldValue::Int(-5), "n", &node(), "-10").is_ok());
        assert!(validate_greater_than(&FieldValue::Uint(0), "n", &node(), "+0").is_err());
    }

    #[test]
    fn test_gt_bad_param_is_opaque() {
        let result = validate_greater_than(&FieldValue::Int(30), "age", &node(), "eighteen");
        match result {
            Err(ValidationFailure::Opaque(ValidatorError::InvalidParameter { rule, param, .. })) => {
                assert_eq!(rule, "gt");
                assert_eq!(param, "eighteen");
            }
            other => panic!("expected opaque failure, got {other:?}"),
        }
    }

    #[test]
    fn test_gt_through_optional() {
        let some = Some(20i32);
        assert!(validate_greater_than(&some.field_value(), "n", &node(), "18").is_ok());
        let none: Option<i32> = None;
        assert!(validate_greater_than(&none.field_value(), "n", &node(), "18").is_ok());
    }

    #[test]
    fn test_gt_on_string_is_unsupported() {
        let result = validate_greater_than(&FieldValue::Str("30"), "age", &node(), "18");
        assert!(matches!(
            result,
            Err(ValidationFailure::Opaque(ValidatorError::UnsupportedKind {
                kind: "string",
                ..
            }))
        ));
    }

    #[test]
    fn test_datetime() {
        let layout = "2006-01-02T15:04:05Z07:00";
        assert!(
            validate_datetime(&FieldValue::Str("2023-06-21T15:00:00Z"), "t", &node(), layout)
                .is_ok()
        );

        let kind = positioned_kind(validate_datetime(
            &FieldValue::Str("21/06/2023"),
            "t",
            &node(),
            layout,
        ));
        assert_eq!(kind.message(), "field 't' has invalid datetime format");
    }

    #[test]
    fn test_datetime_on_non_string_fails() {
        assert!(validate_datetime(&FieldValue::Int(2023), "t", &node(), "2006").is_err());
    }
}

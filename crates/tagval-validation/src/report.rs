//! Rendering validation failures as annotated source snippets.

use crate::error::{ValidationError, ValidationFailure};

/// Render every failure of a pass against the document text.
///
/// Positioned failures become one `ariadne` report each, pointing at the
/// offending node. Opaque failures have nothing to point at and are
/// appended as plain `error:` lines. Output carries no color codes.
pub fn render_failures(
    source_name: &str,
    source_text: &str,
    failures: &[ValidationFailure],
) -> String {
    let mut output = String::new();
    for failure in failures {
        match failure {
            ValidationFailure::Positioned(error) => {
                match render_error(source_name, source_text, error) {
                    Some(rendered) => output.push_str(&rendered),
                    // ariadne could not render; fall back to the one-line form
                    None => {
                        output.push_str(&error.to_string());
                        output.push('\n');
                    }
                }
            }
            ValidationFailure::Opaque(error) => {
                output.push_str(&format!("error: {}\n", error));
            }
        }
    }
    output
}

/// Render a single positioned error.
pub fn render_error(source_name: &str, source_text: &str, error: &ValidationError) -> Option<String> {
    use ariadne::{Color, Config, Label, Report, ReportKind, Source};

    let start = error.source_info.offset;
    let span = start..start + error.source_info.len.max(1);
    let source_id = source_name.to_string();

    let report = Report::build(ReportKind::Error, source_id.clone(), start)
        .with_config(Config::default().with_color(false))
        .with_code(error.error_code())
        .with_message(error.message())
        .with_label(
            Label::new((source_id.clone(), span))
                .with_message(label_text(error))
                .with_color(Color::Red),
        )
        .finish();

    let mut output = Vec::new();
    report
        .write((source_id, Source::from(source_text)), &mut output)
        .ok()?;
    String::from_utf8(output).ok()
}

fn label_text(error: &ValidationError) -> String {
    use crate::error::ValidationErrorKind::*;
    match &error.kind {
        MissingRequiredField { field } => format!("'{}' is not present in this mapping", field),
        InvalidDatetime { layout, .. } => format!("expected layout {}", layout),
        _ => error.message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ValidationErrorKind, ValidatorError};
    use tagval_yaml::SourceInfo;

    const SOURCE: &str = "name: John\nage: 16\n";

    fn gt_error() -> ValidationFailure {
        ValidationError::at(
            ValidationErrorKind::NotGreaterThan {
                field: "age".to_string(),
                threshold: 18,
            },
            SourceInfo::new(None, 16, 2, 6, 2),
        )
        .into()
    }

    #[test]
    fn test_render_positioned_failure() {
        let output = render_failures("person.yaml", SOURCE, &[gt_error()]);
        assert!(output.contains("TV-1-12"));
        assert!(output.contains("field 'age' must be greater than 18"));
        assert!(output.contains("person.yaml"));
        assert!(output.contains("age: 16"));
    }

    #[test]
    fn test_render_opaque_failure_as_plain_line() {
        let failure: ValidationFailure = ValidatorError::UnsupportedKind {
            rule: "gt".to_string(),
            kind: "string",
        }
        .into();
        let output = render_failures("person.yaml", SOURCE, &[failure]);
        assert_eq!(output, "error: rule 'gt' cannot check a string value\n");
    }

    #[test]
    fn test_render_nothing() {
        assert!(render_failures("person.yaml", SOURCE, &[]).is_empty());
    }
}

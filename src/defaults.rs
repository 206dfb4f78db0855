//! Determines the type of a field once defaults have been applied to it

use crate::{error::ErrorKind, schema::Schema, source::decl::GoType, Result};
use serde_json::Value;

/// The type a field has after defaulting
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultedType {
    /// The declared type, minus the pointer if the field is defaulted
    pub ty: String,
    /// The schema default for the field, `null` is treated as no default
    pub default: Option<Value>,
    /// Whether the field is listed as (eventually) required by the schema
    pub required: bool,
}

impl DefaultedType {
    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Resolves the post-defaulting type of the field tagged `tag`.
///
/// A field with a default must be declared as exactly one level of pointer,
/// as the pointer is how an unset value is distinguished from a set one
/// before defaults are applied.
pub fn resolve_defaulted_type(
    schema: &Schema,
    tag: &str,
    declared: &GoType,
) -> Result<DefaultedType> {
    let default = schema
        .property(tag)
        .and_then(Value::as_object)
        .and_then(|prop| prop.get("default"))
        .filter(|default| !default.is_null())
        .cloned();

    let required = schema.required().any(|req| req == tag);

    let ty = match (&default, declared) {
        (None, _) => declared.to_string(),
        (Some(_), GoType::Pointer(inner)) => {
            if matches!(**inner, GoType::Pointer(_)) {
                return Err(ErrorKind::DefaultOnDoublePointer {
                    tag: tag.to_owned(),
                    ty: declared.to_string(),
                }
                .into());
            }

            inner.to_string()
        }
        (Some(_), _) => {
            return Err(ErrorKind::DefaultOnNonPointer {
                tag: tag.to_owned(),
                ty: declared.to_string(),
            }
            .into());
        }
    };

    Ok(DefaultedType {
        ty,
        default,
        required,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{source::decl, ErrorCategory, Path};

    fn schema() -> Schema {
        Schema::new(
            url::Url::parse("http://determined.ai/schemas/expconf/v0/widget.json").unwrap(),
            r#"{
                "title": "Widget",
                "properties": {
                    "name": {"type": "string"},
                    "size": {"type": "integer", "default": 5},
                    "labels": {"type": ["array", "null"], "default": null},
                    "anything": true
                },
                "required": ["name"]
            }"#
            .to_owned(),
            Path::new("expconf/v0/widget.json"),
        )
        .unwrap()
    }

    fn ty(s: &str) -> GoType {
        decl::field(&format!("\tX {s}")).unwrap().ty
    }

    #[test]
    fn transparent_without_default() {
        let schema = schema();

        let dt = resolve_defaulted_type(&schema, "name", &ty("string")).unwrap();
        assert_eq!(dt.ty, "string");
        assert!(!dt.has_default());
        assert!(dt.required);

        // `true` property schemas and unknown properties have no defaults
        for tag in ["anything", "missing"] {
            let dt = resolve_defaulted_type(&schema, tag, &ty("*int")).unwrap();
            assert_eq!(dt.ty, "*int");
            assert!(!dt.required);
        }
    }

    #[test]
    fn null_default_is_no_default() {
        let dt = resolve_defaulted_type(&schema(), "labels", &ty("[]string")).unwrap();
        assert_eq!(dt.ty, "[]string");
        assert!(dt.default.is_none());
    }

    #[test]
    fn default_strips_pointer() {
        let dt = resolve_defaulted_type(&schema(), "size", &ty("*int")).unwrap();
        assert_eq!(dt.ty, "int");
        assert_eq!(dt.default, Some(serde_json::json!(5)));
    }

    #[test]
    fn default_requires_single_pointer() {
        let schema = schema();

        let err = resolve_defaulted_type(&schema, "size", &ty("int")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Convention);
        assert_eq!(
            err.to_string(),
            "size type (int) must be a pointer since it can be defaulted"
        );

        let err = resolve_defaulted_type(&schema, "size", &ty("**int")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "size type (**int) must not be a double pointer"
        );
    }
}

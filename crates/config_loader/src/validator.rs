//! Configuration validation
//!
//! Rules:
//! - every required setting is present and non-empty
//! - path prefix contains more than separators
//! - the default sink name does not shadow the inbound queue

use contracts::{ContractError, RouterConfig};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Validate a RouterConfig
///
/// Returns the first error encountered (fields in path order), or Ok(()).
pub fn validate(config: &RouterConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_path_prefix(config)?;
    validate_default_sink(config)?;
    Ok(())
}

/// Run derived field rules and report the first violation
fn validate_fields(config: &RouterConfig) -> Result<(), ContractError> {
    let Err(errors) = config.validate() else {
        return Ok(());
    };

    let mut flat = Vec::new();
    flatten("", &errors, &mut flat);
    flat.sort_by(|a, b| a.0.cmp(&b.0));

    match flat.into_iter().next() {
        Some((path, error)) if error.code == "missing" => {
            Err(ContractError::missing_setting(path))
        }
        Some((path, error)) => {
            let message = error
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            Err(ContractError::config_validation(path, message))
        }
        None => Err(ContractError::config_validation("config", errors.to_string())),
    }
}

fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut Vec<(String, ValidationError)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| (path.clone(), e.clone())));
            }
            ValidationErrorsKind::Struct(inner) => flatten(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    flatten(&format!("{path}[{idx}]"), inner, out);
                }
            }
        }
    }
}

fn validate_path_prefix(config: &RouterConfig) -> Result<(), ContractError> {
    if config.object_store.path_prefix.trim_matches('/').is_empty() {
        return Err(ContractError::config_validation(
            "object_store.path_prefix",
            format!(
                "path prefix '{}' has no non-separator characters",
                config.object_store.path_prefix
            ),
        ));
    }
    Ok(())
}

fn validate_default_sink(config: &RouterConfig) -> Result<(), ContractError> {
    if config.default_sink_name == config.inbound_queue_name {
        return Err(ContractError::config_validation(
            "default_sink_name",
            format!(
                "default sink name '{}' collides with the inbound queue",
                config.default_sink_name
            ),
        ));
    }
    Ok(())
}

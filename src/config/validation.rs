use super::models::Config;
use crate::handlers::HandlerRegistry;
use mime::Mime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Timeout must be positive: {field}")]
    ZeroTimeout { field: String },

    #[error("Invalid proxy URL '{proxy}': {reason}")]
    InvalidProxy { proxy: String, reason: String },

    #[error("Content type '{content_type}' is not a valid media type")]
    InvalidContentType { content_type: String },

    #[error("Content type '{content_type}' references unknown handler '{handler}'")]
    UnknownHandler {
        content_type: String,
        handler: String,
    },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_http(config)?;
    validate_content_types(config)?;
    Ok(())
}

fn validate_http(config: &Config) -> Result<(), ValidationError> {
    if config.http.connect_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "connect_timeout_ms".to_string(),
        });
    }

    if config.http.request_timeout_ms == 0 {
        return Err(ValidationError::ZeroTimeout {
            field: "request_timeout_ms".to_string(),
        });
    }

    if let Some(ref proxy) = config.http.proxy {
        url::Url::parse(proxy).map_err(|e| ValidationError::InvalidProxy {
            proxy: proxy.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

/// Every alias must be a bare media type pointing at a built-in handler
fn validate_content_types(config: &Config) -> Result<(), ValidationError> {
    for (content_type, handler) in &config.content_types {
        let parsed: Mime = content_type
            .parse()
            .map_err(|_| ValidationError::InvalidContentType {
                content_type: content_type.clone(),
            })?;

        // dispatch looks up the parameterless essence
        if parsed.essence_str() != content_type {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.clone(),
            });
        }

        if HandlerRegistry::builtin(handler).is_err() {
            return Err(ValidationError::UnknownHandler {
                content_type: content_type.clone(),
                handler: handler.clone(),
            });
        }
    }

    Ok(())
}

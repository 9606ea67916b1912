//! Conversion errors.

use source_map::Location;
use std::fmt;
use thiserror::Error;
use vue_template_parser::ParseError;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The component has nothing to convert.
    #[error("component has no <template> block")]
    NoTemplate,

    #[error("template parse error at {location}: {source}")]
    Parse {
        #[source]
        source: ParseError,
        location: Location,
    },

    #[error("{stage} failed: {message}{}", in_expression(.expression))]
    Translation {
        stage: Stage,
        message: String,
        expression: Option<String>,
    },
}

impl ConvertError {
    pub fn normalize(message: impl Into<String>) -> Self {
        Self::Translation {
            stage: Stage::Normalize,
            message: message.into(),
            expression: None,
        }
    }

    pub fn translate(message: impl Into<String>, expression: &str) -> Self {
        Self::Translation {
            stage: Stage::Translate,
            message: message.into(),
            expression: Some(expression.trim().to_string()),
        }
    }

    pub fn emit(message: impl Into<String>) -> Self {
        Self::Translation {
            stage: Stage::Emit,
            message: message.into(),
            expression: None,
        }
    }
}

fn in_expression(expression: &Option<String>) -> String {
    expression
        .as_ref()
        .map(|e| format!(" in `{}`", e))
        .unwrap_or_default()
}

/// Pipeline stage that raised a translation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    Translate,
    Emit,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normalize => "normalize",
            Self::Translate => "translate",
            Self::Emit => "emit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

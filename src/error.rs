use crate::language::Language;

/// Error types for grammatical label resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// A grammatical axis the language does not carry was requested.
    #[error("{language} does not support {detail}")]
    UnsupportedForm { language: Language, detail: String },

    /// The noun has no stored or derivable string for the form.
    #[error("no form {form} available for noun '{noun}'")]
    NoFormAvailable { noun: String, form: String },

    /// The key is absent from every layer and every fallback locale.
    #[error("label '{key}' not found in section '{section}'")]
    LabelNotFound { section: String, key: String },

    /// Alias resolution revisited a label it had already followed.
    #[error("alias cycle: {}", chain.join(" -> "))]
    AliasCycle { chain: Vec<String> },

    /// A noun reference names an entity neither the renaming layer nor the dictionary knows.
    #[error("no noun available for entity reference {reference}")]
    MissingEntity { reference: String },

    /// A label template is malformed.
    #[error("invalid template {section}.{key}: {message}")]
    Template {
        section: String,
        key: String,
        message: String,
    },

    #[error("invalid locale '{0}'")]
    InvalidLocale(String),

    /// The label source could not be read or decoded.
    #[error("label source error: {0}")]
    Source(String),

    #[error(transparent)]
    Date(#[from] crate::dates::DateError),
}

/// Result type for grammar operations
pub type GrammarResult<T> = Result<T, GrammarError>;

impl GrammarError {
    pub(crate) fn template(section: &str, key: &str, message: impl Into<String>) -> Self {
        GrammarError::Template {
            section: section.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(language: Language, detail: impl Into<String>) -> Self {
        GrammarError::UnsupportedForm {
            language,
            detail: detail.into(),
        }
    }
}

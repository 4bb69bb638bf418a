//! Structured error types for revgrid.
//!
//! Expected absence (a pixel outside every column, no focused cell) is never
//! an error: lookups return `Option`/`bool`. Errors are reserved for broken
//! invariants and for external input that cannot be accepted.

/// All errors that can occur in the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A programming invariant was violated (gesture sequencing bug and the like).
    #[error("Assertion {code}: {context}")]
    Assertion {
        code: &'static str,
        context: String,
    },

    /// A closed set of cases reached a value it does not handle.
    #[error("Unreachable case {code}: {value}")]
    UnreachableCase { code: &'static str, value: String },

    /// Settings could not be parsed.
    #[error("Settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// The data server does not accept edits.
    #[error("Data server is read only")]
    ReadOnly,

    /// A subgrid id did not resolve.
    #[error("Unknown subgrid: {0}")]
    UnknownSubgrid(usize),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// Catch-all for string errors from host bindings.
    #[error("{0}")]
    Other(String),
}

impl GridError {
    /// Build an assertion error with a short code and context.
    pub fn assertion(code: &'static str, context: impl Into<String>) -> Self {
        Self::Assertion {
            code,
            context: context.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

//!
//! # Database Result and Error Types
//!

// Local Imports
pub use crate::utils::{self, ErrorContext};

/// # [DbError] Result Type
pub type DbResult<T> = Result<T, DbError>;

///
/// # Database Error Enumeration
///
pub enum DbError {
    /// Error writing a cell view, with processing context
    Write {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Error opening a library or its technology
    Open { message: String },
    /// Library-definition file errors
    LibDefs(libdefs21::LibDefsError),
    /// Boxed External Errors
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// Uncategorized Error, with String Message
    Str(String),
}
impl DbError {
    /// Create a [DbError::Str] from anything String-convertible
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }
    /// Create an error-variant [Result] of our [DbError::Str] variant from anything String-convertible
    pub fn fail<T>(s: impl Into<String>) -> Result<T, Self> {
        Err(Self::msg(s))
    }
    /// Create a [DbError::Open] from anything String-convertible
    pub fn open(s: impl Into<String>) -> Self {
        Self::Open { message: s.into() }
    }
}
impl std::fmt::Debug for DbError {
    /// Display a [DbError]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DbError::Write { message, stack } => {
                write!(f, "Write Error: \n - {} \n - {:?}", message, stack)
            }
            DbError::Open { message } => write!(f, "Open Error: {}", message),
            DbError::LibDefs(err) => write!(f, "Lib-Defs Error: {:?}", err),
            DbError::Boxed(err) => err.fmt(f),
            DbError::Str(err) => err.fmt(f),
        }
    }
}
impl std::fmt::Display for DbError {
    /// Display a [DbError]
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Boxed(e) => Some(&**e),
            Self::LibDefs(e) => Some(e),
            _ => None,
        }
    }
}

impl From<String> for DbError {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<&str> for DbError {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
impl From<libdefs21::LibDefsError> for DbError {
    fn from(e: libdefs21::LibDefsError) -> Self {
        Self::LibDefs(e)
    }
}
impl From<std::io::Error> for DbError {
    fn from(e: std::io::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<utils::ser::Error> for DbError {
    fn from(e: utils::ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<std::num::TryFromIntError> for DbError {
    fn from(e: std::num::TryFromIntError) -> Self {
        Self::Boxed(Box::new(e))
    }
}

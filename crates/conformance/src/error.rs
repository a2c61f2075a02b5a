//! Driver error codes the reference rules produce

use thiserror::Error;

/// Error a conforming driver reports for a rejected call
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlError {
    /// An enumerated argument is not accepted
    #[error("GL_INVALID_ENUM")]
    InvalidEnum,

    /// A numeric argument is out of range
    #[error("GL_INVALID_VALUE")]
    InvalidValue,

    /// The call is not allowed in the current state
    #[error("GL_INVALID_OPERATION")]
    InvalidOperation,

    /// Not enough memory left to execute the call
    #[error("GL_OUT_OF_MEMORY")]
    OutOfMemory,
}

impl GlError {
    /// Numeric code as returned by `glGetError`
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidEnum => 0x0500,
            Self::InvalidValue => 0x0501,
            Self::InvalidOperation => 0x0502,
            Self::OutOfMemory => 0x0505,
        }
    }
}

/// Outcome of a call checked against the reference rules
pub type GlResult<T> = Result<T, GlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GlError::InvalidEnum.code(), 0x0500);
        assert_eq!(GlError::InvalidValue.code(), 0x0501);
        assert_eq!(GlError::InvalidOperation.code(), 0x0502);
        assert_eq!(GlError::OutOfMemory.code(), 0x0505);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(GlError::InvalidOperation.to_string(), "GL_INVALID_OPERATION");
    }
}

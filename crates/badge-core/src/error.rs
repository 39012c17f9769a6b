//! Errors surfaced to the calling runtime

extern crate alloc;

use alloc::string::String;

/// OS error numbers carried by [`BadgeError::Os`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    Eio,
    Enodev,
    Einval,
}

impl Errno {
    pub fn code(self) -> i32 {
        match self {
            Errno::Eio => 5,
            Errno::Enodev => 19,
            Errno::Einval => 22,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Errno::Eio => "EIO",
            Errno::Enodev => "ENODEV",
            Errno::Einval => "EINVAL",
        }
    }
}

/// Error returned by a native call, shaped like the runtime's exception kinds
#[derive(Debug, Clone, PartialEq)]
pub enum BadgeError {
    /// Wrong argument type or count
    Type(String),
    /// Right type, unusable value
    Value(String),
    /// Unknown module or member
    Attribute { module: String, name: String },
    /// Recoverable OS-level failure
    Os(Errno),
    /// An allocation the call needed could not be made
    Memory(String),
    /// Console input could not be parsed
    Parse { column: usize, message: String },
}

impl core::fmt::Display for BadgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BadgeError::Type(msg) => write!(f, "TypeError: {}", msg),
            BadgeError::Value(msg) => write!(f, "ValueError: {}", msg),
            BadgeError::Attribute { module, name } if name.is_empty() => {
                write!(f, "ImportError: no module named '{}'", module)
            }
            BadgeError::Attribute { module, name } => {
                write!(f, "AttributeError: '{}' has no attribute '{}'", module, name)
            }
            BadgeError::Os(errno) => write!(f, "OSError: [Errno {}] {}", errno.code(), errno.name()),
            BadgeError::Memory(msg) => write!(f, "MemoryError: {}", msg),
            BadgeError::Parse { column, message } => {
                write!(f, "SyntaxError: {} (column {})", message, column)
            }
        }
    }
}

impl core::error::Error for BadgeError {}

/// Failure reported by a hardware backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalError {
    /// Backend-specific status code (`esp_err_t` on target)
    pub code: i32,
    pub message: String,
}

impl HalError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl core::error::Error for HalError {}

impl From<HalError> for BadgeError {
    fn from(err: HalError) -> Self {
        log::warn!("hardware call failed: {}", err);
        BadgeError::Os(Errno::Eio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn os_error_renders_errno() {
        let err = BadgeError::Os(Errno::Einval);
        assert_eq!(err.to_string(), "OSError: [Errno 22] EINVAL");
    }

    #[test]
    fn memory_error_renders_kind() {
        let err = BadgeError::Memory("memory allocation failed, allocating 8 bytes".into());
        assert_eq!(
            err.to_string(),
            "MemoryError: memory allocation failed, allocating 8 bytes"
        );
    }

    #[test]
    fn hal_error_maps_to_eio() {
        let err: BadgeError = HalError::new(-1, "spi timeout").into();
        assert_eq!(err, BadgeError::Os(Errno::Eio));
    }
}

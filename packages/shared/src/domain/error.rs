//! Value object validation errors.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ClientId validation error
    #[error("ClientId cannot be empty")]
    ClientIdEmpty,

    /// ClientId too long error
    #[error("ClientId cannot exceed {max} characters (got {actual})")]
    ClientIdTooLong { max: usize, actual: usize },

    /// ClientId contains a character outside `[A-Za-z0-9_-]`
    #[error("ClientId contains an invalid character: {0:?}")]
    ClientIdInvalidChar(char),

    /// ChannelName validation error
    #[error("ChannelName cannot be empty")]
    ChannelNameEmpty,

    /// ChannelName too long error
    #[error("ChannelName cannot exceed {max} characters (got {actual})")]
    ChannelNameTooLong { max: usize, actual: usize },

    /// ChannelName contains a character outside the URL-unreserved set
    #[error("ChannelName contains an invalid character: {0:?}")]
    ChannelNameInvalidChar(char),
}

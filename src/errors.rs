use std::result;

/// Convenience Result type.
pub type Result<T> = result::Result<T, failure::Error>;

/// Errors
#[derive(Debug, Clone, PartialEq, Eq, failure::Fail)]
pub enum MapError {
    /// A mapping line did not split into exactly two whitespace-separated tokens
    #[fail(
        display = "Malformed line {}: expected 2 tokens, found {}",
        line_number, tokens
    )]
    MalformedLine {
        /// 1-based line number in the mapping file
        line_number: usize,
        /// Number of tokens found on the line
        tokens: usize,
    },

    /// The mapping file is not valid UTF-8
    #[fail(display = "Mapping file is not valid UTF-8: {}", path)]
    InvalidEncoding {
        /// Path of the offending file
        path: String,
    },

    /// The store could not be reached
    #[fail(display = "Could not connect to store at {}: {}", addr, cause)]
    StoreConnection {
        /// Address we tried to connect to
        addr: String,
        /// Underlying failure
        cause: String,
    },

    /// The store rejected a single command. Affects only the key involved.
    #[fail(display = "Store operation failed: {}", message)]
    StoreOperation {
        /// Message returned by the store
        message: String,
    },

    /// The store answered with a reply of the wrong shape for the command
    #[fail(display = "Unexpected reply from store: {}", reply)]
    UnexpectedReply {
        /// Debug rendering of the reply
        reply: String,
    },

    /// The store sent bytes that are not valid RESP
    #[fail(display = "Protocol error: {}", message)]
    Protocol {
        /// What was wrong
        message: String,
    },

    /// The store closed the connection
    #[fail(display = "Store connection closed")]
    ConnectionClosed,
}

impl MapError {
    /// Can processing continue with the next key after this error?
    pub fn is_recoverable(&self) -> bool {
        match self {
            MapError::StoreOperation { .. } | MapError::MalformedLine { .. } => true,
            _ => false,
        }
    }
}

/// Does this error only affect a single key or line?
pub fn is_recoverable(err: &failure::Error) -> bool {
    err.downcast_ref::<MapError>()
        .map_or(false, MapError::is_recoverable)
}

//! Request and reply messages of the unary and server-streaming calls

/// Unary greeting request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetRequest {
    pub name: String,
    pub message: String,
}

impl GreetRequest {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Unary greeting reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetReply {
    pub message: String,

    /// Name of the storekeeper answering
    pub responder_name: String,
}

/// Catalog listing request; the message is only logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub message: String,
}

impl CatalogRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

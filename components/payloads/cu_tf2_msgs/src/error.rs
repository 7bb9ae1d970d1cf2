use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Message type '{0}' is already registered")]
    DuplicateName(String),

    #[error("Message type '{0}' is not registered")]
    UnknownType(String),

    #[error("Failed to encode {type_name}: {reason}")]
    Encoding { type_name: String, reason: String },

    #[error("Failed to decode {type_name}: {reason}")]
    Decoding { type_name: String, reason: String },

    #[error("Invalid wire configuration: {0}")]
    Config(String),
}

impl RegistryError {
    pub fn encoding(type_name: &str, reason: impl ToString) -> Self {
        RegistryError::Encoding {
            type_name: type_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn decoding(type_name: &str, reason: impl ToString) -> Self {
        RegistryError::Decoding {
            type_name: type_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

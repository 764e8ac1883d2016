use crate::utils::error::IdError;

/// Identifier assigned to a topic at creation time.
pub type TopicId = String;

/// Source of fresh topic identifiers.
///
/// The store only ever asks for one id per `create`; implementations must not
/// hand out an empty or otherwise degraded value when they fail.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Result<TopicId, IdError>;
}

/// Produces random 128-bit identifiers formatted as hyphenated hex
/// (`xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`).
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> Result<TopicId, IdError> {
        let mut bytes = [0u8; 16];
        getrandom::getrandom(&mut bytes).map_err(|e| IdError::Entropy(e.to_string()))?;
        let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Ok(id.hyphenated().to_string())
    }
}


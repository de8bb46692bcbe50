use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn required(field: &str) -> Self { Self::Validation(format!("{} is required", field)) }

    pub fn duplicate(entity: &str, field: &str, value: &str) -> Self {
        Self::Validation(format!("{} with {} '{}' already exists", entity, field, value))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable() {
        assert_eq!(
            ServiceError::not_found("function").to_string(),
            "not found: function not found"
        );
        assert_eq!(
            ServiceError::required("code").to_string(),
            "validation error: code is required"
        );
        assert_eq!(
            ServiceError::duplicate("collection", "name", "users").to_string(),
            "validation error: collection with name 'users' already exists"
        );
    }
}

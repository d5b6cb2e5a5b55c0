use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeriveError {
    #[error("message body is empty")]
    EmptyBody,

    #[error("malformed message body: {0}")]
    Malformed(String),
}

/// Turns an inbound message body into the outbound body.
///
/// Implementations must be pure: a redelivered message has to produce exactly the same
/// outbound body as its first delivery did.
pub trait BodyDeriver: Send + Sync {
    fn derive(&self, body: &str) -> Result<String, DeriveError>;
}

impl<F> BodyDeriver for F
where
    F: Fn(&str) -> Result<String, DeriveError> + Send + Sync,
{
    fn derive(&self, body: &str) -> Result<String, DeriveError> {
        self(body)
    }
}

/// Annotates an instance identifier, e.g. `i-0abc123` becomes `i-0abc123 instance name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceNameDeriver;

impl InstanceNameDeriver {
    const SUFFIX: &'static str = "instance name";
}

impl BodyDeriver for InstanceNameDeriver {
    fn derive(&self, body: &str) -> Result<String, DeriveError> {
        let instance_id = body.trim();
        if instance_id.is_empty() {
            return Err(DeriveError::EmptyBody);
        }
        Ok(format!("{instance_id} {}", Self::SUFFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_name_suffix() {
        let derived = InstanceNameDeriver.derive("i-0abc123").unwrap();
        assert_eq!(derived, "i-0abc123 instance name");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let derived = InstanceNameDeriver.derive("  i-0abc123\n").unwrap();
        assert_eq!(derived, "i-0abc123 instance name");
    }

    #[test]
    fn test_blank_body_is_rejected() {
        assert_eq!(InstanceNameDeriver.derive(""), Err(DeriveError::EmptyBody));
        assert_eq!(InstanceNameDeriver.derive(" \t\n"), Err(DeriveError::EmptyBody));
    }

    #[test]
    fn test_same_body_derives_same_output() {
        let first = InstanceNameDeriver.derive("i-0def456").unwrap();
        let redelivered = InstanceNameDeriver.derive("i-0def456").unwrap();
        assert_eq!(first, redelivered);
    }

    #[test]
    fn test_closures_are_derivers() {
        let upper = |body: &str| -> Result<String, DeriveError> {
            if body.starts_with("i-") {
                Ok(body.to_uppercase())
            } else {
                Err(DeriveError::Malformed(format!("not an instance id: {body}")))
            }
        };
        assert_eq!(upper.derive("i-abc").unwrap(), "I-ABC");
        assert!(matches!(upper.derive("vol-1"), Err(DeriveError::Malformed(_))));
    }
}

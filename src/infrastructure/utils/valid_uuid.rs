use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path identifier; anything that is not a UUID cannot name a record.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::InvalidId(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_uuids() {
        let id = Uuid::new_v4();
        assert_eq!(valid_uuid(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn rejects_other_identifiers() {
        assert!(matches!(
            valid_uuid("64b7f0c2e13a4f0012345678"),
            Err(AppError::InvalidId(v)) if v == "64b7f0c2e13a4f0012345678"
        ));
    }
}

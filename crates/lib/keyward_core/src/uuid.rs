// Subject ids are random (v4) UUIDs generated app-side, so the in-memory and
// PostgreSQL stores hand out ids of the same shape.

use uuid::Uuid;

/// Generate a new credential record id.
pub fn new_subject_id() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_id_is_v4() {
        let id = new_subject_id();
        assert_eq!(id.get_version(), Some(uuid::Version::Random));
    }

    #[test]
    fn subject_ids_differ() {
        assert_ne!(new_subject_id(), new_subject_id());
    }
}

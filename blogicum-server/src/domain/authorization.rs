use super::error::DomainError;

/// Only the owner of a post or comment may edit or delete it.
///
/// Denial is `Forbidden`, not `NotFound`: the actor already holds the id.
pub(crate) fn authorize_mutation(actor_id: i64, resource_owner_id: i64) -> Result<(), DomainError> {
    if actor_id == resource_owner_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::authorize_mutation;
    use crate::domain::error::DomainError;

    #[test]
    fn owner_is_allowed() {
        assert!(authorize_mutation(7, 7).is_ok());
    }

    #[test]
    fn other_user_is_forbidden() {
        let err = authorize_mutation(7, 8).expect_err("must deny");
        assert!(matches!(err, DomainError::Forbidden));
    }
}

//! Translation of driver errors into domain errors.
//!
//! Repositories never let `sqlx::Error` cross the port boundary. Most
//! failures wrap into `RepositoryError::Storage` with the operation name for
//! context; unique-constraint violations are recognized here and turned into
//! `RepositoryError::Duplicate` naming the domain field, with the offending
//! value supplied by the caller (drivers echo values inconsistently, so we
//! never scrape them out of messages).

use veil_core::RepositoryError;

/// What kind of constraint, if any, a driver error reports.
#[derive(Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A unique constraint or index, with its name when the driver provides
    /// one.
    Unique(String),
    ForeignKey,
    Other,
}

/// Classify a driver error by constraint kind.
///
/// PostgreSQL reports the constraint name directly; MySQL only embeds it in
/// the error message, so that path falls back to [`constraint_from_message`].
pub fn constraint_kind(err: &sqlx::Error) -> ConstraintKind {
    let Some(db_err) = err.as_database_error() else {
        return ConstraintKind::Other;
    };
    match db_err.kind() {
        sqlx::error::ErrorKind::UniqueViolation => {
            let name = db_err
                .constraint()
                .map(str::to_string)
                .or_else(|| constraint_from_message(db_err.message()))
                .unwrap_or_default();
            ConstraintKind::Unique(name)
        }
        sqlx::error::ErrorKind::ForeignKeyViolation => ConstraintKind::ForeignKey,
        _ => ConstraintKind::Other,
    }
}

/// Pull the key name out of a MySQL duplicate-entry message, e.g.
/// `Duplicate entry 'bob' for key 'users.uq_users_username'`.
///
/// The last `for key '...'` occurrence is taken so a duplicated value that
/// happens to contain the phrase cannot spoof the key name.
pub fn constraint_from_message(message: &str) -> Option<String> {
    let (_, tail) = message.rsplit_once("for key '")?;
    let (name, _) = tail.split_once('\'')?;
    Some(name.to_string())
}

/// Map a constraint name to the domain field it guards.
///
/// MySQL reports keys table-qualified (`users.uq_users_username`); the
/// qualifier is stripped before matching.
#[must_use]
pub fn field_for_constraint(name: &str) -> Option<&'static str> {
    let bare = name.rsplit_once('.').map_or(name, |(_, key)| key);
    match bare {
        "uq_users_username" => Some("username"),
        "uq_users_email" => Some("email"),
        "uq_sessions_jwt_id" => Some("jwt_id"),
        "uq_ban_lists_setting_id" => Some("setting_id"),
        "uq_model_entities_entity" => Some("entity_text"),
        _ => None,
    }
}

/// Wrap a driver error as a storage failure carrying the operation name.
pub(crate) fn storage(op: &str, err: &sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(format!("{op}: {err}"))
}

/// Translate a write failure: a recognized unique violation becomes
/// `Duplicate` carrying the caller's value for the guarded field, anything
/// else becomes a storage error.
pub(crate) fn duplicate_or_storage(
    op: &str,
    err: &sqlx::Error,
    values: &[(&'static str, &str)],
) -> RepositoryError {
    match constraint_kind(err) {
        ConstraintKind::Unique(name) => match field_for_constraint(&name) {
            Some(field) => {
                let value = values
                    .iter()
                    .find(|(candidate, _)| *candidate == field)
                    .map(|(_, value)| (*value).to_string())
                    .unwrap_or_default();
                RepositoryError::Duplicate { field, value }
            }
            None => storage(op, err),
        },
        ConstraintKind::ForeignKey | ConstraintKind::Other => storage(op, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mysql_qualified_key_from_message() {
        let msg = "Duplicate entry 'bob' for key 'users.uq_users_username'";
        assert_eq!(
            constraint_from_message(msg).as_deref(),
            Some("users.uq_users_username")
        );
    }

    #[test]
    fn parses_unqualified_key_from_message() {
        let msg = "Duplicate entry 'x' for key 'uq_sessions_jwt_id'";
        assert_eq!(
            constraint_from_message(msg).as_deref(),
            Some("uq_sessions_jwt_id")
        );
    }

    #[test]
    fn takes_last_for_key_occurrence_when_value_contains_phrase() {
        let msg = "Duplicate entry 'payload for key 'fake'' for key 'users.uq_users_email'";
        assert_eq!(
            constraint_from_message(msg).as_deref(),
            Some("users.uq_users_email")
        );
    }

    #[test]
    fn message_without_key_yields_none() {
        assert_eq!(constraint_from_message("connection reset"), None);
    }

    #[test]
    fn maps_known_constraints_to_fields() {
        assert_eq!(field_for_constraint("uq_users_username"), Some("username"));
        assert_eq!(
            field_for_constraint("users.uq_users_email"),
            Some("email")
        );
        assert_eq!(
            field_for_constraint("sessions.uq_sessions_jwt_id"),
            Some("jwt_id")
        );
        assert_eq!(
            field_for_constraint("uq_ban_lists_setting_id"),
            Some("setting_id")
        );
        assert_eq!(
            field_for_constraint("model_entities.uq_model_entities_entity"),
            Some("entity_text")
        );
    }

    #[test]
    fn unknown_constraints_map_to_no_field() {
        assert_eq!(field_for_constraint("users_pkey"), None);
        assert_eq!(field_for_constraint("sessions.PRIMARY"), None);
        assert_eq!(field_for_constraint(""), None);
    }

    #[test]
    fn non_database_errors_classify_as_other() {
        assert_eq!(constraint_kind(&sqlx::Error::RowNotFound), ConstraintKind::Other);
    }
}

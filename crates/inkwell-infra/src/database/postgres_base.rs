//! Query helpers shared by the PostgreSQL repository methods.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PrimaryKeyTrait, SqlErr};

use inkwell_core::error::RepoError;

/// Translate a SeaORM error into the repository taxonomy.
///
/// Unique and foreign-key violations become `Constraint` so the route layer
/// can answer with a client error instead of a 500.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepoError::Constraint(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => RepoError::Constraint(detail),
        _ => match err {
            DbErr::Conn(e) => RepoError::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => RepoError::Query(other.to_string()),
        },
    }
}

/// Fetch one row by integer primary key and convert it to a domain type.
pub(crate) async fn find_by_id<E, T, C>(db: &C, id: i32) -> Result<Option<T>, RepoError>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    T: From<E::Model>,
    C: ConnectionTrait,
{
    let result = E::find_by_id(id).one(db).await.map_err(map_db_err)?;
    Ok(result.map(Into::into))
}

/// Mask the local part of an email address for logging.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() > 1 => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        Some((_, domain)) => format!("***@{domain}"),
        None => "***".to_string(),
    }
}

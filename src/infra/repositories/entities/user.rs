//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{values::Email, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event::Entity")]
    CreatedEvents,
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// The stored email was validated on the way in, so it is restored
/// without re-validation.
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            name: model.name,
            email: Email::from_stored(model.email),
            password_hash: model.password_hash,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

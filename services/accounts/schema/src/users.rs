use sea_orm::entity::prelude::*;

/// User record owned by the accounts service.
///
/// `roles` is a bitmask (see `readnest_domain::role::RoleSet`). The reset
/// code lives directly on this record — at most one outstanding reset per
/// user, a new request overwrites the old one.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub enabled: bool,
    pub account_locked: bool,
    pub locked_at: Option<chrono::DateTime<chrono::Utc>>,
    pub unlock_at: Option<chrono::DateTime<chrono::Utc>>,
    pub reset_code: Option<String>,
    pub reset_code_expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub roles: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::activation_codes::Entity")]
    ActivationCodes,
}

impl Related<super::activation_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivationCodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

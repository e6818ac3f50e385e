use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, SqlErr, sea_query::Expr,
};
use uuid::Uuid;

use readnest_accounts_schema::{activation_codes, users};
use readnest_domain::role::RoleSet;

use crate::domain::repository::{ActivationCodeRepository, UserRepository};
use crate::domain::types::{ActivationCode, User};
use crate::error::AccountsServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_reset_code(&self, code: &str) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::ResetCode.eq(code))
            .one(&self.db)
            .await
            .context("find user by reset code")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), AccountsServiceError> {
        let model = users::ActiveModel {
            id: Set(user.id),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            enabled: Set(user.enabled),
            account_locked: Set(user.account_locked),
            locked_at: Set(user.locked_at),
            unlock_at: Set(user.unlock_at),
            reset_code: Set(user.reset_code.clone()),
            reset_code_expires_at: Set(user.reset_code_expires_at),
            roles: Set(user.roles.as_bits()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };
        if let Err(e) = model.insert(&self.db).await {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                return Err(AccountsServiceError::DuplicateEmail);
            }
            return Err(e).context("create user").map_err(Into::into);
        }
        Ok(())
    }

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> Result<(), AccountsServiceError> {
        users::ActiveModel {
            id: Set(id),
            enabled: Set(enabled),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user enabled")?;
        Ok(())
    }

    async fn set_locked(
        &self,
        id: Uuid,
        locked_at: DateTime<Utc>,
        unlock_at: DateTime<Utc>,
    ) -> Result<(), AccountsServiceError> {
        users::ActiveModel {
            id: Set(id),
            account_locked: Set(true),
            locked_at: Set(Some(locked_at)),
            unlock_at: Set(Some(unlock_at)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user locked")?;
        Ok(())
    }

    async fn set_reset_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccountsServiceError> {
        users::ActiveModel {
            id: Set(id),
            reset_code: Set(Some(code.to_owned())),
            reset_code_expires_at: Set(Some(expires_at)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set reset code")?;
        Ok(())
    }

    async fn finish_reset(
        &self,
        id: Uuid,
        expected_code: &str,
        new_password_hash: &str,
    ) -> Result<bool, AccountsServiceError> {
        // Guarded single statement: the reset-code filter makes concurrent
        // submissions of the same code a one-winner race.
        let result = users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(new_password_hash))
            .col_expr(users::Column::ResetCode, Expr::value(Option::<String>::None))
            .col_expr(
                users::Column::ResetCodeExpiresAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(users::Column::AccountLocked, Expr::value(false))
            .col_expr(users::Column::LockedAt, Expr::value(Option::<DateTime<Utc>>::None))
            .col_expr(users::Column::UnlockAt, Expr::value(Option::<DateTime<Utc>>::None))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::ResetCode.eq(expected_code))
            .exec(&self.db)
            .await
            .context("finish password reset")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        password_hash: model.password_hash,
        enabled: model.enabled,
        account_locked: model.account_locked,
        locked_at: model.locked_at,
        unlock_at: model.unlock_at,
        reset_code: model.reset_code,
        reset_code_expires_at: model.reset_code_expires_at,
        roles: RoleSet::from_bits(model.roles),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Activation-code repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbActivationCodeRepository {
    pub db: DatabaseConnection,
}

impl ActivationCodeRepository for DbActivationCodeRepository {
    async fn create(&self, code: &ActivationCode) -> Result<(), AccountsServiceError> {
        activation_codes::ActiveModel {
            id: Set(code.id),
            user_id: Set(code.user_id),
            code: Set(code.code.clone()),
            expires_at: Set(code.expires_at),
            validated_at: Set(code.validated_at),
            created_at: Set(code.created_at),
        }
        .insert(&self.db)
        .await
        .context("create activation code")?;
        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ActivationCode>, AccountsServiceError> {
        let model = activation_codes::Entity::find()
            .filter(activation_codes::Column::Code.eq(code))
            .order_by_desc(activation_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find activation code")?;
        Ok(model.map(activation_code_from_model))
    }

    async fn consume(&self, id: Uuid) -> Result<bool, AccountsServiceError> {
        // The null filter is the atomicity guard: only one concurrent caller
        // sees rows_affected == 1.
        let result = activation_codes::Entity::update_many()
            .col_expr(activation_codes::Column::ValidatedAt, Expr::value(Utc::now()))
            .filter(activation_codes::Column::Id.eq(id))
            .filter(activation_codes::Column::ValidatedAt.is_null())
            .exec(&self.db)
            .await
            .context("consume activation code")?;
        Ok(result.rows_affected > 0)
    }
}

fn activation_code_from_model(model: activation_codes::Model) -> ActivationCode {
    ActivationCode {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        expires_at: model.expires_at,
        validated_at: model.validated_at,
        created_at: model.created_at,
    }
}

//! Database queries for users.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use crate::entity::user::{self, ActiveModel, Entity as User};
use crate::error::{AppError, AppResult};
use crate::models::Role;

use super::DbPool;

impl DbPool {
    pub async fn insert_user(&self, model: user::Model) -> AppResult<user::Model> {
        let mut active: ActiveModel = model.into_active_model().reset_all();
        active.id = NotSet;
        active
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert user: {}", e)))
    }

    pub async fn get_user(&self, id: i32) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user: {}", e)))
    }

    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user by email: {}", e)))
    }

    /// Active institutional admins of an institution.
    pub async fn list_institutional_admins(&self, institution_id: i32) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::InstitutionId.eq(institution_id))
            .filter(user::Column::Role.eq(Role::InstitutionalAdmin.as_str()))
            .filter(user::Column::DeactivatedAt.is_null())
            .order_by_asc(user::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list institutional admins: {}", e)))
    }

    /// Replace the stored API key hash.
    pub async fn set_user_api_key_hash(&self, id: i32, key_hash: String) -> AppResult<user::Model> {
        let user = self
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;

        let mut active: ActiveModel = user.into();
        active.api_key_hash = Set(Some(key_hash));
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to set API key: {}", e)))
    }

    /// Every active user of an institution.
    pub async fn list_active_users(&self, institution_id: i32) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::InstitutionId.eq(institution_id))
            .filter(user::Column::DeactivatedAt.is_null())
            .order_by_asc(user::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))
    }
}

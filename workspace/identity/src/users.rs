//! User lifecycle: create, update, reload, destroy, plus the token flows
//! (remember, activation, password reset) that hang off a persisted user.
//!
//! Writes go through [`user::ActiveModel`], so the entity's save hook
//! downcases the email no matter which function performed the write.

use crate::auth::{self, DigestKind};
use crate::error::{IdentityError, Result};
use crate::password::{hash_secret, new_token};
use crate::validation::{self, NewUser, UserChanges};
use chrono::Utc;
use model::entities::{micropost, user};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, trace, warn};
use validator::{Validate, ValidationErrors};

/// A freshly created user and the activation token that was hashed into it.
/// The raw token exists only here; only its digest is stored.
#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub user: user::Model,
    pub activation_token: String,
}

/// Outcome of [`destroy_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyedUser {
    pub user_id: i32,
    pub microposts_removed: u64,
}

fn by_email(email: &str) -> Select<user::Entity> {
    user::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(user::Column::Email)))
            .eq(user::normalize_email(email)),
    )
}

/// Case-insensitive check whether `email` belongs to any user other than `except`.
pub async fn email_taken(
    db: &DatabaseConnection,
    email: &str,
    except: Option<i32>,
) -> Result<bool> {
    let mut query = by_email(email);
    if let Some(id) = except {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    Ok(by_email(email).one(db).await?)
}

/// Reads the persisted state of a user back from the database.
pub async fn reload_user(db: &DatabaseConnection, user_id: i32) -> Result<user::Model> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| IdentityError::NotFound(format!("User {}", user_id)))
}

/// Users ordered by id. `page` is 1-based.
pub async fn list_users(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<Vec<user::Model>> {
    Ok(user::Entity::find()
        .order_by_asc(user::Column::Id)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await?)
}

/// Runs the field rules and the uniqueness rule, returning every failure.
pub async fn validate_new_user(db: &DatabaseConnection, new_user: &NewUser) -> Result<()> {
    let mut errors = new_user.validate().err().unwrap_or_else(ValidationErrors::new);
    if !validation::is_blank(&new_user.email) && email_taken(db, &new_user.email, None).await? {
        errors.add("email", validation::taken());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        debug!("New user rejected by validation: {}", errors);
        Err(IdentityError::Validation(errors))
    }
}

/// Validates and persists a new user. The password and a fresh activation
/// token are stored as digests only.
#[instrument(skip(db, new_user))]
pub async fn create_user(db: &DatabaseConnection, new_user: NewUser) -> Result<CreatedUser> {
    trace!("Entering create_user function");
    validate_new_user(db, &new_user).await?;

    let activation_token = new_token();
    let active = user::ActiveModel {
        name: Set(new_user.name),
        email: Set(new_user.email),
        password_digest: Set(hash_secret(&new_user.password)?),
        admin: Set(false),
        activation_digest: Set(Some(hash_secret(&activation_token)?)),
        activated: Set(false),
        ..Default::default()
    };

    let user = active.insert(db).await.map_err(IdentityError::from_write)?;
    info!("User created successfully with ID: {}", user.id);

    Ok(CreatedUser {
        user,
        activation_token,
    })
}

/// Applies a partial update. Only supplied fields are validated; a new
/// password replaces the digest.
#[instrument(skip(db, changes))]
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i32,
    changes: UserChanges,
) -> Result<user::Model> {
    trace!("Entering update_user function for user_id: {}", user_id);

    let mut errors = changes.validate().err().unwrap_or_else(ValidationErrors::new);
    if let Some(email) = &changes.email {
        if !validation::is_blank(email) && email_taken(db, email, Some(user_id)).await? {
            errors.add("email", validation::taken());
        }
    }
    if !errors.is_empty() {
        debug!("Update of user {} rejected by validation: {}", user_id, errors);
        return Err(IdentityError::Validation(errors));
    }

    let existing = reload_user(db, user_id).await?;
    let mut active: user::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(name) = changes.name {
        active.name = Set(name);
        updated_fields.push("name");
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
        updated_fields.push("email");
    }
    if let Some(password) = changes.password {
        active.password_digest = Set(hash_secret(&password)?);
        updated_fields.push("password");
    }

    let updated = active.update(db).await.map_err(IdentityError::from_write)?;
    info!(
        "User with ID {} updated successfully. Updated fields: {}",
        user_id,
        if updated_fields.is_empty() {
            "none".to_string()
        } else {
            updated_fields.join(", ")
        }
    );
    Ok(updated)
}

/// Deletes the user and every micropost it owns in one transaction.
#[instrument(skip(db))]
pub async fn destroy_user(db: &DatabaseConnection, user_id: i32) -> Result<DestroyedUser> {
    trace!("Entering destroy_user function for user_id: {}", user_id);

    let txn = db.begin().await?;

    let microposts_removed = micropost::Entity::delete_many()
        .filter(micropost::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?
        .rows_affected;

    let deleted = user::Entity::delete_by_id(user_id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        txn.rollback().await?;
        warn!("User with ID {} not found for deletion", user_id);
        return Err(IdentityError::NotFound(format!("User {}", user_id)));
    }

    txn.commit().await?;
    info!(
        "User with ID {} deleted together with {} microposts",
        user_id, microposts_removed
    );

    Ok(DestroyedUser {
        user_id,
        microposts_removed,
    })
}

/// Looks the user up by email and checks the password. Unknown email and
/// wrong password are indistinguishable to the caller.
#[instrument(skip(db, email, password))]
pub async fn authenticate_credentials(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<Option<user::Model>> {
    let Some(user) = find_by_email(db, email).await? else {
        debug!("Authentication attempt for unknown email");
        return Ok(None);
    };

    if auth::authenticate(&user, password) {
        debug!("User {} authenticated", user.id);
        Ok(Some(user))
    } else {
        debug!("Wrong password for user {}", user.id);
        Ok(None)
    }
}

/// Stores the digest of a fresh remember token and returns the raw token.
#[instrument(skip(db, user), fields(user_id = user.id))]
pub async fn remember(db: &DatabaseConnection, user: user::Model) -> Result<(user::Model, String)> {
    let token = new_token();
    let mut active: user::ActiveModel = user.into();
    active.remember_digest = Set(Some(hash_secret(&token)?));
    let user = active.update(db).await?;
    debug!("Remember digest stored");
    Ok((user, token))
}

/// Clears the remember digest so outstanding remember tokens stop working.
#[instrument(skip(db, user), fields(user_id = user.id))]
pub async fn forget(db: &DatabaseConnection, user: user::Model) -> Result<user::Model> {
    let mut active: user::ActiveModel = user.into();
    active.remember_digest = Set(None);
    Ok(active.update(db).await?)
}

/// Activates the account when `token` matches its activation digest.
#[instrument(skip(db, email, token))]
pub async fn activate(db: &DatabaseConnection, email: &str, token: &str) -> Result<user::Model> {
    let Some(user) = find_by_email(db, email).await? else {
        return Err(IdentityError::InvalidToken);
    };
    if user.activated || !auth::authenticated(&user, DigestKind::Activation, token) {
        warn!("Rejected activation attempt for user {}", user.id);
        return Err(IdentityError::InvalidToken);
    }

    let mut active: user::ActiveModel = user.into();
    active.activated = Set(true);
    active.activated_at = Set(Some(Utc::now()));
    let user = active.update(db).await?;
    info!("User {} activated", user.id);
    Ok(user)
}

/// Issues a password reset token for the user owning `email`.
#[instrument(skip(db, email))]
pub async fn create_reset_digest(
    db: &DatabaseConnection,
    email: &str,
) -> Result<(user::Model, String)> {
    let user = find_by_email(db, email)
        .await?
        .ok_or_else(|| IdentityError::NotFound("User with that email".to_string()))?;

    let token = new_token();
    let mut active: user::ActiveModel = user.into();
    active.reset_digest = Set(Some(hash_secret(&token)?));
    active.reset_sent_at = Set(Some(Utc::now()));
    let user = active.update(db).await?;
    info!("Password reset issued for user {}", user.id);
    Ok((user, token))
}

/// Replaces the password of the user owning `email` if `token` is a live
/// reset token. The reset digest is consumed on success.
#[instrument(skip(db, email, token, password, password_confirmation))]
pub async fn reset_password(
    db: &DatabaseConnection,
    email: &str,
    token: &str,
    password: &str,
    password_confirmation: Option<&str>,
) -> Result<user::Model> {
    let Some(user) = find_by_email(db, email).await? else {
        return Err(IdentityError::InvalidToken);
    };
    if !auth::authenticated(&user, DigestKind::Reset, token) {
        warn!("Rejected password reset token for user {}", user.id);
        return Err(IdentityError::InvalidToken);
    }
    if auth::password_reset_expired(&user, Utc::now()) {
        warn!("Expired password reset token for user {}", user.id);
        return Err(IdentityError::TokenExpired);
    }

    let mut errors = ValidationErrors::new();
    validation::check_password(&mut errors, password, password_confirmation);
    if !errors.is_empty() {
        return Err(IdentityError::Validation(errors));
    }

    let mut active: user::ActiveModel = user.into();
    active.password_digest = Set(hash_secret(password)?);
    active.reset_digest = Set(None);
    active.reset_sent_at = Set(None);
    let user = active.update(db).await?;
    info!("Password reset completed for user {}", user.id);
    Ok(user)
}

use crate::error::{IdentityError, Result};
use crate::users::reload_user;
use crate::validation::NewMicropost;
use model::entities::micropost;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Validates and stores a micropost for an existing user.
#[instrument(skip(db, post))]
pub async fn create_micropost(
    db: &DatabaseConnection,
    user_id: i32,
    post: NewMicropost,
) -> Result<micropost::Model> {
    post.validate()?;
    reload_user(db, user_id).await?;

    let created = micropost::ActiveModel {
        content: Set(post.content),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Micropost {} created for user {}", created.id, user_id);
    Ok(created)
}

/// A user's microposts, newest first. `page` is 1-based.
#[instrument(skip(db))]
pub async fn feed(
    db: &DatabaseConnection,
    user_id: i32,
    page: u64,
    limit: u64,
) -> Result<Vec<micropost::Model>> {
    reload_user(db, user_id).await?;

    let posts = micropost::Entity::find()
        .filter(micropost::Column::UserId.eq(user_id))
        .order_by_desc(micropost::Column::CreatedAt)
        .order_by_desc(micropost::Column::Id)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await?;

    debug!("Retrieved {} microposts for user {}", posts.len(), user_id);
    Ok(posts)
}

#[instrument(skip(db))]
pub async fn delete_micropost(db: &DatabaseConnection, micropost_id: i32) -> Result<()> {
    let result = micropost::Entity::delete_by_id(micropost_id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("Micropost with ID {} not found for deletion", micropost_id);
        return Err(IdentityError::NotFound(format!("Micropost {}", micropost_id)));
    }
    info!("Micropost with ID {} deleted", micropost_id);
    Ok(())
}

/// Total number of microposts across all users.
pub async fn count_microposts(db: &DatabaseConnection) -> Result<u64> {
    Ok(micropost::Entity::find().count(db).await?)
}

pub async fn count_for_user(db: &DatabaseConnection, user_id: i32) -> Result<u64> {
    Ok(micropost::Entity::find()
        .filter(micropost::Column::UserId.eq(user_id))
        .count(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{example_user, setup_db};
    use crate::users::create_user;

    fn post(content: &str) -> NewMicropost {
        NewMicropost {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_micropost_for_existing_user() {
        let db = setup_db().await;
        let author = create_user(&db, example_user()).await.unwrap().user;

        let created = create_micropost(&db, author.id, post("Lorem ipsum")).await.unwrap();

        assert_eq!(created.user_id, author.id);
        assert_eq!(created.content, "Lorem ipsum");
        assert_eq!(count_microposts(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_micropost_is_rejected() {
        let db = setup_db().await;
        let author = create_user(&db, example_user()).await.unwrap().user;

        let blank = create_micropost(&db, author.id, post("   ")).await;
        assert!(matches!(blank, Err(IdentityError::Validation(_))));

        let long = create_micropost(&db, author.id, post(&"a".repeat(141))).await;
        assert!(matches!(long, Err(IdentityError::Validation(_))));

        assert_eq!(count_microposts(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_micropost_requires_existing_user() {
        let db = setup_db().await;
        let result = create_micropost(&db, 404, post("Orphan")).await;
        assert!(matches!(result, Err(IdentityError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_feed_is_newest_first() {
        let db = setup_db().await;
        let author = create_user(&db, example_user()).await.unwrap().user;

        for content in ["first", "second", "third"] {
            create_micropost(&db, author.id, post(content)).await.unwrap();
        }

        let posts = feed(&db, author.id, 1, 10).await.unwrap();
        let contents: Vec<&str> = posts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["third", "second", "first"]);

        let page = feed(&db, author.id, 2, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].content, "first");
    }

    #[tokio::test]
    async fn test_delete_micropost() {
        let db = setup_db().await;
        let author = create_user(&db, example_user()).await.unwrap().user;
        let created = create_micropost(&db, author.id, post("Short lived")).await.unwrap();

        delete_micropost(&db, created.id).await.unwrap();
        assert_eq!(count_for_user(&db, author.id).await.unwrap(), 0);

        let again = delete_micropost(&db, created.id).await;
        assert!(matches!(again, Err(IdentityError::NotFound(_))));
    }
}

//! This file serves as the root for all SeaORM entity modules.
//! The microblog keeps two tables: users and the microposts they author.

pub mod micropost;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::micropost::Entity as Micropost;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    fn new_user(name: &str, email: &str) -> user::ActiveModel {
        user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_digest: Set("$argon2id$not-a-real-digest".to_string()),
            admin: Set(false),
            activated: Set(false),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_email_is_downcased_on_insert_and_update() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let inserted = new_user("Example User", "Foo@ExAMPle.CoM").insert(&db).await?;
        assert_eq!(inserted.email, "foo@example.com");

        let mut active: user::ActiveModel = inserted.into();
        active.email = Set("MiXeD@Example.ORG".to_string());
        let updated = active.update(&db).await?;
        assert_eq!(updated.email, "mixed@example.org");

        let reloaded = User::find_by_id(updated.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.email, "mixed@example.org");

        Ok(())
    }

    #[tokio::test]
    async fn test_timestamps_are_maintained() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let inserted = new_user("Stamped", "stamped@example.com").insert(&db).await?;
        assert!(inserted.updated_at >= inserted.created_at);

        let created_at = inserted.created_at;
        let mut active: user::ActiveModel = inserted.into();
        active.name = Set("Restamped".to_string());
        let updated = active.update(&db).await?;

        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at >= created_at);

        Ok(())
    }

    #[tokio::test]
    async fn test_unique_email_index_rejects_case_variants() -> Result<(), DbErr> {
        let db = setup_db().await?;

        new_user("First", "dup@example.com").insert(&db).await?;
        let duplicate = new_user("Second", "DUP@EXAMPLE.COM").insert(&db).await;

        assert!(duplicate.is_err());
        assert_eq!(User::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_key_cascades_microposts() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let author = new_user("Author", "author@example.com").insert(&db).await?;
        let other = new_user("Other", "other@example.com").insert(&db).await?;

        for content in ["Lorem ipsum", "Dolor sit amet"] {
            micropost::ActiveModel {
                content: Set(content.to_string()),
                user_id: Set(author.id),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }
        micropost::ActiveModel {
            content: Set("Untouched".to_string()),
            user_id: Set(other.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let authored = author.find_related(Micropost).all(&db).await?;
        assert_eq!(authored.len(), 2);

        User::delete_by_id(author.id).exec(&db).await?;

        let remaining = Micropost::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].content, "Untouched");

        let orphans = Micropost::find()
            .filter(micropost::Column::UserId.eq(author.id))
            .count(&db)
            .await?;
        assert_eq!(orphans, 0);

        Ok(())
    }
}

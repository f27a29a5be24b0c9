use sea_orm::ActiveValue;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// A registered user of the microblog.
///
/// Secrets are never stored in clear text: every `*_digest` column holds an
/// Argon2 PHC string produced by the identity layer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Always stored lower-case, see [`normalize_email`].
    #[sea_orm(unique)]
    pub email: String,
    pub password_digest: String,
    /// Digest of the persistent-login token, if the user asked to be remembered.
    pub remember_digest: Option<String>,
    #[sea_orm(default_value = "false")]
    pub admin: bool,
    pub activation_digest: Option<String>,
    #[sea_orm(default_value = "false")]
    pub activated: bool,
    pub activated_at: Option<DateTimeUtc>,
    pub reset_digest: Option<String>,
    pub reset_sent_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user authors many microposts; they are removed together with the user.
    #[sea_orm(has_many = "super::micropost::Entity")]
    Micropost,
}

impl Related<super::micropost::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Micropost.def()
    }
}

/// Canonical form of an email address as it is persisted and looked up.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        // Downcase on every write, whatever path produced the value.
        if let ActiveValue::Set(email) = &self.email {
            let normalized = normalize_email(email);
            tracing::trace!("Normalizing email before save");
            self.email = Set(normalized);
        }

        let now = chrono::Utc::now();
        if insert && !matches!(self.created_at, ActiveValue::Set(_)) {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);

        Ok(self)
    }
}

use clap::ValueEnum;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    User,
    Admin,
    Blocked,
}

impl From<Role> for foodgram_user::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::User => foodgram_user::Role::User,
            Role::Admin => foodgram_user::Role::Admin,
            Role::Blocked => foodgram_user::Role::Blocked,
        }
    }
}

pub async fn set_role(
    config: crate::config::Config,
    email: String,
    role: Role,
) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    let db = foodgram_shared::State {
        read_db: pool.clone(),
        write_db: pool,
    };
    let command = foodgram_user::Command::new(db);

    if command.set_role(&email, role.into()).await?.is_none() {
        tracing::error!("user {email} not found");
    }

    Ok(())
}

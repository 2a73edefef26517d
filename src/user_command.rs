use std::io::Write;

use anyhow::{bail, Context, Result};
use log::info;
use uuid::Uuid;

use crate::repository::StoreRepository;
use crate::store::Database;

/// アカウント管理を行うサブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct UserArgs {
    #[clap(subcommand)]
    action: UserAction,
}

/// アカウント管理の操作を表す列挙型。
#[derive(Debug, clap::Subcommand)]
pub enum UserAction {
    /// Invite a new user (admin only)
    Add(AddArgs),
    /// Activate an invited user with its activation token
    Activate(ActivateArgs),
    /// List all users (admin only)
    List,
    /// Rename a user (admin only)
    Rename(RenameArgs),
    /// Remove a user and all owned entries (admin only)
    Remove(RemoveArgs),
}

#[derive(Debug, clap::Args)]
pub struct AddArgs {
    #[clap(help = "Username of the new user")]
    username: String,

    #[clap(long = "greeting", help = "Greeting shown to the user", default_value = "")]
    greeting: String,

    #[clap(long = "admin", help = "Grants administrator rights")]
    admin: bool,
}

#[derive(Debug, clap::Args)]
pub struct ActivateArgs {
    #[clap(help = "Activation token issued at invitation")]
    token: Uuid,

    #[clap(help = "Credential for the new user")]
    password: String,
}

#[derive(Debug, clap::Args)]
pub struct RenameArgs {
    #[clap(help = "Current username")]
    username: String,

    #[clap(help = "New username")]
    new_username: String,
}

#[derive(Debug, clap::Args)]
pub struct RemoveArgs {
    #[clap(help = "Username of the user to remove")]
    username: String,
}

pub struct UserCommand<'a, T: StoreRepository> {
    repository: &'a T,
}

impl<'a, T: StoreRepository> UserCommand<'a, T> {
    /// 新しい`UserCommand`を返す。
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `user`サブコマンドの処理を行う。
    ///
    /// 招待、有効化、一覧、名前の変更、削除を行う。有効化以外の操作は管理者のみが行える。
    ///
    /// # Arguments
    ///
    /// * `acting` - 操作を行う利用者の利用者名
    /// * `user` - `user`サブコマンドの引数
    /// * `writer` - 表示の出力先
    pub async fn run<W: Write>(
        &self,
        acting: Option<&str>,
        user: UserArgs,
        writer: &mut W,
    ) -> Result<()> {
        let mut database = self
            .repository
            .load()
            .await
            .context("Failed to load store")?;

        match user.action {
            UserAction::Add(add) => {
                ensure_admin(&database, acting)?;
                // 最初の利用者は常に管理者として作る
                let is_admin = add.admin || database.users.is_empty();
                let invited = database.invite_user(&add.username, &add.greeting, is_admin)?;
                self.save(&database).await?;
                info!("Invited user: {}", invited.username);
                writeln!(
                    writer,
                    "Invited user: {} (activation token: {})",
                    invited.username,
                    invited
                        .activation_token
                        .context("Invited user has no activation token")?
                )
                .context("Failed to write user output")?;
            }
            UserAction::Activate(activate) => {
                let activated = database.activate_user(activate.token, &activate.password)?;
                self.save(&database).await?;
                info!("Activated user: {}", activated.username);
                writeln!(writer, "Activated user: {}", activated.username)
                    .context("Failed to write user output")?;
            }
            UserAction::List => {
                ensure_admin(&database, acting)?;
                let mut users = database.users.clone();
                users.sort_by(|a, b| a.username.cmp(&b.username));
                for user in users {
                    let mut marks = String::new();
                    if user.is_admin {
                        marks.push_str(" (admin)");
                    }
                    if !user.is_activated() {
                        marks.push_str(" (pending)");
                    }
                    writeln!(writer, "- {}{}", user.username, marks)
                        .context("Failed to write user output")?;
                }
            }
            UserAction::Rename(rename) => {
                ensure_admin(&database, acting)?;
                let user = database.find_user(&rename.username)?;
                let renamed = database.rename_user(user.id, &rename.new_username)?;
                self.save(&database).await?;
                info!("Renamed user: {} -> {}", rename.username, renamed.username);
                writeln!(
                    writer,
                    "Renamed user: {} -> {}",
                    rename.username, renamed.username
                )
                .context("Failed to write user output")?;
            }
            UserAction::Remove(remove) => {
                ensure_admin(&database, acting)?;
                let user = database.find_user(&remove.username)?;
                database.remove_user(user.id)?;
                self.save(&database).await?;
                info!("Removed user: {}", remove.username);
                writeln!(writer, "Removed user: {}", remove.username)
                    .context("Failed to write user output")?;
            }
        }

        Ok(())
    }

    async fn save(&self, database: &Database) -> Result<()> {
        self.repository
            .save(database)
            .await
            .context("Failed to save store")
    }
}

/// 操作する利用者が管理者であることを確認する。
///
/// 利用者がまだ1人もいない場合は検査を行わない。
fn ensure_admin(database: &Database, acting: Option<&str>) -> Result<()> {
    if database.users.is_empty() {
        return Ok(());
    }

    let username = acting.context("--user is required for this command")?;
    let user = database.find_user(username)?;
    if !user.is_admin {
        bail!("user is not an administrator: {}", username);
    }

    Ok(())
}

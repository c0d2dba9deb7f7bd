//! Administrative commands run against the PostgreSQL store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;
use zeroize::Zeroizing;

use quill::domain::ports::{AccountService, GroupRepository, PostRepository, SignupOutcome};
use quill::domain::{NewGroup, PasswordAccountService, PostId, SignupSubmission};
use quill::outbound::persistence::{
    DbPool, DieselGroupRepository, DieselPostRepository, DieselUserRepository, PoolConfig,
    run_pending_migrations_async,
};
use quill::outbound::security::Argon2PasswordHasher;

/// `quill-admin` command arguments.
#[derive(Debug, Parser)]
#[command(name = "quill-admin", about = "Administer a Quill database", version)]
struct CliArgs {
    /// Database connection URL. Falls back to `QUILL_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Create a group posts can be filed under.
    CreateGroup {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Create an account.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Delete a post and its comments.
    DeletePost {
        #[arg(long)]
        id: i64,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

fn resolve_database_url(flag: Option<String>) -> Result<String> {
    flag.or_else(|| env::var("QUILL_DATABASE_URL").ok())
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or_else(|| eyre!("no database URL: pass --database-url or set QUILL_DATABASE_URL"))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url)?;
    if let Command::Migrate = args.command {
        let applied = run_pending_migrations_async(database_url)
            .await
            .wrap_err("apply migrations")?;
        println!("{} migration(s) applied", applied.len());
        return Ok(());
    }

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("create database pool")?;
    match args.command {
        Command::Migrate => Ok(()),
        Command::CreateGroup {
            title,
            slug,
            description,
        } => {
            let group = NewGroup::try_from_parts(&title, &slug, &description)
                .wrap_err("invalid group")?;
            let created = DieselGroupRepository::new(pool)
                .create(&group)
                .await
                .wrap_err("create group")?;
            println!("created group {} ({})", created.slug(), created.id());
            Ok(())
        }
        Command::CreateUser { username, password } => {
            let accounts = PasswordAccountService::new(
                Arc::new(DieselUserRepository::new(pool)),
                Arc::new(Argon2PasswordHasher::new()),
            );
            let password = Zeroizing::new(password);
            let submission = SignupSubmission {
                username,
                password1: password.clone(),
                password2: password,
            };
            match accounts.register(submission).await? {
                SignupOutcome::Registered(user) => {
                    println!("created user {} ({})", user.username(), user.id());
                    Ok(())
                }
                SignupOutcome::Invalid(form) => {
                    let problems: Vec<String> = form
                        .errors
                        .iter()
                        .flat_map(|(field, messages)| {
                            messages.iter().map(move |message| format!("{field}: {message}"))
                        })
                        .collect();
                    Err(eyre!("invalid user: {}", problems.join("; ")))
                }
            }
        }
        Command::DeletePost { id } => {
            let deleted = DieselPostRepository::new(pool)
                .delete(PostId::new(id))
                .await
                .wrap_err("delete post")?;
            if deleted {
                println!("deleted post {id}");
                Ok(())
            } else {
                Err(eyre!("no post with id {id}"))
            }
        }
    }
}

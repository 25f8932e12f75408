use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use servio_application::AccountUseCase;
use servio_core::account::{ClientRegistrationForm, LoginForm, WorkerRegistrationForm};
use servio_core::error::ServioError;
use servio_core::field_errors::NON_FIELD_ERRORS;
use servio_interaction::HttpBackend;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ClientArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
    /// Accept the terms and conditions
    #[arg(long)]
    pub accept_terms: bool,
}

impl From<ClientArgs> for ClientRegistrationForm {
    fn from(args: ClientArgs) -> Self {
        Self {
            username: args.username,
            email: args.email,
            first_name: args.first_name,
            last_name: args.last_name,
            phone_number: args.phone,
            password: args.password,
            confirm_password: args.confirm_password,
            accept_terms: args.accept_terms,
        }
    }
}

#[derive(Args, Debug)]
pub struct WorkerArgs {
    #[command(flatten)]
    pub account: ClientArgs,
    /// Category id you work in (see `servio categories`)
    #[arg(long)]
    pub category: Option<u64>,
    #[arg(long, default_value_t = 0)]
    pub years_of_experience: u32,
    #[arg(long, default_value = "")]
    pub bio: String,
    /// Repeat for each skill
    #[arg(long = "skill")]
    pub skills: Vec<String>,
}

impl From<WorkerArgs> for WorkerRegistrationForm {
    fn from(args: WorkerArgs) -> Self {
        Self {
            account: args.account.into(),
            category_id: args.category,
            years_of_experience: args.years_of_experience,
            bio: args.bio,
            skills: args.skills,
        }
    }
}

pub async fn login(backend: Arc<HttpBackend>, email: String, password: String) -> Result<()> {
    let usecase = AccountUseCase::new(backend);
    let session = usecase
        .login(&LoginForm { email, password })
        .await
        .or_else(report)?;

    let who = session.username.as_deref().unwrap_or("you");
    println!("{} Signed in as {}", "✓".green(), who.bold());
    println!("Token: {}", session.token);
    Ok(())
}

pub async fn register_client(backend: Arc<HttpBackend>, args: ClientArgs) -> Result<()> {
    let usecase = AccountUseCase::new(backend);
    usecase
        .register_client(&args.into())
        .await
        .or_else(report)?;

    println!("{} Account created. You can now sign in.", "✓".green());
    Ok(())
}

pub async fn register_worker(backend: Arc<HttpBackend>, args: WorkerArgs) -> Result<()> {
    let usecase = AccountUseCase::new(backend);
    usecase
        .register_worker(&args.into())
        .await
        .or_else(report)?;

    println!(
        "{} Serviceman account created. You can now sign in.",
        "✓".green()
    );
    Ok(())
}

pub async fn reset_password(backend: Arc<HttpBackend>, email: String) -> Result<()> {
    let usecase = AccountUseCase::new(backend);
    usecase
        .request_password_reset(&email)
        .await
        .or_else(report)?;

    println!(
        "{} If an account exists for {}, a reset link is on its way.",
        "✓".green(),
        email.trim()
    );
    Ok(())
}

/// Prints field errors next to their field names, then fails with the
/// summary message.
fn report<T>(err: ServioError) -> Result<T> {
    if let Some(errors) = err.field_errors() {
        for (field, messages) in errors.iter() {
            for message in messages {
                if field == NON_FIELD_ERRORS {
                    eprintln!("  {}", message.red());
                } else {
                    eprintln!("  {}: {}", field.bold(), message.red());
                }
            }
        }
    }
    bail!(err.user_message())
}

//! Account commands: sign in, sign out, and password reset.
//!
//! # Usage
//!
//! ```bash
//! hw-cli login -e ana@farm.example --print-token
//! hw-cli forgot-password -e ana@farm.example
//! hw-cli reset-password -e ana@farm.example --token <token from the email>
//! ```

use homeoware_admin::auth::{self, ResetLink};
use homeoware_core::Validate;
use homeoware_core::validation::{ForgotPasswordInput, LoginInput, ResetPasswordInput};

use super::{CommandError, Context, emit, read_line};

fn required_line(prompt: &str) -> Result<String, CommandError> {
    read_line(prompt)?.ok_or_else(|| {
        CommandError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "no input",
        ))
    })
}

/// Sign in; with `print_token`, write the bearer token to stdout.
pub async fn login(
    ctx: &Context,
    email: &str,
    password: Option<String>,
    print_token: bool,
) -> Result<(), CommandError> {
    let password = match password {
        Some(password) => password,
        None => required_line("Password: ")?,
    };
    let draft = LoginInput {
        email: email.to_string(),
        password,
    }
    .validate()
    .map_err(CommandError::Invalid)?;

    let user = auth::login(&ctx.api, &draft).await?;
    match user {
        Some(user) => tracing::info!("Signed in as {} <{}>", user.name, user.email),
        None => tracing::info!("Signed in as {}", draft.email),
    }

    if print_token
        && let Some(header) = ctx.api.session().authorization().await
    {
        let token = header.split_once(' ').map_or(header.as_str(), |(_, token)| token);
        emit(token);
    }
    Ok(())
}

/// Drop the session held by this invocation.
pub async fn logout(ctx: &Context) {
    auth::logout(ctx.api.session()).await;
    tracing::info!("Signed out. Unset HW_TOKEN to stay signed out.");
}

pub async fn forgot_password(ctx: &Context, email: &str) -> Result<(), CommandError> {
    let draft = ForgotPasswordInput {
        email: email.to_string(),
    }
    .validate()
    .map_err(CommandError::Invalid)?;

    auth::request_password_reset(&ctx.api, &draft).await?;
    tracing::info!("Reset link sent to {}", draft.email);
    Ok(())
}

/// Check the link, ask for the new password twice, and submit it.
pub async fn reset_password(ctx: &Context, email: &str, token: &str) -> Result<(), CommandError> {
    let link = ResetLink::parse(email, token)?;

    let draft = ResetPasswordInput {
        password: required_line("New password: ")?,
        password_confirmation: required_line("Confirm password: ")?,
    }
    .validate()
    .map_err(CommandError::Invalid)?;

    auth::reset_password(&ctx.api, &draft, &link).await?;
    tracing::info!("Password changed. Sign in with the new password.");
    Ok(())
}

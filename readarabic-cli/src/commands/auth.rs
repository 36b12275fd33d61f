//! Sign-in and session commands
use crate::context::AppContext;
use crate::output;
use anyhow::{anyhow, bail, Context, Result};
use readarabic_core::api::AuthApi;
use readarabic_core::models::User;

pub async fn login(
    ctx: &AppContext,
    credential: Option<&str>,
    code: Option<&str>,
    redirect_uri: Option<&str>,
) -> Result<()> {
    let api = ctx.api()?;
    let user = match (credential, code) {
        (Some(credential), _) => api
            .google_credential(credential)
            .await
            .context("Google sign-in failed")?,
        (None, Some(code)) => {
            let redirect_uri = redirect_uri
                .map(str::to_string)
                .or_else(|| ctx.config.google.redirect_uri.clone())
                .ok_or_else(|| {
                    anyhow!("No redirect URI; pass --redirect-uri or set google.redirect_uri")
                })?;
            api.google_callback(code, &redirect_uri)
                .await
                .context("Google sign-in failed")?
        }
        (None, None) => bail!("Pass either --credential or --code"),
    };

    ctx.local.save_user(&user).context("Failed to save session")?;
    println!("✅ Signed in as {}", display_name(&user));
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    if ctx.local.clear_user().context("Failed to remove session")? {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

pub fn whoami(ctx: &AppContext, json: bool) -> Result<()> {
    let user = ctx.user()?;
    if json {
        return output::print_json("auth.user", user);
    }
    match user {
        Some(user) => println!("{} (id {})", display_name(&user), user.id),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn display_name(user: &User) -> &str {
    user.name
        .as_deref()
        .or(user.email.as_deref())
        .unwrap_or(user.id.as_str())
}

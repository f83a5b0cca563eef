use serde::Serialize;
use tracing::info;
use xplens_core::{Credentials, DefaultPipeline, PipelineError, ProfileView};
use xplens_utils::formatting::format_xp;
use xplens_utils::token;

use crate::cli::Commands;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionStatus<'a> {
    authenticated: bool,
    backend: &'a str,
    token: Option<String>,
}

pub async fn dispatch(
    pipeline: &DefaultPipeline,
    command: Commands,
    json: bool,
) -> Result<(), PipelineError> {
    match command {
        Commands::Login {
            username,
            password,
            no_fetch,
        } => {
            let credentials = Credentials::new(username, password);
            if no_fetch {
                let session = pipeline.login(&credentials).await?;
                print_session(pipeline, Some(&session), json);
                return Ok(());
            }

            let dataset = pipeline.run(&credentials).await?;
            print_profile(&ProfileView::from_dataset(&dataset), json);
        }
        Commands::Profile => {
            let dataset = pipeline.run_stored().await?;
            print_profile(&ProfileView::from_dataset(&dataset), json);
        }
        Commands::CheckToken => {
            let session = pipeline.resume().await?;
            print_session(pipeline, Some(&session), json);
        }
        Commands::Logout => {
            pipeline.logout().await?;
            print_session(pipeline, None, json);
        }
    }

    Ok(())
}

fn print_session(pipeline: &DefaultPipeline, session: Option<&str>, json: bool) {
    let status = SessionStatus {
        authenticated: session.is_some(),
        backend: pipeline.store().backend_name(),
        token: session.map(token::redact),
    };

    if json {
        print_json(&status);
        return;
    }

    match &status.token {
        Some(redacted) => println!("Signed in ({} store): {redacted}", status.backend),
        None => println!("Signed out ({} store).", status.backend),
    }
}

fn print_profile(view: &ProfileView, json: bool) {
    if json {
        print_json(view);
        return;
    }

    let card = &view.card;
    println!("{} {} <{}>", card.first_name, card.last_name, card.email);
    println!("XP earned:    {}", format_xp(card.xp_earned));
    println!("Audit ratio:  {}", card.audit_ratio);
    println!(
        "Audits:       {} up / {} down",
        format_xp(view.totals.gained),
        format_xp(view.totals.lost)
    );

    for (label, value) in view.breakdown.labels.iter().zip(view.breakdown.values) {
        println!("{label:<13} {value}");
    }

    info!(points = view.history.len(), "XP history ready");
    for point in &view.history {
        println!("  {}  {:>10}", point.date, format_xp(point.xp));
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => tracing::error!(?err, "failed to serialize output"),
    }
}

//! CLI command execution.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::api::{HttpPracticeApi, PracticeApi};
use crate::config::AppConfig;
use crate::dialog::{DialogKind, SessionDialog};
use crate::draft::SessionDraft;
use crate::submit::SubmitError;

use super::args::{Cli, Commands};
use super::plan::DraftPlan;

/// Run the parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Commands::Clients => list_clients(&config).await,
        Commands::Context { client_id } => show_context(&config, client_id).await,
        Commands::Sessions => list_sessions(&config).await,
        Commands::Submit { plan, dry_run } => submit_plan(&config, &plan, dry_run).await,
    }
}

fn connect(config: &AppConfig) -> Result<HttpPracticeApi> {
    HttpPracticeApi::new(&config.api)
        .with_context(|| format!("Failed to set up client for {}", config.api.base_url))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

async fn list_clients(config: &AppConfig) -> Result<()> {
    let api = connect(config)?;
    let clients = api.list_clients().await?;
    if clients.is_empty() {
        println!("No clients found.");
        return Ok(());
    }

    println!("{:<8} {:<40}", "ID", "NAME");
    println!("{}", "-".repeat(48));
    for client in clients {
        println!("{:<8} {:<40}", client.id, truncate(&client.name, 38));
    }
    Ok(())
}

async fn list_sessions(config: &AppConfig) -> Result<()> {
    let api = connect(config)?;
    let sessions = api.list_sessions().await?;
    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!(
        "{:<10} {:<8} {:<18} {:<6} {:<12} {:<30}",
        "ID", "CLIENT", "DATE", "MIN", "STATUS", "TITLE"
    );
    println!("{}", "-".repeat(88));
    for session in sessions {
        let date = session
            .session_date
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{:<10} {:<8} {:<18} {:<6} {:<12} {:<30}",
            session.id.to_string(),
            session.client_id,
            date,
            session.duration,
            session.status.as_str(),
            truncate(&session.title, 28),
        );
    }
    Ok(())
}

async fn show_context(config: &AppConfig, client_id: i64) -> Result<()> {
    let api = connect(config)?;
    let mut dialog = SessionDialog::open(api, config, Some(client_id));

    let goals = dialog.goal_options().await;
    println!("Goals:");
    if goals.is_empty() {
        println!("  {}", DialogKind::Goal.empty_state());
    }
    for goal in &goals {
        println!("  {:<8} {}", goal.id, goal.title);
        for milestone in dialog.milestones_of(goal.id).await {
            println!("    {:<6} {}", milestone.id, milestone.title);
        }
    }

    println!("Allies:");
    let allies = dialog.attendee_options().await;
    if allies.is_empty() {
        println!("  {}", DialogKind::Attendee.empty_state());
    }
    for ally in allies {
        println!("  {:<8} {} ({})", ally.id, ally.name, ally.relationship);
    }

    println!("Products:");
    let products = dialog.product_options().await;
    if products.is_empty() {
        println!("  {}", DialogKind::Product.empty_state());
    }
    for item in products {
        println!(
            "  {:<8} {:<16} {:>6} @ {:>8.2}  {}",
            item.id, item.item_code, item.quantity, item.unit_price, item.description
        );
    }

    println!("Strategies:");
    for strategy in dialog.strategy_catalogue().await {
        println!("  {:<20} {}", strategy.name, strategy.category);
    }
    Ok(())
}

async fn submit_plan(config: &AppConfig, path: &Path, dry_run: bool) -> Result<()> {
    let plan = DraftPlan::load(path)?;
    let api = connect(config)?;
    let mut dialog = SessionDialog::open(api, config, Some(plan.client_id));
    plan.apply(&mut dialog).await?;

    print_draft(dialog.draft());

    if let Err(issues) = dialog.draft().validate() {
        for issue in &issues {
            eprintln!("  - {issue}");
        }
        bail!("Draft has {} problem(s); nothing was submitted", issues.len());
    }

    if dry_run {
        println!("Dry run: nothing submitted.");
        return Ok(());
    }

    match dialog.submit().await {
        Ok(receipt) => {
            println!("Session: {}", receipt.session_id);
            println!("Note: {}", receipt.note_id);
            for id in receipt.assessment_ids {
                println!("Assessment: {id}");
            }
            Ok(())
        }
        Err(e) => {
            report_partial(&e);
            Err(e.into())
        }
    }
}

fn report_partial(err: &SubmitError) {
    let created = err.created_ids();
    if !created.is_empty() {
        let ids: Vec<_> = created.iter().map(ToString::to_string).collect();
        eprintln!("Already created on the server: {}", ids.join(", "));
    }
    if let SubmitError::Assessments { failures, .. } = err {
        for failure in failures {
            eprintln!("  goal {}: {}", failure.goal_id, failure.error);
        }
    }
}

fn print_draft(draft: &SessionDraft) {
    let session = &draft.session;
    println!("Draft {}", draft.draft_id());
    println!(
        "  client {} | {} | {} min | {}",
        session
            .client_id
            .map_or_else(|| "-".to_string(), |id| id.to_string()),
        session
            .session_date_time
            .map_or_else(|| "-".to_string(), |d| d.to_rfc3339()),
        session.duration_minutes,
        session.status,
    );
    if !session.title.is_empty() {
        println!("  {}", session.title);
    }

    let attendees = draft.note.attendees();
    if !attendees.is_empty() {
        println!("  present: {}", attendees.names().join(", "));
    }

    for line in draft.note.products() {
        println!(
            "  product {} x{} = {:.2}",
            line.product_code(),
            line.quantity(),
            line.line_total()
        );
    }
    if !draft.note.products().is_empty() {
        println!("  products total {:.2}", draft.total_product_value());
    }

    for goal in draft.assessments() {
        println!("  goal {} {}", goal.goal_id(), goal.goal_title());
        for m in goal.milestones() {
            println!(
                "    milestone {} rating {} [{}]",
                m.milestone_id(),
                m.rating(),
                m.strategies().join(", ")
            );
        }
    }
}

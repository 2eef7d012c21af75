//! Movement CLI commands
//!
//! Implements the ledger commands: list, add, delete and balance. Each one
//! loads the ledger, applies at most one change, and renders the result.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clap::Args;

use crate::cli::CliContext;
use crate::display::{
    format_balance, format_monthly_summary, format_movement_list, format_overview, DisplayOptions,
};
use crate::error::{WalletError, WalletResult};
use crate::models::MovementType;
use crate::services::{CreateMovementInput, LedgerService};

/// Arguments for `add`
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Movement type: income or expense
    pub kind: String,
    /// What the money was for
    pub concept: String,
    /// Amount (e.g., "3.50"); always positive, the type gives the sign
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
    /// Movement date (YYYY-MM-DD), defaults to now
    #[arg(short, long)]
    pub date: Option<String>,
    /// Share the movement with a friend (remote mode only)
    #[arg(short, long)]
    pub friend_email: Option<String>,
}

fn parse_date(s: &str) -> WalletResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        WalletError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
    })
}

/// A reference time inside the given month (YYYY-MM)
fn parse_month(s: &str) -> WalletResult<DateTime<Local>> {
    let invalid =
        || WalletError::Validation(format!("Invalid month format: '{}'. Use YYYY-MM", s));

    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| invalid())?;
    let noon = first.and_hms_opt(12, 0, 0).ok_or_else(invalid)?;
    Local.from_local_datetime(&noon).earliest().ok_or_else(invalid)
}

/// Ask a yes/no question on stdin; anything but "y"/"yes" is a no
fn confirm(question: &str) -> WalletResult<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// `list`: the ledger followed by the balance cards
pub fn handle_list(ctx: &CliContext, limit: Option<usize>) -> WalletResult<()> {
    let (session, mut store) = ctx.open_ledger()?;
    let mut service = LedgerService::new(&mut store, &session);
    service.load()?;

    let options = DisplayOptions::from_settings(&ctx.settings);
    print!(
        "{}",
        format_movement_list(service.movements(), &session, &options, limit)
    );
    println!();
    print!("{}", format_overview(&service.overview(&Local::now()), &options));
    Ok(())
}

/// `add`: record a new movement
pub fn handle_add(ctx: &CliContext, args: AddArgs) -> WalletResult<()> {
    let movement_type = args
        .kind
        .parse::<MovementType>()
        .map_err(|e| WalletError::Validation(e.to_string()))?;
    let date = args.date.as_deref().map(parse_date).transpose()?;

    let (session, mut store) = ctx.open_ledger()?;
    if args.friend_email.is_some() && !session.is_authenticated() {
        return Err(WalletError::Validation(
            "Sharing a movement needs a logged-in remote session".into(),
        ));
    }

    let mut service = LedgerService::new(&mut store, &session);
    service.load()?;

    let created = service.create(CreateMovementInput {
        concept: args.concept,
        amount: args.amount,
        movement_type,
        date,
        friend_email: args.friend_email,
    })?;

    let options = DisplayOptions::from_settings(&ctx.settings);
    println!(
        "Added {}: {} {}{} [{}]",
        created.movement_type,
        created.concept,
        created.movement_type.sign(),
        options.money(created.amount),
        created.id.short()
    );
    println!();
    print!("{}", format_overview(&service.overview(&Local::now()), &options));
    Ok(())
}

/// `delete`: remove a movement by id or unique id prefix
pub fn handle_delete(ctx: &CliContext, identifier: &str, force: bool) -> WalletResult<()> {
    let (session, mut store) = ctx.open_ledger()?;
    let mut service = LedgerService::new(&mut store, &session);
    service.load()?;

    let id = match service.resolve(identifier) {
        Some(id) => id,
        None => {
            println!("No single movement matches '{}'; nothing deleted.", identifier);
            return Ok(());
        }
    };

    let options = DisplayOptions::from_settings(&ctx.settings);

    if !force {
        if let Some(mov) = service.movements().iter().find(|m| m.id == id) {
            println!("About to delete movement:");
            println!("  Concept: {}", mov.concept);
            println!(
                "  Amount:  {}{}",
                mov.movement_type.sign(),
                options.money(mov.amount)
            );
            if let Some(date) = mov.date {
                println!("  Date:    {}", date.format(&options.date_format));
            }
        }
        if !confirm("Delete it?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match service.delete(&id)? {
        Some(deleted) => println!("Deleted movement: {} ({})", deleted.concept, deleted.id.short()),
        None => println!("Movement {} was already gone.", id.short()),
    }
    println!();
    print!("{}", format_overview(&service.overview(&Local::now()), &options));
    Ok(())
}

/// `balance`: total balance and the summary for a month (default: current)
pub fn handle_balance(ctx: &CliContext, month: Option<&str>) -> WalletResult<()> {
    let reference = match month {
        Some(m) => parse_month(m)?,
        None => Local::now(),
    };

    let (session, mut store) = ctx.open_ledger()?;
    let mut service = LedgerService::new(&mut store, &session);
    service.load()?;

    let overview = service.overview(&reference);
    let options = DisplayOptions::from_settings(&ctx.settings);
    print!("{}", format_balance(overview.total, &options));
    println!();
    print!("{}", format_monthly_summary(&overview.monthly, &options));
    Ok(())
}

use std::io::BufRead;

use clap::{Args, Parser, Subcommand};
use saved_carts::CartError;
use saved_carts::api::{
    CheckoutApi, HttpCheckoutClient, HttpContext, MasterDataClient, TracingNotifier,
};
use saved_carts::config::fetch_config;
use saved_carts::credentials::{self, CredentialKey, populate_env_from_keychain};
use saved_carts::models::{LiveSession, SnapshotPayload, SnapshotScope};
use saved_carts::restore::{
    PendingFlag, RestoreContext, RestoreFailure, RestoreOutcome, Restorer,
};
use saved_carts::store::SnapshotStore;

#[derive(Parser)]
#[command(name = "saved-carts", about = "List and restore saved B2B carts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List saved carts for an organization and cost center.
    List(ScopeArgs),
    /// Restore a saved cart into an order form.
    Restore {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Order form to restore into.
        #[arg(long)]
        order_form: String,
        /// Id of the saved cart.
        snapshot_id: String,
    },
    /// Save the current contents of an order form as a new cart.
    Save {
        #[command(flatten)]
        scope: ScopeArgs,
        #[arg(long)]
        order_form: String,
        title: String,
    },
    /// Remove every line from an order form.
    Clear {
        #[arg(long)]
        order_form: String,
    },
    /// Pick a payment method on an order form.
    ///
    /// Without `--system`, an invalid or missing selection is replaced by the
    /// first payment system that may be picked by hand.
    Payment {
        #[arg(long)]
        order_form: String,
        #[arg(long)]
        system: Option<String>,
    },
    /// Store app credentials in the system keychain. The token is read from stdin.
    Login {
        #[arg(long)]
        app_key: String,
    },
}

#[derive(Args)]
struct ScopeArgs {
    #[arg(long)]
    org: String,
    #[arg(long)]
    cost_center: String,
    /// List carts saved under this parent cart instead of top-level carts.
    #[arg(long)]
    parent: Option<String>,
}

impl ScopeArgs {
    fn scope(&self) -> Result<SnapshotScope, CartError> {
        SnapshotScope::new(&self.org, &self.cost_center, self.parent.as_deref())
    }
}

fn login(app_key: &str) -> Result<(), CartError> {
    let mut token = zeroize::Zeroizing::new(String::new());
    std::io::stdin()
        .lock()
        .read_line(&mut token)
        .map_err(|e| CartError::Config(format!("failed to read app token: {e}")))?;
    let token = token.trim();
    if token.is_empty() {
        return Err(CartError::Config("app token is empty".to_string()));
    }

    credentials::save(CredentialKey::AppKey, app_key)?;
    credentials::save(CredentialKey::AppToken, token)?;
    for key in CredentialKey::ALL {
        println!(
            "{}: {}",
            key.env_var(),
            if credentials::is_set(key) { "stored" } else { "missing" }
        );
    }
    Ok(())
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

fn print_session(action: &str, session: &LiveSession) {
    println!(
        "{action} {}: {} items, total {}, payment {}",
        session.order_form_id,
        session.items.len(),
        format_cents(session.value),
        session.selected_payment_system().unwrap_or("-"),
    );
}

fn exit_on_failure(result: Result<LiveSession, RestoreFailure>) -> LiveSession {
    match result {
        Ok(session) => session,
        Err(failure) => {
            eprintln!("{} failed: {}", failure.step, failure.message);
            std::process::exit(1);
        }
    }
}

fn main() -> Result<(), CartError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    if let Command::Login { app_key } = &cli.command {
        return login(app_key);
    }

    // Environment writes must happen before the runtime spawns its workers.
    populate_env_from_keychain();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CartError::Config(format!("failed to start runtime: {e}")))?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> Result<(), CartError> {
    let app_config = fetch_config()?;
    let context = HttpContext::from_config(&app_config.vtex)?;
    let store = SnapshotStore::new(MasterDataClient::new(
        context.clone(),
        &app_config.saved_carts_entity,
    ));

    match cli.command {
        Command::List(args) => {
            for snapshot in store.list(&args.scope()?).await? {
                let summary = snapshot.summary();
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    snapshot.id,
                    snapshot.created_at.format("%Y-%m-%d"),
                    snapshot.title,
                    summary.value.map_or_else(|| "-".to_string(), format_cents),
                    summary.item_count,
                    summary.payment_method.as_deref().unwrap_or("-"),
                );
            }
        }
        Command::Restore {
            scope,
            order_form,
            snapshot_id,
        } => {
            let snapshots = store.list(&scope.scope()?).await?;
            let snapshot = SnapshotStore::<MasterDataClient>::find(&snapshots, &snapshot_id)
                .ok_or_else(|| CartError::Retrieval(format!("saved cart {snapshot_id} not found")))?;

            let restorer = Restorer::new(HttpCheckoutClient::new(context), TracingNotifier);
            let report = restorer
                .restore(
                    snapshot,
                    RestoreContext {
                        session: LiveSession::new(&order_form),
                        pending: PendingFlag::new(),
                        picker_open: true,
                    },
                )
                .await;

            match report.outcome {
                RestoreOutcome::Restored(session) => println!(
                    "restored {} into {}: {} items, total {}",
                    report.selected_snapshot,
                    session.order_form_id,
                    session.items.len(),
                    format_cents(session.value),
                ),
                RestoreOutcome::Failed(failure) => {
                    eprintln!("restore stopped at {}: {}", failure.step, failure.message);
                    std::process::exit(1);
                }
            }
        }
        Command::Save {
            scope,
            order_form,
            title,
        } => {
            let scope = scope.scope()?;
            let session = HttpCheckoutClient::new(context)
                .get_order_form(&order_form)
                .await?;
            let payload = SnapshotPayload::from_session(&session);
            let id = store.save(&title, &scope, &payload).await?;
            println!("saved {} items from {order_form} as {id}", payload.items.len());
        }
        Command::Clear { order_form } => {
            let checkout = HttpCheckoutClient::new(context);
            let session = checkout.get_order_form(&order_form).await?;
            let restorer = Restorer::new(checkout, TracingNotifier);
            let cleared = exit_on_failure(restorer.clear_cart(session, &PendingFlag::new()).await);
            print_session("cleared", &cleared);
        }
        Command::Payment { order_form, system } => {
            let checkout = HttpCheckoutClient::new(context);
            let session = checkout.get_order_form(&order_form).await?;
            let restorer = Restorer::new(checkout, TracingNotifier);
            let pending = PendingFlag::new();
            let result = match system {
                Some(system) => restorer.select_payment(session, &system, &pending).await,
                None => restorer.ensure_valid_payment(session, &pending).await,
            };
            print_session("payment on", &exit_on_failure(result));
        }
        Command::Login { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_format_with_two_decimals() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(23860), "238.60");
    }

    #[test]
    fn negative_cents_keep_their_sign() {
        assert_eq!(format_cents(-50), "-0.50");
        assert_eq!(format_cents(-1205), "-12.05");
        assert_eq!(format_cents(i64::MIN), "-92233720368547758.08");
    }

    #[test]
    fn save_and_payment_commands_parse() {
        let cli = Cli::try_parse_from([
            "saved-carts",
            "save",
            "--org",
            "org-1",
            "--cost-center",
            "cc-1",
            "--order-form",
            "of-1",
            "Weekly restock",
        ])
        .unwrap();
        let Command::Save {
            scope,
            order_form,
            title,
        } = cli.command
        else {
            panic!("expected save");
        };
        assert_eq!(scope.org, "org-1");
        assert_eq!(order_form, "of-1");
        assert_eq!(title, "Weekly restock");

        let cli = Cli::try_parse_from(["saved-carts", "payment", "--order-form", "of-1"]).unwrap();
        assert!(matches!(cli.command, Command::Payment { system: None, .. }));
    }
}

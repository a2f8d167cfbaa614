pub mod cli;
pub mod core;
pub mod providers;
pub mod store;
pub mod tracker;

use crate::cli::applications::ApplicationArgs;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Charities,
    Apps,
    Create(ApplicationArgs),
    Edit { slug: String, args: ApplicationArgs },
    Delete { slug: String },
    Progress { slug: String, value: String },
    Donate { slug: String, amount: String },
    Finish { pay_key: String },
    Cancel { pay_key: String },
    View { slug: String, json: bool },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Pledge starting...");

    let config = match config_path {
        Some(path) => core::config::AppConfig::load_from_path(path)?,
        None => core::config::AppConfig::load()?,
    };
    debug!(
        charities = config.charities.len(),
        endpoint = %config.payment.endpoint,
        "Loaded config"
    );

    if let AppCommand::Charities = command {
        cli::charities::run(&config.charities);
        return Ok(());
    }

    let data_path = config.data_path()?;
    let store = store::RecordStore::open(&data_path)?;
    let gateway = providers::PayPalGateway::new(&config.payment)?;
    let tracker = tracker::Tracker::new(store, gateway, config.charities, config.payment);

    match command {
        AppCommand::Charities => Ok(()),
        AppCommand::Apps => cli::applications::list(&tracker),
        AppCommand::Create(args) => cli::applications::create(&tracker, args),
        AppCommand::Edit { slug, args } => cli::applications::edit(&tracker, &slug, args),
        AppCommand::Delete { slug } => cli::applications::delete(&tracker, &slug),
        AppCommand::Progress { slug, value } => {
            cli::applications::progress(&tracker, &slug, &value)
        }
        AppCommand::Donate { slug, amount } => {
            cli::donations::donate(&tracker, &slug, &amount).await
        }
        AppCommand::Finish { pay_key } => cli::donations::finish(&tracker, &pay_key),
        AppCommand::Cancel { pay_key } => cli::donations::cancel(&tracker, &pay_key),
        AppCommand::View { slug, json } => cli::view::run(&tracker, &slug, json),
    }
}

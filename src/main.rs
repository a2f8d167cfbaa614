use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use pledge::cli::applications::ApplicationArgs;
use pledge::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ApplicationFields {
    /// Description of the goal
    #[arg(short, long)]
    description: Option<String>,

    /// Target value of the goal, a whole number
    #[arg(short, long)]
    goal: Option<String>,

    /// Unit of the goal value, singular form
    #[arg(long)]
    singular: Option<String>,

    /// Unit of the goal value, plural form
    #[arg(long)]
    plural: Option<String>,

    /// Charity id to support, repeat for several
    #[arg(long = "charity")]
    charities: Vec<u32>,
}

impl ApplicationFields {
    fn into_args(self, name: Option<String>) -> ApplicationArgs {
        ApplicationArgs {
            name,
            description: self.description,
            goal_value: self.goal,
            goal_units_singular: self.singular,
            goal_units_plural: self.plural,
            charities: self.charities,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List configured charities
    Charities,
    /// List applications
    Apps,
    /// Create an application
    Create {
        /// Name of the application, letters, numbers and spaces
        name: String,
        #[command(flatten)]
        fields: ApplicationFields,
    },
    /// Edit an application
    Edit {
        slug: String,
        #[command(flatten)]
        fields: ApplicationFields,
    },
    /// Delete an application with its donations and progress
    Delete { slug: String },
    /// Record progress towards the goal
    Progress { slug: String, value: String },
    /// Start a donation split across the application's charities
    Donate { slug: String, amount: String },
    /// Complete a donation after checkout
    Finish { pay_key: String },
    /// Abandon a donation
    Cancel { pay_key: String },
    /// Show donations and progress per day
    View {
        slug: String,
        /// Print chart data as JSON
        #[arg(long)]
        json: bool,
    },
}

impl From<Commands> for pledge::AppCommand {
    fn from(cmd: Commands) -> pledge::AppCommand {
        match cmd {
            Commands::Charities => pledge::AppCommand::Charities,
            Commands::Apps => pledge::AppCommand::Apps,
            Commands::Create { name, fields } => {
                pledge::AppCommand::Create(fields.into_args(Some(name)))
            }
            Commands::Edit { slug, fields } => pledge::AppCommand::Edit {
                slug,
                args: fields.into_args(None),
            },
            Commands::Delete { slug } => pledge::AppCommand::Delete { slug },
            Commands::Progress { slug, value } => pledge::AppCommand::Progress { slug, value },
            Commands::Donate { slug, amount } => pledge::AppCommand::Donate { slug, amount },
            Commands::Finish { pay_key } => pledge::AppCommand::Finish { pay_key },
            Commands::Cancel { pay_key } => pledge::AppCommand::Cancel { pay_key },
            Commands::View { slug, json } => pledge::AppCommand::View { slug, json },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => pledge::cli::setup::setup(),
        Some(cmd) => pledge::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

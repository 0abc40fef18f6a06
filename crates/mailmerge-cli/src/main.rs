mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailmerge", version, about = "Preview and merge {{placeholder}} templates against CSV data")]
struct Cli {
    /// Config file (default: .mailmerge/config.toml, then ~/.config/mailmerge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the placeholders in a template
    Scan {
        /// Template file, or `-` for stdin
        template: String,
        #[arg(long)]
        json: bool,
    },
    /// Report placeholders that name no column of the data
    Check {
        template: String,
        /// CSV file providing the columns
        #[arg(long)]
        data: PathBuf,
    },
    /// Show the template with placeholders marked valid or invalid
    Preview {
        template: String,
        #[arg(long, conflicts_with = "fields")]
        data: Option<PathBuf>,
        /// Comma-separated field names
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Merge the template with every row of the data
    Merge {
        template: String,
        #[arg(long)]
        data: PathBuf,
        /// Subject template; composing messages needs one
        #[arg(long)]
        subject: Option<String>,
        /// Column with recipient addresses (default from config)
        #[arg(long)]
        to_field: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Insert a placeholder at a byte offset
    Insert {
        template: String,
        #[arg(long)]
        at: usize,
        #[arg(long)]
        field: String,
    },
    /// Recipient list tools
    Recipients {
        #[command(subcommand)]
        action: RecipientsAction,
    },
    /// List sample templates, or print one
    Samples { name: Option<String> },
    /// Print the active configuration as TOML
    Config,
}

#[derive(Subcommand)]
enum RecipientsAction {
    /// Validate a recipient CSV against the configured schema
    Validate { csv: PathBuf },
    /// Print the CSV header template
    Template,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MAILMERGE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Command::Scan { template, json } => commands::cmd_scan(&template, json),
        Command::Check { template, data } => commands::cmd_check(&template, &data),
        Command::Preview {
            template,
            data,
            fields,
            json,
        } => commands::cmd_preview(config, &template, data.as_deref(), &fields, json),
        Command::Merge {
            template,
            data,
            subject,
            to_field,
            json,
        } => commands::cmd_merge(
            config,
            &template,
            &data,
            subject.as_deref(),
            to_field.as_deref(),
            json,
        ),
        Command::Insert {
            template,
            at,
            field,
        } => commands::cmd_insert(&template, at, &field),
        Command::Recipients { action } => match action {
            RecipientsAction::Validate { csv } => commands::cmd_recipients_validate(config, &csv),
            RecipientsAction::Template => commands::cmd_recipients_template(config),
        },
        Command::Samples { name } => commands::cmd_samples(name.as_deref()),
        Command::Config => commands::cmd_config(config),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("mailmerge: {e:#}");
            std::process::exit(2);
        }
    }
}

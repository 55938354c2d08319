//! Command-line interface for the register client.

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::HandelsregisterClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::listing::ListKind;
use crate::types::{KeywordMode, RegisterType, SearchQuery, SearchResponse, State};

/// Query the German business register (handelsregister.de).
#[derive(Parser)]
#[command(name = "handelsregister")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find entries in the registers.
    Search {
        /// Keywords from the company name
        terms: Vec<String>,

        /// Register type (HRA, HRB, GnR, PR, VR, GsR)
        #[arg(short, long)]
        register: Option<RegisterType>,

        /// Register number
        #[arg(long)]
        id: Option<String>,

        /// Register court code (see `list courts`)
        #[arg(short, long)]
        court: Option<String>,

        /// Legal form code (see `list types`)
        #[arg(short = 't', long = "type")]
        legal_form: Option<String>,

        /// Restrict to a federal state (repeatable)
        #[arg(short, long = "state")]
        states: Vec<State>,

        /// How keywords are combined
        #[arg(short, long, value_enum, default_value_t = ModeArg::All)]
        mode: ModeArg,

        /// Do not include similar-sounding keywords
        #[arg(long)]
        no_similar: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the structured content (XML) of one register entry.
    Xml {
        /// Register type (HRA, HRB, GnR, PR, VR, GsR)
        register: RegisterType,

        /// Register number
        id: String,

        /// Register court code
        court: String,
    },

    /// List register types, courts or legal forms.
    List {
        /// Table to list: registers, courts or types
        kind: ListKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    All,
    Any,
    Exact,
}

impl From<ModeArg> for KeywordMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => KeywordMode::All,
            ModeArg::Any => KeywordMode::Any,
            ModeArg::Exact => KeywordMode::Exact,
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let client = HandelsregisterClient::new(ClientConfig::from_env()?);

    match cli.command {
        Commands::Search {
            terms,
            register,
            id,
            court,
            legal_form,
            states,
            mode,
            no_similar,
            json,
        } => {
            let mut query = SearchQuery::new()
                .with_keywords(terms)
                .with_keyword_mode(mode.into())
                .with_similar_sounding(!no_similar);
            query.register_type = register;
            query.registry_id = id;
            query.court_code = court;
            query.legal_form_code = legal_form;
            query.states = states.into_iter().collect();
            search_command(&client, &query, json)
        }
        Commands::Xml {
            register,
            id,
            court,
        } => xml_command(&client, register, &id, &court),
        Commands::List { kind } => list_command(&client, kind),
    }
}

/// Spinner on stderr; hidden when stderr is not a terminal.
fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn search_command(client: &HandelsregisterClient, query: &SearchQuery, json: bool) -> Result<()> {
    let pb = spinner("Searching...");
    let response = client.search(query);
    pb.finish_and_clear();
    let response = response?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response.items)?);
    } else {
        for line in format_search_lines(&response) {
            println!("{line}");
        }
    }

    for warning in &response.warnings {
        eprintln!("{} {}", style("Warning:").yellow().bold(), warning);
    }
    if response.truncated {
        eprintln!(
            "{} more entries exist than shown; narrow the search",
            style("Note:").yellow().bold()
        );
    }

    Ok(())
}

fn xml_command(
    client: &HandelsregisterClient,
    register: RegisterType,
    id: &str,
    court: &str,
) -> Result<()> {
    let pb = spinner("Fetching document...");
    let document = client.fetch_document(register, id, court);
    pb.finish_and_clear();
    println!("{}", document?);
    Ok(())
}

fn list_command(client: &HandelsregisterClient, kind: ListKind) -> Result<()> {
    let pb = spinner(&format!("Loading {kind}..."));
    let entries = client.list(kind);
    pb.finish_and_clear();
    for line in format_list_lines(&entries?) {
        println!("{line}");
    }
    Ok(())
}

/// `<register> <id> <court>\t<title>` per result row.
pub fn format_search_lines(response: &SearchResponse) -> Vec<String> {
    response
        .items
        .iter()
        .map(|item| {
            format!(
                "{} {} {}\t{}",
                item.register_type, item.registry_id, item.court_code, item.title
            )
        })
        .collect()
}

/// `<code>\t<name>` per entry.
pub fn format_list_lines(entries: &[(String, String)]) -> Vec<String> {
    entries
        .iter()
        .map(|(code, name)| format!("{code}\t{name}"))
        .collect()
}

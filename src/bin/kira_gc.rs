use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use kira_group_compare::app::{self, App};
use kira_group_compare::config::{ConfigLoader, ResolvedConfig};
use kira_group_compare::domain::OverlapStrategy;
use kira_group_compare::error::CompareError;
use kira_group_compare::output::JsonOutput;

#[derive(Parser)]
#[command(name = "kira-gc")]
#[command(about = "Group comparison state and mutation annotation for cancer cohorts")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<String>,

    /// Parameter file holding the persisted comparison state
    #[arg(long, global = true)]
    params: Option<Utf8PathBuf>,

    /// JSON list of comparison groups
    #[arg(long, global = true)]
    groups_file: Option<Utf8PathBuf>,

    /// JSON comparison session with user-created groups
    #[arg(long, global = true)]
    session_file: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Inspect and change group selection and order")]
    Groups(GroupsArgs),
    #[command(about = "Read or change the overlap strategy")]
    Overlap(OverlapArgs),
    #[command(about = "Store comparison sessions")]
    Session(SessionArgs),
    #[command(about = "Annotate mutation rows from local datasets")]
    Annotate(AnnotateArgs),
}

#[derive(Args)]
struct GroupsArgs {
    #[command(subcommand)]
    command: Option<GroupsCommand>,
}

#[derive(Subcommand)]
enum GroupsCommand {
    #[command(about = "List groups in display order")]
    List,
    #[command(about = "Toggle selection of a group")]
    Toggle { name: String },
    #[command(about = "Select every group")]
    SelectAll,
    #[command(about = "Deselect every group")]
    DeselectAll,
    #[command(about = "Move a group to a new position")]
    Move { old_index: usize, new_index: usize },
}

#[derive(Args)]
struct OverlapArgs {
    #[command(subcommand)]
    command: Option<OverlapCommand>,
}

#[derive(Subcommand)]
enum OverlapCommand {
    Get,
    Set { strategy: String },
}

#[derive(Args)]
struct SessionArgs {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    #[command(about = "Save a session file and record its id")]
    Save { file: Utf8PathBuf },
}

#[derive(Args)]
struct AnnotateArgs {
    /// JSON list of rows, each a list of mutations
    rows: Utf8PathBuf,

    #[arg(long)]
    hotspots: Option<Utf8PathBuf>,

    #[arg(long)]
    genome_links: Option<Utf8PathBuf>,

    #[arg(long)]
    oncogenicity: Option<Utf8PathBuf>,

    #[arg(long)]
    evidence_genes: Option<Utf8PathBuf>,

    #[arg(long)]
    evidence_variants: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<CompareError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &CompareError) -> u8 {
    match error {
        CompareError::MissingConfig
        | CompareError::MissingInput(_)
        | CompareError::InputRead(_)
        | CompareError::NotReady(_) => 2,
        CompareError::Session(_) | CompareError::Filesystem(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match ConfigLoader::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(CompareError::MissingConfig) => ResolvedConfig::default(),
        Err(err) => return Err(err.into()),
    };
    if let Some(params) = cli.params {
        config.params = params;
    }
    if cli.groups_file.is_some() {
        config.groups = cli.groups_file;
    }
    if cli.session_file.is_some() {
        config.session = cli.session_file;
    }

    match cli.command {
        Commands::Groups(args) => run_groups(args, config),
        Commands::Overlap(args) => run_overlap(args, config),
        Commands::Session(args) => run_session(args, config),
        Commands::Annotate(args) => run_annotate(args, config),
    }
}

fn run_groups(args: GroupsArgs, config: ResolvedConfig) -> miette::Result<()> {
    if config.groups.is_none() {
        return Err(CompareError::MissingInput("group list").into());
    }
    let app = App::new(config);
    let mut store = app.open_store()?;

    match args.command.unwrap_or(GroupsCommand::List) {
        GroupsCommand::List => {}
        GroupsCommand::Toggle { name } => store.toggle_group_selected(&name)?,
        GroupsCommand::SelectAll => store.select_all_groups()?,
        GroupsCommand::DeselectAll => store.deselect_all_groups()?,
        GroupsCommand::Move {
            old_index,
            new_index,
        } => store.update_group_order(old_index, new_index)?,
    }

    let result = app::list_groups(&mut store)?;
    JsonOutput::print_groups(&result).into_diagnostic()?;
    Ok(())
}

fn run_overlap(args: OverlapArgs, config: ResolvedConfig) -> miette::Result<()> {
    let app = App::new(config);
    let mut store = app.open_store()?;

    if let Some(OverlapCommand::Set { strategy }) = args.command {
        store.set_overlap_strategy(OverlapStrategy::from(strategy))?;
    }

    JsonOutput::print_overlap(&app::overlap(&store)).into_diagnostic()?;
    Ok(())
}

fn run_session(args: SessionArgs, config: ResolvedConfig) -> miette::Result<()> {
    let app = App::new(config);
    let mut store = app.open_store()?;

    match args.command {
        SessionCommand::Save { file } => {
            let result = app.save_session(&mut store, &file)?;
            JsonOutput::print_session(&result).into_diagnostic()?;
        }
    }
    Ok(())
}

fn run_annotate(args: AnnotateArgs, mut config: ResolvedConfig) -> miette::Result<()> {
    let datasets = &mut config.datasets;
    if args.hotspots.is_some() {
        datasets.hotspots = args.hotspots;
    }
    if args.genome_links.is_some() {
        datasets.genome_links = args.genome_links;
    }
    if args.oncogenicity.is_some() {
        datasets.oncogenicity = args.oncogenicity;
    }
    if args.evidence_genes.is_some() {
        datasets.evidence_genes = args.evidence_genes;
    }
    if args.evidence_variants.is_some() {
        datasets.evidence_variants = args.evidence_variants;
    }

    let app = App::new(config);
    let result = app.annotate(&args.rows)?;
    JsonOutput::print_annotations(&result).into_diagnostic()?;
    Ok(())
}

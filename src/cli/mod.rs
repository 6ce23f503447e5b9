pub mod render;

use std::path::PathBuf;

use ansi_term::Colour::{Red, Yellow};
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tokio::io::BufReader;
use tracing::level_filters::LevelFilter;

use crate::{
    app::{
        editor::{FormOutcome, RecordDraft, RecordForm},
        sort::SortMode,
        App,
    },
    export::{ExportOutcome, GenericExportTarget},
    storage::record_store::{JsonRecordStore, RecordStore},
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Vidanum", version, long_about = None)]
#[command(about = "Track daily wellness numbers from the terminal", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Record a new entry. Prompts for the values when they are not passed inline")]
    Add {
        #[arg(help = "Self-care hours. Comma and dot decimals are both accepted")]
        autocuidado: Option<String>,
        #[arg(help = "Gratitude moments")]
        gratidao: Option<String>,
        #[arg(help = "Social interactions")]
        interacoes: Option<String>,
    },
    #[command(
        about = "Replace the values of an existing entry. Prompts with the current values when none are passed inline"
    )]
    Edit {
        #[arg(help = "Id of the entry to edit, as shown by list")]
        id: i64,
        #[arg(help = "Self-care hours. Comma and dot decimals are both accepted")]
        autocuidado: Option<String>,
        #[arg(help = "Gratitude moments")]
        gratidao: Option<String>,
        #[arg(help = "Social interactions")]
        interacoes: Option<String>,
    },
    #[command(about = "Delete an entry")]
    Delete {
        #[arg(help = "Id of the entry to delete, as shown by list")]
        id: i64,
    },
    #[command(about = "Display the entries")]
    List {
        #[arg(long, default_value_t = SortMode::Recent, help = "Ordering of the list. Most recent first, or highest water value first")]
        sort: SortMode,
    },
    #[command(about = "Export the collection as dados.json")]
    Export {
        #[arg(
            long,
            help = "Hand the data file to the platform share mechanism instead of writing a copy"
        )]
        share: bool,
        #[arg(
            long,
            help = "Directory the exported file is written into. Defaults to the current directory"
        )]
        out: Option<PathBuf>,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args.dir.map_or_else(create_application_default_path, Ok)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Add {
            autocuidado,
            gratidao,
            interacoes,
        } => {
            let mut app = load_app(app_dir).await?;
            match obtain_draft(RecordForm::new(), autocuidado, gratidao, interacoes).await? {
                Some(draft) => {
                    let id = app.submit(draft).await;
                    println!("Recorded entry {id}");
                }
                None => println!("Cancelled."),
            }
            Ok(())
        }
        Commands::Edit {
            id,
            autocuidado,
            gratidao,
            interacoes,
        } => {
            let mut app = load_app(app_dir).await?;
            let Some(selected) = app.start_edit(id).cloned() else {
                return Err(Args::command()
                    .error(
                        clap::error::ErrorKind::ValueValidation,
                        format!("No entry with id {id}"),
                    )
                    .into());
            };
            match obtain_draft(RecordForm::editing(selected), autocuidado, gratidao, interacoes)
                .await?
            {
                Some(draft) => {
                    app.submit(draft).await;
                    println!("Updated entry {id}");
                }
                None => {
                    app.cancel_edit();
                    println!("Cancelled.");
                }
            }
            Ok(())
        }
        Commands::Delete { id } => {
            let mut app = load_app(app_dir).await?;
            app.delete(id).await;
            println!("Deleted entry {id}");
            Ok(())
        }
        Commands::List { sort } => {
            let app = load_app(app_dir).await?;
            render::print_records(&app.sorted_view(sort));
            Ok(())
        }
        Commands::Export { share, out } => {
            let store = JsonRecordStore::new(app_dir)?;
            let target = GenericExportTarget::detect(
                share,
                store.location(),
                out.unwrap_or_else(|| PathBuf::from(".")),
            );
            let app = App::load(store, Box::new(DefaultClock)).await;

            match app.export(&target).await? {
                ExportOutcome::Delivered(path) => println!("Exported {}", path.display()),
                ExportOutcome::NothingToExport => {
                    println!("{}", Yellow.paint("No data to export."))
                }
                ExportOutcome::ShareUnavailable => {
                    println!("{}", Red.paint("Sharing is not available on this system."))
                }
            }
            Ok(())
        }
    }
}

async fn load_app(app_dir: PathBuf) -> Result<App<JsonRecordStore>> {
    let store = JsonRecordStore::new(app_dir)?;
    Ok(App::load(store, Box::new(DefaultClock)).await)
}

/// Builds the draft either from the inline values or by running the interactive
/// form. `None` means the user cancelled.
async fn obtain_draft(
    form: RecordForm,
    autocuidado: Option<String>,
    gratidao: Option<String>,
    interacoes: Option<String>,
) -> Result<Option<RecordDraft>> {
    match (autocuidado, gratidao, interacoes) {
        (Some(autocuidado), Some(gratidao), Some(interacoes)) => {
            Ok(Some(form.submit(&autocuidado, &gratidao, &interacoes)?))
        }
        (None, None, None) => {
            let mut input = BufReader::new(tokio::io::stdin());
            match form.run_interactive(&mut input).await? {
                FormOutcome::Submitted(draft) => Ok(Some(draft)),
                FormOutcome::Cancelled => Ok(None),
            }
        }
        _ => Err(Args::command()
            .error(
                clap::error::ErrorKind::WrongNumberOfValues,
                "Pass all three values or none of them",
            )
            .into()),
    }
}

//! LeakHere CLI: command-line client for the LeakHere media-sharing API.
//!
//! Configuration comes from LEAKHERE_* environment variables (or a `.env` file).
//! Results are printed as JSON on stdout; notices and progress go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use leakhere_api_client::ApiClient;
use leakhere_cli::{
    init_tracing, load_selected_file, truncate_string, FileSessionStore, Osc52Clipboard,
    TerminalNotifier, UnavailableShareSheet,
};
use leakhere_core::gallery::{SortOrder, TypeFilter};
use leakhere_core::models::{FileTypeCategory, MediaFile, ReportReason, UploadFormFields};
use leakhere_core::{CdnUrlRewriter, ClientConfig};
use leakhere_services::{
    AccountService, GalleryFeed, MediaService, MediaView, ResultReporter, UploadOrchestrator,
};
use serde::Serialize;
use serde_json::json;

#[derive(Parser)]
#[command(name = "leakhere", about = "LeakHere media sharing CLI")]
struct Cli {
    /// Override LEAKHERE_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more files of a single type
    Upload {
        /// File type: images, videos, gifs or documents
        #[arg(long = "type")]
        category: FileTypeCategory,
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Title applied to every file (defaults to each file name)
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Uploader name (defaults to the logged-in user)
        #[arg(long)]
        uploader: Option<String>,
        /// Copy the first share link to the clipboard
        #[arg(long)]
        copy: bool,
        /// Share the first share link
        #[arg(long, conflicts_with = "copy")]
        share: bool,
    },
    /// Browse the gallery
    List {
        #[arg(long)]
        search: Option<String>,
        /// all, images, videos, gifs or documents
        #[arg(long = "type", default_value = "all")]
        filter: TypeFilter,
        /// recent, views, downloads or likes
        #[arg(long, default_value = "recent")]
        sort: SortOrder,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a media item with its comments
    View { id: String },
    /// Like or unlike a media item
    Like { id: String },
    /// Comment on a media item
    Comment { id: String, text: String },
    /// Reply to a comment
    Reply {
        id: String,
        /// Comment being replied to
        parent: String,
        text: String,
    },
    /// Report a media item
    Report {
        id: String,
        /// copyright, inappropriate, spam or other
        #[arg(long)]
        reason: Option<ReportReason>,
        #[arg(long)]
        details: String,
    },
    /// Print the download URL of a media item and record the download
    Download { id: String },
    /// Create an account
    Register {
        username: String,
        password: String,
        /// Password again
        confirm: String,
    },
    Login { username: String, password: String },
    Logout,
    /// Show the logged-in user
    Whoami,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn view_json(view: &MediaView) -> serde_json::Value {
    json!({
        "file": view.file,
        "comments": view.comments,
        "liked": view.like.liked,
        "like_count": view.like.like_count,
    })
}

fn print_table(files: &[MediaFile]) {
    println!(
        "{:<24} {:<10} {:<32} {:>7} {:>7} {:>7}",
        "ID", "TYPE", "TITLE", "VIEWS", "DLS", "LIKES"
    );
    for file in files {
        println!(
            "{:<24} {:<10} {:<32} {:>7} {:>7} {:>7}",
            truncate_string(&file.file_id, 24),
            file.file_type.as_deref().unwrap_or("-"),
            truncate_string(file.display_title(), 32),
            file.view_count.unwrap_or(0),
            file.download_count.unwrap_or(0),
            file.like_count.unwrap_or(0),
        );
    }
}

struct App {
    config: ClientConfig,
    client: Arc<ApiClient>,
    notifier: Arc<TerminalNotifier>,
    accounts: AccountService,
}

impl App {
    fn new(api_url: Option<String>) -> anyhow::Result<Self> {
        let mut config = ClientConfig::from_env().context("Invalid LEAKHERE_* configuration")?;
        if let Some(api_url) = api_url {
            config = config.with_api_url(api_url);
            config.validate()?;
        }
        let client = Arc::new(ApiClient::from_config(&config)?);
        let notifier = Arc::new(TerminalNotifier);
        let accounts = AccountService::new(
            client.clone(),
            Arc::new(FileSessionStore::new(&config.session_path)),
            notifier.clone(),
        );
        Ok(Self {
            config,
            client,
            notifier,
            accounts,
        })
    }

    fn cdn(&self) -> CdnUrlRewriter {
        CdnUrlRewriter::new(self.config.cdn_domain.clone())
    }

    fn media(&self) -> MediaService {
        MediaService::new(
            self.client.clone(),
            self.client.clone(),
            self.client.clone(),
            self.client.clone(),
            self.notifier.clone(),
            self.cdn(),
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let app = App::new(cli.api_url)?;
    let session = app.accounts.restore();

    // Service failures are already reported as notices; they only set the exit code.
    match cli.command {
        Commands::Upload {
            category,
            files,
            title,
            description,
            tags,
            uploader,
            copy,
            share,
        } => {
            let selected = files
                .iter()
                .map(|path| load_selected_file(path))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let mut orchestrator = UploadOrchestrator::new(
                app.client.clone(),
                app.client.clone(),
                app.notifier.clone(),
            );
            orchestrator.set_category(category);
            orchestrator.set_form(UploadFormFields {
                title: title.unwrap_or_default(),
                description: description.unwrap_or_default(),
                tags: tags.unwrap_or_default(),
                uploader_name: uploader.unwrap_or_default(),
            });
            orchestrator.select_files(selected);
            if orchestrator.selection().is_empty() {
                return Ok(ExitCode::FAILURE);
            }

            orchestrator.set_progress_observer(|snapshot| {
                eprint!("\r{:?} {:>3}%   ", snapshot.phase, snapshot.percent);
            });
            let summary = orchestrator.submit(session.as_ref()).await?;
            eprintln!();
            print_json(&summary.results)?;

            let reporter = ResultReporter::new(
                Arc::new(Osc52Clipboard),
                Arc::new(UnavailableShareSheet),
                app.notifier.clone(),
            );
            let entries = ResultReporter::entries(&summary);
            let first_link = entries
                .iter()
                .find_map(|e| e.link.map(|l| (e.display_name, l)));
            if let Some((name, link)) = first_link {
                if share {
                    reporter.share(name, link).await;
                } else if copy {
                    reporter.copy_link(link).await;
                }
            }

            if !summary.all_succeeded() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::List {
            search,
            filter,
            sort,
            pages,
            json,
        } => {
            let mut feed = GalleryFeed::new(
                app.client.clone(),
                app.notifier.clone(),
                app.cdn(),
                app.config.page_size,
            );
            feed.set_filter(filter);
            feed.set_sort(sort);

            if feed.refresh(search.as_deref()).await.is_err() {
                return Ok(ExitCode::FAILURE);
            }
            for _ in 1..pages.max(1) {
                if !feed.has_more() || feed.load_more().await.is_err() {
                    break;
                }
            }

            let visible = feed.visible();
            if json {
                print_json(&json!({ "files": visible, "has_more": feed.has_more() }))?;
            } else {
                print_table(&visible);
            }
        }
        Commands::View { id } => {
            let Ok(view) = app.media().load(&id, session.as_ref()).await else {
                return Ok(ExitCode::FAILURE);
            };
            print_json(&view_json(&view))?;
        }
        Commands::Like { id } => {
            let media = app.media();
            let Ok(mut view) = media.load(&id, session.as_ref()).await else {
                return Ok(ExitCode::FAILURE);
            };
            let Ok(like) = media.toggle_like(&mut view, session.as_ref()).await else {
                return Ok(ExitCode::FAILURE);
            };
            print_json(&json!({ "liked": like.liked, "like_count": like.like_count }))?;
        }
        Commands::Comment { id, text } => {
            let media = app.media();
            let Ok(mut view) = media.load(&id, session.as_ref()).await else {
                return Ok(ExitCode::FAILURE);
            };
            if media.add_comment(&mut view, session.as_ref(), &text).await.is_err() {
                return Ok(ExitCode::FAILURE);
            }
            print_json(&view.comments)?;
        }
        Commands::Reply { id, parent, text } => {
            let media = app.media();
            let Ok(mut view) = media.load(&id, session.as_ref()).await else {
                return Ok(ExitCode::FAILURE);
            };
            if media
                .reply(&mut view, session.as_ref(), &parent, &text)
                .await
                .is_err()
            {
                return Ok(ExitCode::FAILURE);
            }
            print_json(&view.comments)?;
        }
        Commands::Report {
            id,
            reason,
            details,
        } => {
            if app
                .media()
                .report(&id, session.as_ref(), reason, &details)
                .await
                .is_err()
            {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Download { id } => {
            let media = app.media();
            let Ok(mut view) = media.load(&id, session.as_ref()).await else {
                return Ok(ExitCode::FAILURE);
            };
            let Ok(download) = media.download(&mut view) else {
                return Ok(ExitCode::FAILURE);
            };
            print_json(&json!({ "url": download.url, "file_name": download.file_name }))?;
            media.flush().await;
        }
        Commands::Register {
            username,
            password,
            confirm,
        } => {
            let Ok(session) = app.accounts.register(&username, &password, &confirm).await else {
                return Ok(ExitCode::FAILURE);
            };
            print_json(&session)?;
        }
        Commands::Login { username, password } => {
            let Ok(session) = app.accounts.login(&username, &password).await else {
                return Ok(ExitCode::FAILURE);
            };
            print_json(&session)?;
        }
        Commands::Logout => {
            app.accounts.logout()?;
        }
        Commands::Whoami => match session {
            Some(session) => print_json(&session)?,
            None => {
                eprintln!("Not logged in.");
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

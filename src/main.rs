use std::{
    io::{BufRead as _, Write as _, stdin, stdout},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use folder_settings::{
    AccountId, Action, FolderId, FolderSettingsCoordinator, FolderSettingsDataStore,
    FolderSettingsResult, LoadState, LocalMessagingController,
    config::Config,
    folder::SpecialFolderClassifier,
    logging,
    repository::SqliteRepositoryProvider,
    settings::{BoolSetting, ClassSetting},
    settle,
};
use log::info;
use tokio::task::spawn_blocking;

/// Show and edit the settings of a single mail folder.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Account the folder belongs to.
    #[arg(short, long)]
    account: String,

    /// Local id of the folder.
    #[arg(short, long)]
    folder: i64,

    /// Config file to use instead of the default location.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Change a setting, e.g. `folder_settings_in_top_group=true`.
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    settings: Vec<String>,

    /// Delete all messages of the folder.
    #[arg(long)]
    clear: bool,

    /// Do not ask before clearing.
    #[arg(short, long, requires = "clear")]
    yes: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(Some(&args.account));

    let config = Arc::new(Config::load_from_file(args.config.as_deref())?);
    let repositories = Arc::new(SqliteRepositoryProvider::new(config.data_dir()));
    let (controller, worker) = LocalMessagingController::start(repositories.clone());
    let mut coordinator = FolderSettingsCoordinator::new(
        config,
        repositories,
        Arc::new(SpecialFolderClassifier),
        Arc::new(controller.clone()),
    );

    let mut state =
        coordinator.get_state(&AccountId::new(args.account), FolderId::new(args.folder));
    let editing_handle = match settle(&mut state).await {
        LoadState::Ready(FolderSettingsResult::Loaded {
            folder,
            editing_handle,
        }) => {
            println!(
                "{} ({}) id={} type={}",
                folder.name(),
                folder.server_id(),
                folder.id(),
                folder.folder_type()
            );
            editing_handle
        }
        LoadState::Ready(FolderSettingsResult::NotFound) => {
            println!("folder not found");
            return Ok(());
        }
        LoadState::Failed(err) => bail!("loading folder settings failed: {err}"),
        LoadState::Loading => unreachable!("settled state is never loading"),
    };

    let settings = args.settings;
    spawn_blocking(move || {
        for setting in &settings {
            apply_setting(&editing_handle, setting)?;
        }
        print_settings(&editing_handle)
    })
    .await??;

    if args.clear {
        let mut actions = coordinator.actions();
        coordinator.request_clear_folder_confirmation();
        if actions.recv().await? == Action::RequestClearFolderConfirmation
            && (args.yes || confirm("Delete all messages in this folder?")?)
        {
            coordinator.confirm_clear_folder()?;
        } else {
            info!("clearing folder aborted");
        }
    }

    controller.shutdown();
    worker.await?;

    Ok(())
}

fn apply_setting(editing_handle: &FolderSettingsDataStore, setting: &str) -> Result<()> {
    let (key, value) = setting
        .split_once('=')
        .with_context(|| format!("setting {setting:?} should look like KEY=VALUE"))?;
    if key.parse::<BoolSetting>().is_ok() {
        let value = value
            .parse::<bool>()
            .with_context(|| format!("{key} expects true or false"))?;
        editing_handle.put_bool(key, value)?;
    } else {
        editing_handle.put_string(key, value)?;
    }

    Ok(())
}

fn print_settings(editing_handle: &FolderSettingsDataStore) -> Result<()> {
    for key in [BoolSetting::IN_TOP_GROUP, BoolSetting::INTEGRATE] {
        println!("{key}={}", editing_handle.get_bool(key)?);
    }
    for key in [
        ClassSetting::DISPLAY,
        ClassSetting::SYNC,
        ClassSetting::NOTIFY,
        ClassSetting::PUSH,
    ] {
        println!("{key}={}", editing_handle.get_string(key)?);
    }

    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    stdout().flush()?;
    let Some(answer) = stdin().lock().lines().next().transpose()? else {
        bail!("no answer given");
    };

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

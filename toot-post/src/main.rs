//! toot-post - post toots and threads to a Mastodon-compatible instance

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use libtootcast::api::ApiClient;
use libtootcast::{content, media, thread_content, AccountStore, ThreadPoster, DEFAULT_MAX_CHARS};

mod login;

#[derive(Parser, Debug)]
#[command(name = "toot-post", version)]
#[command(
    about = "Post toots and threads to a Mastodon-compatible instance",
    long_about = None
)]
struct Cli {
    /// Content strings or file paths; text files are read, images are attached
    content: Vec<String>,

    /// List the configured accounts
    #[arg(long)]
    list_accounts: bool,

    /// Log in to an account and store its credentials
    #[arg(long)]
    add_account: bool,

    /// Delete an account from the local store
    #[arg(long, value_name = "ADDRESS")]
    delete_account: Option<String>,

    /// Make an account the default
    #[arg(long, value_name = "ADDRESS")]
    set_default_account: Option<String>,

    /// Post as this account instead of the default
    #[arg(long, value_name = "ADDRESS")]
    account: Option<String>,

    /// Compose the toot interactively (finish with EOF)
    #[arg(short, long)]
    interactive: bool,

    /// Content warning applied to every post in the thread
    #[arg(long, value_name = "TEXT")]
    cw: Option<String>,

    /// Media description; repeatable, paired with media files in order
    #[arg(long, value_name = "TEXT")]
    description: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        libtootcast::logging::init_default();
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut store = AccountStore::load()?;

    if cli.list_accounts {
        list_accounts(&store);
        return Ok(());
    }
    if cli.add_account {
        let api = ApiClient::new()?;
        let address = login::add_account(&api, &mut store).await?;
        println!("Added {}", address.green());
        return Ok(());
    }
    if let Some(address) = &cli.delete_account {
        store.remove(address)?;
        store.save()?;
        println!("Deleted {}", address);
        return Ok(());
    }
    if let Some(address) = &cli.set_default_account {
        store.set_default(address)?;
        store.save()?;
        println!("Default account is now {}", address);
        return Ok(());
    }

    let (address, account) = store.resolve(cli.account.as_deref())?;
    tracing::debug!("posting as {}", address);

    let media_files = media::resolve(&cli.content, &cli.description);
    let segments = content::gather(&cli.content, cli.interactive)?;
    let pages = thread_content(&segments, DEFAULT_MAX_CHARS);

    let api = ApiClient::new()?;
    let statuses = ThreadPoster::new(&api, account)
        .post_thread(&pages, &media_files, cli.cw.as_deref())
        .await?;

    for status in &statuses {
        match &status.url {
            Some(url) => println!("{} {}", "tooted".green(), url),
            None => println!("{} {}", "tooted".green(), status.id),
        }
    }
    Ok(())
}

fn list_accounts(store: &AccountStore) {
    if store.is_empty() {
        println!("There are no accounts. Please run --add-account to log in.");
        return;
    }
    for address in store.addresses() {
        if store.is_default(address) {
            println!("{} {}", "*".green(), address);
        } else {
            println!("  {}", address);
        }
    }
}

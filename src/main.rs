use clap::{Parser, Subcommand};
use dotenv::dotenv;
use gator::commands::{
    AddFeed, Agg, Browse, Command, CommandError, Follow, Following, ListFeeds, ListUsers, Login,
    Register, Reset, Unfollow,
};
use gator::config::{Config, UserConfig};
use gator::db::PgStore;
use gator::sync::reader::RssReader;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gator", version, about = "Aggregates RSS feeds into Postgres")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Create a user and log in as them
    Register { name: String },
    /// Switch the current user
    Login { name: String },
    /// Delete all users, feeds and posts
    Reset,
    /// List all users
    Users,
    /// Fetch feeds forever, one every interval (e.g. 30s, 1m, 1h30m)
    Agg { interval: String },
    /// Add a feed and follow it
    Addfeed { name: String, url: String },
    /// List all feeds
    Feeds,
    /// Follow an existing feed by url
    Follow { url: String },
    /// List the feeds the current user follows
    Following,
    /// Stop following a feed
    Unfollow { url: String },
    /// Show the newest posts from followed feeds
    Browse { limit: Option<i64> },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(output) => println!("{}", output),
        Err(error) => {
            log::error!("{}", error);
            process::exit(1);
        }
    }
}

async fn run(command: CliCommand) -> Result<String, CommandError> {
    let mut config = UserConfig::read()?;
    let store = PgStore::connect(&config.database_url()?, Config::database_pool_size()?)?;

    let command: Box<dyn Command> = match command {
        CliCommand::Agg { interval } => return aggregate(&store, &interval).await,
        CliCommand::Register { name } => Box::new(Register::new(name)),
        CliCommand::Login { name } => Box::new(Login::new(name)),
        CliCommand::Reset => Box::new(Reset {}),
        CliCommand::Users => Box::new(ListUsers {}),
        CliCommand::Addfeed { name, url } => Box::new(AddFeed::new(name, url)),
        CliCommand::Feeds => Box::new(ListFeeds {}),
        CliCommand::Follow { url } => Box::new(Follow::new(url)),
        CliCommand::Following => Box::new(Following {}),
        CliCommand::Unfollow { url } => Box::new(Unfollow::new(url)),
        CliCommand::Browse { limit } => Box::new(Browse::new(limit)),
    };

    log::debug!("Running {}", command.command());

    command.response(&store, &mut config)
}

async fn aggregate(store: &PgStore, interval: &str) -> Result<String, CommandError> {
    let agg = Agg::new(interval)?;

    log::debug!("Running {}", Agg::command());

    let timeout = Duration::from_secs(Config::request_timeout_in_seconds()?);
    let reader = RssReader::new(timeout)?;

    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for ctrl-c: {}", error);
        }
    };

    Ok(agg.execute(store, &reader, shutdown).await)
}

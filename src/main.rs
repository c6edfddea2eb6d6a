use dotenvy::dotenv;
use fund_console::{
    config,
    console::Console,
    core::{bus::NotificationBus, store::ViewStore},
    errors::Result,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing on stderr so it never interleaves with the console output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, non-fatal
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    let seed = app_config.seed_or_demo()?;

    // 4. Mount the console before seeding so the store observes every entity
    let bus = NotificationBus::new();
    let mut console = Console::mount(&bus, ViewStore::new().shared(), &app_config.display)?;
    seed.publish(&bus);

    // 5. Read lines until quit or end of input
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    stdout
        .write_all(b"Employee Fund Console - type 'help' after signing in.\n")
        .await?;
    loop {
        stdout.write_all(console.prompt().as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            info!("End of input");
            break;
        };
        let reply = console.handle(&line);
        for output in &reply.lines {
            stdout.write_all(output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        if reply.quit {
            break;
        }
    }

    // 6. Tear down timers and subscriptions
    console.teardown();
    bus.dispose();
    info!("Console closed");
    Ok(())
}

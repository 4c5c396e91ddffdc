use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use glowbot_common::traits::executor_traits::{
    HomeAutomation, LedBoard, SoundPlayer, SpeechSynthesizer,
};
use glowbot_common::traits::repository_traits::{
    CommandRepository, PlaqueRepository, SecretsRepository,
};
use glowbot_core::actions::{GoogleSpeech, HomeAssistantClient, SoundBoard, WledBoard};
use glowbot_core::eventbus::{BotEvent, EventBus};
use glowbot_core::platforms::manager::PlatformManager;
use glowbot_core::platforms::youtube::api::{LiveChatApi, YouTubeApiClient};
use glowbot_core::repositories::{
    JsonCommandRepository, JsonPlaqueRepository, JsonSecretsRepository,
};
use glowbot_core::services::{ActionDispatcher, CommandService, MessageService};
use glowbot_core::Error;

#[derive(Parser, Debug, Clone)]
#[command(name = "glowbot")]
#[command(author, version, about = "GlowBot - chat-driven lights, sounds, and speech")]
struct Args {
    /// Directory holding commands.json, secrets.json, and plaques.json
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// Directory of mp3 clips for sound commands
    #[arg(long, default_value = "./sounds")]
    sounds_dir: String,

    /// External binary used to play mp3 audio
    #[arg(long, default_value = "mpg123")]
    player: String,

    /// Skip broadcast discovery and poll this YouTube video id directly
    #[arg(long)]
    video_id: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("glowbot=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    info!(
        "GlowBot starting. data_dir={}, sounds_dir={}, player={}",
        args.data_dir, args.sounds_dir, args.player
    );

    run_bot(args).await?;
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run_bot(args: Args) -> Result<(), Error> {
    // 1) Stores: flat JSON files under the data directory, shared with the
    //    external editor.
    let data_dir = PathBuf::from(&args.data_dir);
    let command_repo: Arc<dyn CommandRepository> =
        Arc::new(JsonCommandRepository::new(data_dir.join("commands.json")));
    let secrets_repo: Arc<dyn SecretsRepository> =
        Arc::new(JsonSecretsRepository::new(data_dir.join("secrets.json")));
    let plaque_repo: Arc<dyn PlaqueRepository> =
        Arc::new(JsonPlaqueRepository::new(data_dir.join("plaques.json")));

    let event_bus = Arc::new(EventBus::new());

    // 2) Side-effect executors
    let sound_player: Arc<dyn SoundPlayer> =
        Arc::new(SoundBoard::new(&args.sounds_dir, &args.player));
    let home_automation: Arc<dyn HomeAutomation> =
        Arc::new(HomeAssistantClient::new(Arc::clone(&secrets_repo)));
    let led_board: Arc<dyn LedBoard> = Arc::new(WledBoard::new(Arc::clone(&secrets_repo)));
    let speech: Arc<dyn SpeechSynthesizer> = Arc::new(GoogleSpeech::new(&args.player));

    // 3) Routing and dispatch pipeline
    let command_service = Arc::new(CommandService::new(
        Arc::clone(&command_repo),
        sound_player,
        home_automation,
    ));
    let dispatcher = Arc::new(ActionDispatcher::new(
        command_service,
        Arc::clone(&plaque_repo),
        led_board,
        speech,
    ));
    let message_service = Arc::new(MessageService::new(
        command_repo,
        plaque_repo,
        dispatcher,
        Arc::clone(&event_bus),
    ));

    // 4) Log chat traffic and source lifecycle from the bus
    let mut bus_rx = event_bus.subscribe(None).await;
    tokio::spawn(async move {
        while let Some(event) = bus_rx.recv().await {
            match event {
                BotEvent::ChatMessage(msg) => {
                    info!("(Chat) [{}] {}: {}", msg.source, msg.author, msg.text);
                }
                BotEvent::SourceStopped { source, reason } => {
                    warn!("(Chat) source {} stopped: {}", source, reason);
                }
                BotEvent::SystemMessage(text) => {
                    info!("(System) {}", text);
                }
            }
        }
    });

    // 5) Start the chat sources
    let youtube_api: Arc<dyn LiveChatApi> = Arc::new(YouTubeApiClient::new());
    let platform_manager = PlatformManager::new(
        message_service,
        secrets_repo,
        youtube_api,
        Arc::clone(&event_bus),
        args.video_id.clone(),
    );
    platform_manager.start_all_platforms().await?;

    // 6) Ctrl-C signals shutdown through the bus
    let eb_clone = event_bus.clone();
    let _ctrlc_handle = tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {:?}", e);
        }
        info!("Ctrl-C detected; shutting down event bus...");
        eb_clone.shutdown();
    });

    // 7) Wait for shutdown
    let mut shutdown_rx = event_bus.shutdown_rx.clone();
    loop {
        if shutdown_rx.changed().await.is_err() {
            break;
        }
        if *shutdown_rx.borrow() {
            info!("Shutdown signaled; exiting main loop.");
            break;
        }
    }

    Ok(())
}

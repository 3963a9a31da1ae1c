use std::io::Error;
use std::sync::Arc;

use callback_desk::{
    application::{
        services::{call_scheduler::CallScheduler, jwt::{JwtService, JwtServiceConfig}},
        usecases::{
            cancel_callback::CancelCallbackUseCase, complete_callback::CompleteCallbackUseCase,
            create_callback::CreateCallbackUseCase, get_callback::GetCallbackUseCase,
            list_callbacks::ListCallbacksUseCase, schedule_callback::ScheduleCallbackUseCase,
        },
    },
    config::Config,
    domain::repositories::{CallbackRequestRepository, RosterRepository},
    infrastructure::{
        repositories::{
            in_memory::{InMemoryCallbackRequestRepository, InMemoryRosterRepository, RosterSeed},
            postgres::{PgPool, PostgresCallbackRequestRepository, PostgresRosterRepository},
        },
        voice::http::HttpVoiceClient,
    },
    presentation::http::endpoints::{
        callbacks::CallbackEndpoints,
        health::HealthEndpoints,
        root::ApiState,
    },
};
use anyhow::Context;
use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;
use tokio::main;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[main]
async fn main() -> Result<(), Error> {
    let config = Config::try_parse().map_err(Error::other)?;
    init_tracing(&config.log_level);

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);

    let (callbacks, roster) = repositories(&config).await.map_err(Error::other)?;
    let provider = Arc::new(HttpVoiceClient::new(config.voice.clone()).map_err(Error::other)?);
    let scheduler = Arc::new(CallScheduler::new(
        callbacks.clone(),
        roster.clone(),
        provider,
        config.default_knowledge_base.clone(),
    ));

    let state = Arc::new(ApiState {
        create_callback_usecase: Arc::new(CreateCallbackUseCase::new(
            callbacks.clone(),
            roster,
            scheduler.clone(),
        )),
        schedule_callback_usecase: Arc::new(ScheduleCallbackUseCase::new(
            callbacks.clone(),
            scheduler,
        )),
        cancel_callback_usecase: Arc::new(CancelCallbackUseCase::new(callbacks.clone())),
        complete_callback_usecase: Arc::new(CompleteCallbackUseCase::new(callbacks.clone())),
        get_callback_usecase: Arc::new(GetCallbackUseCase::new(callbacks.clone())),
        list_callbacks_usecase: Arc::new(ListCallbacksUseCase::new(callbacks)),
        jwt: JwtService::new(JwtServiceConfig {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }),
    });

    info!("Starting server at {}", server_url);

    let api_service = OpenApiService::new(
        (HealthEndpoints, CallbackEndpoints::new(state)),
        "Callback Desk API",
        "0.1.0",
    )
    .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/", ui);

    Server::new(TcpListener::bind(format!("{}:{}", config.host, config.port)))
        .run(app)
        .await
}

async fn repositories(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CallbackRequestRepository>, Arc<dyn RosterRepository>)> {
    match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("using Postgres storage");
            let callbacks: Arc<dyn CallbackRequestRepository> =
                PostgresCallbackRequestRepository::new(pool.clone());
            let roster: Arc<dyn RosterRepository> = PostgresRosterRepository::new(pool);
            Ok((callbacks, roster))
        }
        None => {
            let Some(path) = &config.roster_seed else {
                anyhow::bail!("either DATABASE_URL or ROSTER_SEED must be set");
            };
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read roster seed {}", path.display()))?;
            let seed = RosterSeed::from_json(&raw)?;
            info!(
                students = seed.students.len(),
                teachers = seed.teachers.len(),
                assignments = seed.assignments.len(),
                "loaded roster seed"
            );
            let in_memory_roster = InMemoryRosterRepository::new();
            in_memory_roster.seed(seed).await?;

            warn!("DATABASE_URL not set; callback requests are kept in memory only");
            let callbacks: Arc<dyn CallbackRequestRepository> =
                Arc::new(InMemoryCallbackRequestRepository::new());
            let roster: Arc<dyn RosterRepository> = Arc::new(in_memory_roster);
            Ok((callbacks, roster))
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("callback_desk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

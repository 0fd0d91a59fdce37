use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use beneficiary_dedup::config::{LoggingSettings, Settings};
use beneficiary_dedup::core::DuplicateMatcher;
use beneficiary_dedup::routes::{self, duplicates::AppState};
use beneficiary_dedup::services::{
    AppwriteClient, AppwriteCollections, CachedRepository, PostgresClient, RecordRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST);
        HttpResponse::build(status).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Install the global tracing subscriber
///
/// `LOG_LEVEL` and `LOG_FORMAT` override the configured values.
fn init_logging(logging: &LoggingSettings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.init(),
    }
}

fn startup_error(what: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", what, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", what, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = Settings::load();

    let logging = loaded
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    info!("Starting beneficiary duplicate-matching service...");

    let settings = loaded.map_err(|e| startup_error("Failed to load configuration", e))?;

    let match_config = settings
        .matching
        .match_config()
        .map_err(|e| startup_error("Invalid matching configuration", e))?;

    info!("Configuration loaded successfully");

    // Initialize Appwrite client
    let collections = AppwriteCollections {
        participants: settings.collection.participants,
        households: settings.collection.households,
    };

    let appwrite = AppwriteClient::new(
        settings.appwrite.endpoint,
        settings.appwrite.api_key,
        settings.appwrite.project_id,
        settings.appwrite.database_id,
        collections,
        settings.matching.page_size,
    )
    .map_err(|e| startup_error("Failed to create Appwrite client", e))?;

    info!("Appwrite client initialized (page size: {})", settings.matching.page_size);

    // Snapshot caching is opt-in; without it every check is a full read
    let mut cache: Option<Arc<CachedRepository>> = None;
    let repository: Arc<dyn RecordRepository> = match settings.cache.snapshot_ttl_secs {
        0 => Arc::new(appwrite),
        ttl => {
            info!("Snapshot cache enabled (TTL: {}s)", ttl);
            let cached = Arc::new(CachedRepository::new(Arc::new(appwrite), ttl));
            cache = Some(cached.clone());
            cached
        }
    };

    // Initialize PostgreSQL client for the review log
    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await
        .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?,
    );

    info!("PostgreSQL client initialized");

    let matcher = DuplicateMatcher::new(match_config);

    info!("Matcher initialized with config: {:?}", match_config);

    let app_state = AppState {
        repository,
        cache,
        postgres,
        matcher,
        fetch_timeout: Duration::from_secs(settings.matching.fetch_timeout_secs),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

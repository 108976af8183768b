use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::{web, App, HttpServer};
use beats_backend::config::GameConfig;
use beats_backend::infra::state::build_state;
use beats_backend::middleware::cors::cors_middleware;
use beats_backend::middleware::rate_limit::{api_rate_limit_config, guess_rate_limit_config};
use beats_backend::middleware::request_trace::RequestTrace;
use beats_backend::middleware::structured_logger::StructuredLogger;
use beats_backend::middleware::trace_span::TraceSpan;
use beats_backend::routes;
use beats_backend::sessions::{spawn_idle_sweeper, stop_idle_sweeper};
use tokio_util::sync::CancellationToken;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment.
    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = config.require_oracle_url() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }

    let host = config.host.clone();
    let port = config.port;
    let origins = config.cors_allowed_origins.clone();
    let idle_ttl = config.session_idle_ttl;
    let sweep_every = config.session_sweep_interval;

    println!("🚀 Starting What Beats Rock backend on http://{}:{}", host, port);

    let app_state = match build_state().with_config(config).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!("✅ Stores ready ({})", app_state.store_backend);

    let shutdown = CancellationToken::new();
    let sweeper = spawn_idle_sweeper(
        app_state.sessions.clone(),
        idle_ttl,
        sweep_every,
        shutdown.clone(),
    );

    let data = web::Data::new(app_state);
    let guess_backend = InMemoryBackend::builder().build();
    let api_backend = InMemoryBackend::builder().build();

    let server = HttpServer::new(move || {
        let guess_limiter =
            RateLimiter::builder(guess_backend.clone(), guess_rate_limit_config().build())
                .add_headers()
                .build();
        let api_limiter =
            RateLimiter::builder(api_backend.clone(), api_rate_limit_config().build())
                .add_headers()
                .build();

        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .app_data(routes::json_config())
            .service(web::scope("/health").configure(routes::health::configure_routes))
            .service(
                web::scope("/api/games/guess")
                    .wrap(guess_limiter)
                    .route("", web::post().to(routes::games::submit_guess)),
            )
            .service(
                web::scope("/api/games")
                    .wrap(api_limiter)
                    .configure(routes::games::configure_routes),
            )
    })
    .bind((host.as_str(), port))?
    .run();

    let result = server.await;
    stop_idle_sweeper(&shutdown, sweeper).await;
    result
}

mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::analytics::{routes as analytics_routes, AnalyticsService, StatsService};
use crate::features::auth;
use crate::features::auth::routes as auth_routes;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::exports::{routes as exports_routes, ExportService};
use crate::features::health_checks::{
    routes as health_checks_routes, HealthCheckService, HealthMonitor,
};
use crate::features::links::{routes as links_routes, LinkService};
use crate::features::pages::{routes as pages_routes, PageService};
use crate::features::previews::{routes as previews_routes, PreviewService};
use crate::features::sitemap::{routes as sitemap_routes, SitemapService};
use crate::features::tags::{routes as tags_routes, TagService};
use crate::features::votes::{routes as votes_routes, VoteService};
use crate::shared::cache::CatalogCache;
use crate::shared::fetcher::{HttpFetcher, LinkFetcher};
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize auth
    let jwks_client = Arc::new(auth::JwksClient::new(
        &config.auth.issuer,
        config.auth.jwks_cache_ttl,
    ));
    let jwt_validator = Arc::new(auth::JwtValidator::new(
        jwks_client,
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
        config.auth.jwt_leeway,
        config.auth.roles_claim.clone(),
    ));
    tracing::info!("Auth configuration initialized");

    // Shared catalog cache (links and categories)
    let cache = Arc::new(CatalogCache::new(config.cache.catalog_ttl));
    tracing::info!(
        "Catalog cache initialized (ttl={}s)",
        config.cache.catalog_ttl.as_secs()
    );

    // Outbound HTTP client for health checks and previews
    let fetcher: Arc<dyn LinkFetcher> = Arc::new(
        HttpFetcher::new(&config.link_check)
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?,
    );

    // Catalog services
    let category_service = Arc::new(CategoryService::new(pool.clone(), Arc::clone(&cache)));
    let tag_service = Arc::new(TagService::new(pool.clone(), Arc::clone(&cache)));
    let link_service = Arc::new(LinkService::new(
        pool.clone(),
        Arc::clone(&cache),
        Arc::clone(&tag_service),
        Arc::clone(&category_service),
    ));
    let page_service = Arc::new(PageService::new(
        Arc::clone(&link_service),
        Arc::clone(&category_service),
        Arc::clone(&tag_service),
    ));
    let sitemap_service = Arc::new(SitemapService::new(
        Arc::clone(&category_service),
        Arc::clone(&tag_service),
        config.app.public_base_url.clone(),
    ));
    tracing::info!("Catalog services initialized");

    // Visitor interaction services
    let vote_service = Arc::new(VoteService::new(
        pool.clone(),
        Arc::clone(&cache),
        config.app.cookie_secure,
    ));
    let analytics_service = Arc::new(AnalyticsService::new(
        pool.clone(),
        config.app.cookie_secure,
    ));
    let stats_service = Arc::new(StatsService::new(pool.clone()));
    let export_service = Arc::new(ExportService::new(
        Arc::clone(&link_service),
        Arc::clone(&analytics_service),
    ));
    tracing::info!("Vote and analytics services initialized");

    // Link checking services
    let health_check_service = Arc::new(HealthCheckService::new(
        pool.clone(),
        Arc::clone(&fetcher),
        Arc::clone(&cache),
    ));
    let preview_service = Arc::new(PreviewService::new(
        pool.clone(),
        Arc::clone(&fetcher),
        Arc::clone(&cache),
    ));
    tracing::info!("Health check and preview services initialized");

    // Spawn the periodic health checker (if configured)
    if let Some(period) = config.link_check.health_check_interval {
        let monitor = HealthMonitor::new(Arc::clone(&health_check_service), period);
        tokio::spawn(async move {
            monitor.run().await;
        });
        tracing::info!(
            "Health monitor worker spawned (every {}s)",
            period.as_secs()
        );
    } else {
        tracing::info!("Health monitor disabled (HEALTH_CHECK_INTERVAL_SECS=0)");
    }

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(categories_routes::admin_routes(Arc::clone(&category_service)))
        .merge(tags_routes::admin_routes(Arc::clone(&tag_service)))
        .merge(links_routes::admin_routes(Arc::clone(&link_service)))
        .merge(health_checks_routes::admin_routes(Arc::clone(
            &health_check_service,
        )))
        .merge(previews_routes::admin_routes(Arc::clone(&preview_service)))
        .merge(analytics_routes::admin_routes(
            Arc::clone(&analytics_service),
            stats_service,
        ))
        .merge(exports_routes::admin_routes(export_service))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(pages_routes::routes(page_service))
        .merge(categories_routes::routes(category_service))
        .merge(tags_routes::routes(tag_service))
        .merge(links_routes::routes(link_service))
        .merge(votes_routes::routes(vote_service))
        .merge(analytics_routes::routes(analytics_service))
        .merge(health_checks_routes::routes(health_check_service))
        .merge(previews_routes::routes(preview_service))
        .merge(sitemap_routes::routes(sitemap_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}

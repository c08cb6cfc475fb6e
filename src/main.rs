use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header::{AUTHORIZATION, CONTENT_TYPE}, HeaderName, HeaderValue, Method, StatusCode},
    middleware,
    response::{Html, IntoResponse},
    routing::{get, post},
    Extension, Router,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stagegate::auth::{optional_auth_middleware, AuthenticatedUser, JwtService};
use stagegate::config::Config;
use stagegate::graphql::{create_schema, ApiSchema, DataLoaderContext};
use stagegate::notifier::BroadcastInvalidationSink;
use stagegate::services::{AppServices, UserService};

#[derive(Clone)]
struct AppState {
    schema: ApiSchema,
    db: DatabaseConnection,
    user_service: UserService,
    development: bool,
}

async fn graphql_handler(
    State(state): State<AppState>,
    Extension(user): Extension<Option<AuthenticatedUser>>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();

    if let Some(user) = user {
        request = request.data(user);
    }

    // Fresh loader per request so lead lookups never serve stale roles.
    request = request.data(DataLoaderContext::new(state.user_service.clone()));

    state.schema.execute(request).await.into()
}

async fn graphql_playground() -> impl IntoResponse {
    Html(r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Stagegate GraphQL Playground</title>
        <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/graphql-playground-react/build/static/css/index.css" />
    </head>
    <body>
        <div id="root"></div>
        <script src="https://cdn.jsdelivr.net/npm/graphql-playground-react/build/static/js/middleware.js"></script>
        <script>
            GraphQLPlayground.init(document.getElementById('root'), {
                endpoint: '/graphql'
            })
        </script>
    </body>
    </html>
    "#)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            warn!(error = %e, "Health check failed to reach database");
            (StatusCode::SERVICE_UNAVAILABLE, "DATABASE UNAVAILABLE")
        }
    }
}

async fn graphql_schema(State(state): State<AppState>) -> impl IntoResponse {
    if !state.development {
        return (StatusCode::NOT_FOUND, "Schema not available in production").into_response();
    }

    info!("Schema endpoint accessed in development mode");

    ([(CONTENT_TYPE, "application/graphql")], state.schema.sdl()).into_response()
}

fn cors_layer(origins: &str) -> CorsLayer {
    if origins.trim() == "*" {
        warn!("CORS set to accept ANY origin (*) - only use in development!");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stagegate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!("Starting stagegate in {} environment", config.environment);

    info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    info!("Database connected successfully");

    if config.auto_migrate {
        info!("Applying pending migrations");
        Migrator::up(&db, None).await?;
    }

    let sink = Arc::new(BroadcastInvalidationSink::new(256));
    let services = AppServices::new(db.clone(), sink, config.scoring);
    let jwt_service = JwtService::new(&config.jwt_secret);

    let app_state = AppState {
        schema: create_schema(&services),
        db,
        user_service: services.users.clone(),
        development: config.is_development(),
    };

    let app = Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/playground", get(graphql_playground))
        .route("/health", get(health))
        .route("/schema.graphql", get(graphql_schema))
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(middleware::from_fn_with_state(jwt_service, optional_auth_middleware))
        .with_state(app_state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server starting on http://{}", addr);
    info!("GraphQL Playground available at http://{}/playground", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

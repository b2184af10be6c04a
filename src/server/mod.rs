//! HTTP server for the blog

use anyhow::Result;
use axum::{
    extract::{Host, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentLoader, ContentRegistry, MarkdownRenderer};
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Cache policy for article pages: short browser cache, longer edge cache
const ARTICLE_CACHE_CONTROL: &str = "max-age=300, s-maxage=3600";

/// Shared state; built once at startup and immutable afterwards
pub struct AppState {
    pub config: SiteConfig,
    pub registry: ContentRegistry,
    pub renderer: MarkdownRenderer,
    pub templates: TemplateRenderer,
    pub articles_dir: PathBuf,
}

impl AppState {
    /// Scan content and set up the renderer and templates
    pub fn build(blog: &Blog) -> Result<Self> {
        let registry = ContentRegistry::scan(&blog.articles_dir)?;
        Ok(Self {
            config: blog.config.clone(),
            registry,
            renderer: MarkdownRenderer::new(),
            templates: TemplateRenderer::new()?,
            articles_dir: blog.articles_dir.clone(),
        })
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/posts/:slug", get(article))
        .nest_service("/articles", ServeDir::new(&state.articles_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::build(blog)?);
    tracing::info!("serving {} articles", state.registry.len());

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `GET /` - the index page listing all posts
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    match state
        .templates
        .render_index(&state.config, state.registry.posts())
    {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!("failed to render index: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /posts/:slug` - a rendered article, or 404 with no body
pub async fn article(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Host(host): Host,
) -> Response {
    let loader = ContentLoader::new(&state.registry, &state.renderer);

    let loaded = match loader.load(&slug, &host).await {
        Ok(article) => article,
        Err(ContentError::NotFound(_)) => {
            // not an application error; the standard not-found outcome
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(e) => {
            tracing::error!("failed to load article `{}`: {:#}", slug, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match state.templates.render_article(&state.config, &loaded) {
        Ok(page) => (
            [(header::CACHE_CONTROL, ARTICLE_CACHE_CONTROL)],
            Html(page),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to render article `{}`: {:#}", slug, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

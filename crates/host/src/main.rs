use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::Path,
    http::{header, Response, StatusCode},
    routing::get,
    Router,
};
use spyglass_host::activity::ActivityLog;
use spyglass_host::api;
use spyglass_host::config::Config;
use spyglass_host::embedded;
use spyglass_vfs::{Explorer, TargetList};
use tokio::signal;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_banner() {
    eprintln!();
    eprintln!("  \x1b[1;36mspyglass\x1b[0m v{VERSION} - remote file browsing in the browser");
    eprintln!();
}

fn print_connection_info(port: u16, bind: &str) {
    eprintln!("  \x1b[1;32m[http]\x1b[0m   Serving on port \x1b[1;96m{port}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[1;37m>\x1b[0m Open: \x1b[4;96mhttp://{bind}:{port}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mPress Ctrl+C to stop\x1b[0m");
    eprintln!();
}

/// Graceful start: Check if port is available
fn check_port_available(bind: &str, port: u16) -> bool {
    TcpListener::bind(format!("{bind}:{port}")).is_ok()
}

/// Graceful start: Find available port starting from default
fn find_available_port(bind: &str, start: u16) -> Option<u16> {
    (start..start + 10).find(|&port| check_port_available(bind, port))
}

/// Serve embedded static file
async fn serve_static(Path(path): Path<String>) -> Response<Body> {
    let path = if path.is_empty() {
        "index.html".to_string()
    } else {
        path
    };

    match embedded::get_asset(&path) {
        Some((data, mime)) => {
            // Use application/javascript for .js files (override detected mime)
            let content_type = if std::path::Path::new(&path)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("js"))
            {
                "application/javascript"
            } else {
                mime
            };

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CACHE_CONTROL, "public, max-age=3600")
                .body(Body::from(data))
                .unwrap()
        }
        None => {
            // Fallback to index.html for SPA routing
            if let Some((data, mime)) = embedded::get_asset("index.html") {
                Response::builder()
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, mime)
                    .body(Body::from(data))
                    .unwrap()
            } else {
                Response::builder()
                    .status(StatusCode::NOT_FOUND)
                    .body(Body::from("Not Found"))
                    .unwrap()
            }
        }
    }
}

/// Serve index.html at root
async fn serve_index() -> Response<Body> {
    match embedded::get_asset("index.html") {
        Some((data, mime)) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime)
            .body(Body::from(data))
            .unwrap(),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("index.html not found"))
            .unwrap(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    eprintln!();
    eprintln!("  \x1b[1;33m[stop]\x1b[0m   Graceful shutdown initiated...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging (tracing)
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    // Handle --version and --help
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("spyglass {VERSION}");
                return Ok(());
            }
            "--help" | "-h" => {
                println!("spyglass - remote file browsing in the browser");
                println!();
                println!("USAGE:");
                println!("    spyglass [ALLOWED_DIR]");
                println!();
                println!("ARGS:");
                println!("    ALLOWED_DIR      Write-protected root directory (optional)");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version");
                println!();
                println!("CONFIG:");
                println!("    ~/.config/spyglass/config.toml");
                return Ok(());
            }
            _ => {}
        }
    }

    print_banner();

    // === LOAD CONFIGURATION ===
    Config::create_default_if_missing();
    let config = Config::load();
    eprintln!(
        "  \x1b[1;32m[config]\x1b[0m Loaded from {}",
        Config::default_config_path().display()
    );

    // CLI argument overrides the configured allowed directory.
    let allowed_dir = args
        .get(1)
        .filter(|a| !a.starts_with('-'))
        .cloned()
        .or_else(|| config.explorer.allowed_dir.clone())
        .map(PathBuf::from);
    if let Some(dir) = &allowed_dir {
        eprintln!(
            "  \x1b[1;32m[root]\x1b[0m   Allowed directory: {}",
            dir.display()
        );
    }

    // === GRACEFUL START ===
    let port = if check_port_available(&config.server.bind, config.server.http_port) {
        config.server.http_port
    } else {
        eprintln!(
            "  \x1b[1;33m[warn]\x1b[0m   Port {} in use, finding alternative...",
            config.server.http_port
        );
        match find_available_port(&config.server.bind, config.server.http_port + 1) {
            Some(p) => {
                eprintln!("  \x1b[1;32m[check]\x1b[0m  Using HTTP port {p}");
                p
            }
            None => {
                eprintln!(
                    "  \x1b[1;31m[error]\x1b[0m  No available ports in range {}-{}",
                    config.server.http_port,
                    config.server.http_port + 10
                );
                std::process::exit(1);
            }
        }
    };

    // Explorer + target watch list
    let targets = TargetList::load(&config.explorer.targets_file);
    let explorer = Arc::new(RwLock::new(Explorer::new(allowed_dir, targets)));
    let log = Arc::new(ActivityLog::new());

    print_connection_info(port, &config.server.bind);

    // === START EMBEDDED HTTP SERVER (axum) ===
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app_state = api::AppState { explorer, log };

    let app = Router::new()
        .route("/", get(serve_index))
        .route("/*path", get(serve_static))
        .nest("/api", api::api_router())
        .with_state(app_state)
        .layer(cors);

    let addr = format!("{}:{}", config.server.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("  \x1b[1;32m[done]\x1b[0m   Stopped.");
    eprintln!();

    Ok(())
}

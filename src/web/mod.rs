//! Local viewer server for the dashboard.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that renders the
//! dashboard page against the configured backend on every request. It is a
//! viewer for the remote monitoring backend, not the backend itself:
//!
//! - `GET /` — run the full load chain and return the rendered page
//! - `POST /optimize` (also accepted as GET, for the button form) — run the
//!   optimize flow and return the page with the result; the page reloads to
//!   `/` after the configured delay
//!
//! Launched via `qdash serve` (default: `http://127.0.0.1:9810`).

use std::io::Cursor;
use std::time::Duration;

use anyhow::Result;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::api::HttpClient;
use crate::config::QdashConfig;
use crate::dashboard::Dashboard;
use crate::render::page;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the viewer server on the given address.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user dashboard). Gracefully handles errors per-request
/// without crashing the server.
pub fn serve(addr: &str, config: &QdashConfig) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("qdash viewer running at http://{addr}");
    println!("Backend: {}", config.backend.url);
    println!("Press Ctrl+C to stop.\n");

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let result = dispatch(&method, &url, config);

        match result {
            Ok(resp) => {
                let _ = request.respond(resp);
            }
            Err(e) => {
                let body = serde_json::json!({ "error": e.to_string() }).to_string();
                let resp = Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                let _ = request.respond(resp);
            }
        }

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(method: &Method, url: &str, config: &QdashConfig) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_dashboard(config)),
        (&Method::Post, "/optimize") | (&Method::Get, "/optimize") => Ok(serve_optimize(config)),
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Run the full load chain and render the page.
fn serve_dashboard(config: &QdashConfig) -> Response<Cursor<Vec<u8>>> {
    let client = HttpClient::from_config(&config.backend);
    let mut dash = Dashboard::new(client, Duration::ZERO);
    dash.refresh();

    let view = dash.into_view();
    let html = page::render_page(&config.dashboard.title, view.panel(), view.ia_panel());
    html_response(html)
}

/// Run the optimize flow and render the page with the result appended.
///
/// The delayed full reload happens in the browser: the returned page
/// carries a meta refresh back to `/` after the configured delay.
fn serve_optimize(config: &QdashConfig) -> Response<Cursor<Vec<u8>>> {
    let client = HttpClient::from_config(&config.backend);
    let mut dash = Dashboard::new(client, Duration::ZERO);
    dash.refresh();
    dash.run_optimization_no_reload();

    let reload_secs = config.dashboard.reload_delay_ms.div_ceil(1000);
    let view = dash.into_view();
    let html = page::render_reloading_page(
        &config.dashboard.title,
        view.panel(),
        view.ia_panel(),
        reload_secs,
    );
    html_response(html)
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn html_response(html: String) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(html.into_bytes())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

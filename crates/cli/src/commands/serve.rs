use anyhow::{Context, Result};
use axum::Router;
use blog_mirror_core::load_config;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tower_http::services::{ServeDir, ServeFile};

/// Routes for the preview server: static files from the site directory,
/// `index.html` for directories, `404.html` for anything else.
fn router(site_dir: &Path) -> Router {
    let not_found = ServeFile::new(site_dir.join("404.html"));
    Router::new().fallback_service(ServeDir::new(site_dir).not_found_service(not_found))
}

/// Serve the generated site for local preview
pub async fn run(config_path: PathBuf, port: Option<u16>) -> Result<()> {
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let site_dir = config.paths.output_dir.clone();
    let port = port.unwrap_or(config.serve.port);

    if !site_dir.exists() {
        anyhow::bail!(
            "Site directory does not exist: {}\nRun 'blog-mirror generate' first",
            site_dir.display()
        );
    }

    println!("🌐 Starting preview server...");
    println!("   Site: {}", site_dir.display());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    axum::serve(listener, router(&site_dir))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "accueil").unwrap();
        fs::write(dir.path().join("404.html"), "introuvable").unwrap();
        fs::create_dir_all(dir.path().join("mon-article")).unwrap();
        fs::write(dir.path().join("mon-article/index.html"), "article").unwrap();
        dir
    }

    async fn get(dir: &Path, uri: &str) -> (StatusCode, String) {
        let response = router(dir)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_serves_index_for_directories() {
        let dir = site();
        assert_eq!(get(dir.path(), "/").await, (StatusCode::OK, "accueil".to_string()));
        assert_eq!(
            get(dir.path(), "/mon-article/").await,
            (StatusCode::OK, "article".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_404_page() {
        let dir = site();
        assert_eq!(
            get(dir.path(), "/nulle-part/").await,
            (StatusCode::NOT_FOUND, "introuvable".to_string())
        );
    }
}

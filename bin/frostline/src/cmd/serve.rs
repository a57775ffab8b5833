//! Serve command - previews a frozen site

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use tokio::net::TcpListener;

use crate::server::create_router;

/// Run the serve command.
pub async fn run(dir: &Path, port: u16) -> Result<()> {
    if !dir.is_dir() {
        bail!(
            "Directory not found: {} (run `frostline freeze` first)",
            dir.display()
        );
    }

    let app = create_router(dir);
    let addr = format!("127.0.0.1:{port}");

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Serving {} at http://{addr}", dir.display());
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}

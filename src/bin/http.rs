#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use resourceflow::{Config, Snapshot, http_api, load_snapshot_from_json, telemetry};

    let config = Config::from_env()?;
    telemetry::init_tracing(&config.logging());

    let addr = config.socket_addr()?;
    let snapshot = match &config.snapshot_path {
        Some(path) => load_snapshot_from_json(path)?,
        None => Snapshot::default(),
    };

    println!("resourceflow HTTP API listening on http://{addr}");
    http_api::serve(addr, snapshot).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}

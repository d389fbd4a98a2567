#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use critical_path::logging::init_logging;
    use critical_path::{ProjectRegistry, ServerConfig, http_api, load_projects_from_json};
    use tracing::info;

    let config = ServerConfig::from_env()?;
    init_logging(config.log_level.as_deref());

    let registry = match &config.seed {
        Some(path) => {
            let projects = load_projects_from_json(path)?;
            info!(path = %path.display(), projects = projects.len(), "seed loaded");
            ProjectRegistry::from_projects(projects)
        }
        None => ProjectRegistry::new(),
    };

    info!(
        addr = %config.addr,
        policy = config.options.date_range_policy.as_str(),
        "critical-path HTTP API listening"
    );
    http_api::serve(config.addr, registry, config.options).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}

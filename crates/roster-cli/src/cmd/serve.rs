use anyhow::Context;
use roster_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, port: Option<u16>, open_browser: bool) -> anyhow::Result<()> {
    let port = match port {
        Some(p) => p,
        None => Config::load(root).context("failed to read config.yaml")?.server.port,
    };
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(roster_server::serve(root.to_path_buf(), port, open_browser))
}

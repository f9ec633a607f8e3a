mod host;

use std::io;
use std::path::PathBuf;

use bridge_logging::bridge_info;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = host::config::load(config_path.as_deref())?;
    host::logging::initialize(config.log_destination);

    let stdout = io::stdout();
    let summary = host::app::run(&config, &mut stdout.lock())?;
    bridge_info!("Demo finished after {} renders", summary.frames.len());
    Ok(())
}

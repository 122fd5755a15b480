use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env};

/// Set up `env_logger`, `RUST_LOG` overrides the `info` default.
/// With a directory the lines are appended to `<log_dir>/louvain.log`,
/// otherwise they go to stderr.
pub fn init_logger(log_dir: Option<&Path>) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{:<5}] {} - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(log_dir) = log_dir {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("louvain.log"))
            .context("failed to open log file")?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.try_init().context("logger already initialized")?;
    Ok(())
}

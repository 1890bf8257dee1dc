//! Host-side preview: `cargo run` builds the wasm package into `static/pkg`
//! and serves `static/` locally so the background can be checked in a
//! browser.
//!
//! Usage: `cargo run -- [--port N] [--skip-wasm]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    preview::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod preview {
    use std::process::{Command, Stdio};

    use anyhow::{bail, Context};
    use clap::Parser;

    /// Build the wasm package and serve the preview page.
    #[derive(Debug, Parser)]
    #[command(name = "ambient_scene", version)]
    pub struct Args {
        /// Port for the local HTTP server.
        #[arg(long, default_value_t = 8000)]
        pub port: u16,

        /// Serve whatever is already in static/pkg.
        #[arg(long)]
        pub skip_wasm: bool,
    }

    fn build_wasm() -> anyhow::Result<()> {
        log::info!("building wasm package into static/pkg");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .status();
        match status {
            Ok(st) if st.success() => Ok(()),
            Ok(st) => bail!("wasm-pack exited with {st}"),
            Err(err) => {
                log::warn!("wasm-pack not runnable ({err}); serving whatever is in static/pkg");
                Ok(())
            }
        }
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        if !args.skip_wasm {
            build_wasm()?;
        }

        log::info!("serving static/ at http://127.0.0.1:{}", args.port);
        let status = Command::new("python3")
            .args(["-m", "http.server", &args.port.to_string(), "--directory", "static"])
            .stdout(Stdio::null())
            .status()
            .context("failed to start python3 http.server")?;
        if !status.success() {
            bail!("http server exited with {status}");
        }
        Ok(())
    }
}

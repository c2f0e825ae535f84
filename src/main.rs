//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves `static/` locally.

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::process::{Command, Stdio};

    use anyhow::{bail, Context, Result};

    const PORT: u16 = 8000;

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
        build_wasm()?;
        serve()
    }

    fn build_wasm() -> Result<()> {
        log::info!("building wasm pkg");
        match Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .status()
        {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => bail!(
                "wasm-pack exited with {}; ensure wasm-pack is installed \
                 (https://rustwasm.github.io/wasm-pack/)",
                status
            ),
            Err(_) => {
                log::warn!("wasm-pack not found in PATH; the site may serve stale artifacts");
                Ok(())
            }
        }
    }

    fn serve() -> Result<()> {
        log::info!("serving static/ at http://127.0.0.1:{}/", PORT);
        let status = Command::new("python3")
            .args(["-m", "http.server", &PORT.to_string(), "--directory", "static"])
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .context("failed to start http server")?;
        if !status.success() {
            bail!("http server exited with {}", status);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

// Only meaningful on non-wasm targets.
#[cfg(target_arch = "wasm32")]
fn main() {}

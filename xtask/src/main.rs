use clap::{Parser, Subcommand, ValueEnum};
use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Command, ExitCode},
};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Open the windowed `quill` demo
    Window {
        /// Graphics backend to compile in; wgpu picks one when omitted
        #[arg(long, value_enum)]
        backend: Option<Backend>,
        #[arg(long)]
        release: bool,
        /// Serve a wasm build through trunk, forcing the webgl backend
        #[arg(long)]
        wasm: bool,
    },
    /// Run the headless batching stress demo
    Stress {
        /// Index capacity of every batch buffer
        #[arg(long, default_value_t = 1_000)]
        capacity: usize,
        #[arg(long)]
        dots: Option<usize>,
        #[arg(long)]
        outline: Option<usize>,
        #[arg(long)]
        frames: Option<u32>,
        #[arg(long)]
        release: bool,
    },
    /// Test the workspace, then the renderer again with release assertions off
    Test,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Backend {
    Vulkan,
    Gles,
    Webgl,
}

impl Backend {
    fn feature(self) -> &'static str {
        match self {
            Backend::Vulkan => "vulkan",
            Backend::Gles => "gles",
            Backend::Webgl => "webgl",
        }
    }
}

impl Cmd {
    fn run(&self) -> io::Result<bool> {
        match *self {
            Cmd::Window {
                backend,
                release,
                wasm,
            } => {
                if wasm {
                    serve_wasm(release)
                } else {
                    let mut cmd = cargo(&["run", "--bin", "quill"], release);
                    if let Some(backend) = backend {
                        cmd.args(["--features", backend.feature()]);
                    }
                    status(cmd)
                }
            }
            Cmd::Stress {
                capacity,
                dots,
                outline,
                frames,
                release,
            } => {
                let mut cmd = cargo(&["run", "-p", "demo_quill_batch_stress"], release);
                cmd.arg("--")
                    .args(stress_args(capacity, dots, outline, frames));
                status(cmd)
            }
            Cmd::Test => Ok(status(cargo(&["test", "--workspace"], false))?
                && status(cargo(&["test", "-p", "quill_render"], true))?),
        }
    }
}

fn cargo(args: &[&str], release: bool) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(args);
    if release {
        cmd.arg("--release");
    }
    cmd
}

fn stress_args(
    capacity: usize,
    dots: Option<usize>,
    outline: Option<usize>,
    frames: Option<u32>,
) -> Vec<String> {
    let mut args = vec!["--capacity".to_string(), capacity.to_string()];
    let optional = [
        ("--dots", dots.map(|n| n.to_string())),
        ("--outline", outline.map(|n| n.to_string())),
        ("--frames", frames.map(|n| n.to_string())),
    ];
    for (flag, value) in optional {
        if let Some(value) = value {
            args.extend([flag.to_string(), value]);
        }
    }
    args
}

fn index_html(bin: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width,initial-scale=1">
    <link data-trunk rel="rust" href="{root}/Cargo.toml" data-bin="{bin}" data-cargo-features="{feature}"/>
    <style>body{{margin:0}}canvas{{display:block;width:100vw;height:100vh}}</style>
  </head>
</html>"#,
        root = workspace_root().display(),
        feature = Backend::Webgl.feature(),
    )
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn serve_wasm(release: bool) -> io::Result<bool> {
    let dir = workspace_root().join("target").join("xtask");
    fs::create_dir_all(&dir)?;
    let index_path = dir.join("index.html");
    fs::write(&index_path, index_html("quill"))?;

    let cleanup = index_path.clone();
    ctrlc::set_handler(move || {
        _ = fs::remove_file(&cleanup);
        std::process::exit(130);
    })
    .map_err(io::Error::other)?;

    let mut cmd = Command::new("trunk");
    cmd.arg("serve").arg(&index_path);
    if release {
        cmd.arg("--release");
    }
    let ok = status(cmd);
    _ = fs::remove_file(&index_path);
    ok
}

fn status(mut cmd: Command) -> io::Result<bool> {
    println!("> {cmd:?}");
    Ok(cmd.status()?.success())
}

fn main() -> ExitCode {
    match Cli::parse().cmd.run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("xtask: {e}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stress_args_forward_only_given_flags() {
        assert_eq!(stress_args(64, None, None, None), ["--capacity", "64"]);
        assert_eq!(
            stress_args(1000, Some(50), None, Some(2)),
            ["--capacity", "1000", "--dots", "50", "--frames", "2"]
        );
    }

    #[test]
    fn backends_map_to_crate_features() {
        for backend in Backend::value_variants() {
            let name = backend.to_possible_value().map(|v| v.get_name().to_owned());
            assert_eq!(name.as_deref(), Some(backend.feature()));
        }
    }

    #[test]
    fn window_command_parses_backend() {
        let cli = Cli::try_parse_from(["xtask", "window", "--backend", "gles"]).unwrap();
        assert!(matches!(
            cli.cmd,
            Cmd::Window {
                backend: Some(Backend::Gles),
                wasm: false,
                ..
            }
        ));
    }

    #[test]
    fn index_links_the_webgl_build() {
        let html = index_html("quill");
        assert!(html.contains(r#"data-bin="quill""#));
        assert!(html.contains(r#"data-cargo-features="webgl""#));
    }
}

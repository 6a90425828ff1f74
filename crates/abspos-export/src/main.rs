//! Command-line exporter: reads a saved layout and prints one export tab.
//!
//! ```text
//! abspos-export [--tab css|html|combined] [--percent] [--no-comments]
//!               [--minify] [--prefix <p>] <element-storage.json>
//! ```
//!
//! Log output is controlled with `RUST_LOG` (default `warn`).

use abspos_core::lint::{LintSeverity, lint_elements};
use abspos_core::options::CssOptions;
use abspos_editor::export::{ExportTab, render_tab};
use abspos_editor::persist::FileStorage;
use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;

const USAGE: &str = "usage: abspos-export [--tab css|html|combined] [--percent] [--no-comments] \
[--minify] [--prefix <p>] <element-storage.json>";

struct Args {
    tab: ExportTab,
    options: CssOptions,
    path: PathBuf,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut tab = ExportTab::default();
    let mut options = CssOptions::default();
    let mut path = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tab" => {
                let name = args.next().context("--tab needs a value")?;
                tab = name.parse().map_err(|e: String| anyhow!(e))?;
            }
            "--percent" => options.use_pixels = false,
            "--no-comments" => options.include_comments = false,
            "--minify" => options.format_output = false,
            "--prefix" => {
                options.prefix = args.next().context("--prefix needs a value")?;
                options.include_prefix = true;
            }
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown flag `{flag}`\n{USAGE}"),
            file => {
                if path.replace(PathBuf::from(file)).is_some() {
                    bail!("only one layout file may be given\n{USAGE}");
                }
            }
        }
    }

    let path = path.ok_or_else(|| anyhow!("missing layout file\n{USAGE}"))?;
    Ok(Args { tab, options, path })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let elements = FileStorage::at(&args.path)
        .load()
        .with_context(|| format!("reading {}", args.path.display()))?;
    log::info!("loaded {} elements from {}", elements.len(), args.path.display());

    for diag in lint_elements(&elements) {
        match diag.severity {
            LintSeverity::Warning => log::warn!("[{}] {}", diag.rule, diag.message),
            LintSeverity::Info => log::info!("[{}] {}", diag.rule, diag.message),
        }
    }

    println!("{}", render_tab(args.tab, &elements, &args.options));
    Ok(())
}

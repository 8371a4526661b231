use std::io::{self, Write};

use anyhow::{Result, bail};
use tracing::info;

use histhound::{cli, config, export, history, locate, logging, prompt, snapshot};

fn main() -> Result<()> {
    logging::init_logging();

    let cli_opts = cli::parse();
    let loaded = config::load_config(cli_opts.config_path.as_deref())?;
    let cfg = loaded.config;
    info!("config hash {}", loaded.config_hash);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let browser = match cli_opts.browser {
        Some(browser) => browser,
        None if cli_opts.non_interactive => {
            bail!("--browser is required with --non-interactive")
        }
        None => match prompt::prompt_browser(&mut input, &mut output)? {
            Some(browser) => browser,
            None => bail!("invalid browser choice"),
        },
    };

    let limit = match cli_opts.limit.as_deref() {
        Some(raw) => prompt::parse_limit(raw),
        None if cli_opts.non_interactive => None,
        None => prompt::prompt_limit(&mut input, &mut output)?,
    };

    let home = locate::home_dir()?;

    let src = match cli_opts.db {
        Some(path) => {
            if !path.is_file() {
                bail!("history database not found: {}", path.display());
            }
            path
        }
        None => {
            info!("searching for {} history", browser.label());
            match locate::locate_history_db(browser, &cfg, &home)? {
                Some(path) => path,
                None => bail!("{} history not found in any profile", browser.label()),
            }
        }
    };
    info!("history database at {}", src.display());

    let snapshot_path = home.join(&cfg.snapshot_name);
    snapshot::snapshot_db(&src, &snapshot_path)?;
    info!("working copy at {}", snapshot_path.display());

    let records = history::extract_history(&snapshot_path, browser, limit)?;

    writeln!(output, "\n=== Showing {} history entries ===", records.len())?;
    for record in &records {
        writeln!(
            output,
            "{}  -->  {}",
            history::format_visit_time(record.visit_time),
            record.url
        )?;
    }

    let export_path = match cli_opts.export {
        Some(path) => Some(path),
        None if cli_opts.non_interactive => None,
        None => {
            writeln!(output)?;
            if prompt::prompt_export(&mut input, &mut output)? {
                Some(home.join(&cfg.export_name))
            } else {
                None
            }
        }
    };

    if let Some(path) = export_path {
        export::export_records(&records, &path, cli_opts.format)?;
        info!("exported {} records to {}", records.len(), path.display());
    }

    Ok(())
}

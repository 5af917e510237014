use autoapprove::{DryRun, Mode, RunReport, Settings, parse_args, run};
use tracing::{info, warn};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn execute(settings: &Settings, mode: Mode) -> RunReport {
    match mode {
        Mode::Execute(gh) => run(&gh, settings).await,
        Mode::DryRun(gh) => run(&DryRun::stdout(gh), settings).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let (settings, mode) = match parse_args(std::env::args_os()) {
        Ok(result) => result,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let report = execute(&settings, mode).await;

    if report.is_empty() {
        warn!("No pull requests found");
    } else {
        info!("{report}");
    }

    Ok(())
}

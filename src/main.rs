use storefront_admin::app::{self, App};
use storefront_admin::logger::*;
use storefront_admin::settings::*;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let app = App::try_new(&project_settings)?;
    let lifetime = app.lifetime();

    let output = tokio::select! {
        result = app::run(&app, cli.command) => result?,
        _ = signal::ctrl_c() => {
            lifetime.cancel();
            warn!("interrupted");
            return Ok(());
        }
    };

    println!("{}", output);
    Ok(())
}

use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use party_planner::auth::TokenContext;
use party_planner::db::{migrations, DbInterface};
use party_planner::settings::Settings;
use party_planner::{cli, configure_app, settings};
use std::net::Ipv6Addr;

#[actix_web::main]
async fn main() {
    if let Err(err) = run().await {
        if log::log_enabled!(log::Level::Error) {
            log::error!("Crashed with error: {:?}", err);
        } else {
            eprintln!("Crashed with error: {:?}", err);
        }

        std::process::exit(-1);
    }
}

async fn run() -> Result<()> {
    let args = cli::parse_args()?;

    setup_logging(&args)?;

    let settings = Settings::load(&args.config)
        .context("Failed to load settings, is DATABASE_URL set?")?;

    log::info!("Starting Party Planner API");

    migrations::start_migration(&settings.database.url)
        .await
        .context("Failed to migrate database")?;

    if !args.server_should_start() {
        log::info!("Database schema created");
        return Ok(());
    }

    let db_ctx = Data::new(
        DbInterface::connect(&settings.database).context("Failed to connect to database")?,
    );
    let token_ctx = Data::new(TokenContext::new(settings.jwt.secret.clone()));

    let cors = settings.http.cors.clone();

    let http_server = HttpServer::new(move || {
        App::new()
            .wrap(setup_cors(&cors))
            .configure(configure_app(db_ctx.clone(), token_ctx.clone()))
    });

    let address = (Ipv6Addr::UNSPECIFIED, settings.http.port);

    let http_server = http_server
        .bind(address)
        .with_context(|| format!("Failed to bind http server to [::]:{}", settings.http.port))?;

    log::info!("Startup finished");

    http_server.run().await?;

    Ok(())
}

fn setup_cors(settings: &settings::Cors) -> Cors {
    let mut cors = Cors::default().allow_any_header().allow_any_method();

    if settings.allowed_origin.is_empty() {
        cors = cors.allow_any_origin();
    } else {
        for origin in &settings.allowed_origin {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

fn setup_logging(args: &cli::Args) -> Result<()> {
    let log_level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log_level);

    let dispatch = match &args.logoutput {
        Some(path) if path.as_os_str() != "-" => dispatch
            .chain(fern::log_file(path).context("Failed to open log file")?),
        _ => dispatch.chain(std::io::stdout()),
    };

    dispatch.apply().context("Failed to setup logging utility")
}

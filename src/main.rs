use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::Path;
use wedding_planner::config::cli::{Cli, Command};
use wedding_planner::core::maps;
use wedding_planner::domain::model::{Field, SortDirection, SortDirective};
use wedding_planner::pages::{self, PageContext, Route, VenuesView};
use wedding_planner::utils::error::{ErrorSeverity, PlannerError};
use wedding_planner::utils::{logger, validation::Validate};
use wedding_planner::{
    export, AppConfig, GooglePlaces, LocationImages, Session, SupabaseAuth, SupabaseClient,
    SupabaseVenueStore, VenueBook,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting wedding-planner");
    tracing::debug!("Command: {:?}", cli.command);

    let config = match cli.load_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(e.severity()));
        }
    };

    if let Err(e) = run(&cli, &config).await {
        match e.downcast_ref::<PlannerError>() {
            Some(planner) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    planner,
                    planner.category(),
                    planner.severity()
                );
                eprintln!("❌ {}", planner.user_friendly_message());
                eprintln!("💡 {}", planner.recovery_suggestion());
                let code = exit_code(planner.severity());
                if code > 0 {
                    std::process::exit(code);
                }
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    match &cli.command {
        Command::Resolve { reference } => {
            let resolved = maps::resolve_place(reference).ok_or_else(|| {
                let message = if maps::is_short_url(reference) {
                    format!("'{}' is a short link; open it in a browser and use the full URL", reference)
                } else if maps::looks_like_map_url(reference) {
                    format!("no coordinates found in map URL '{}'", reference)
                } else {
                    format!("'{}' is neither a map URL nor a \"lat,lng\" pair", reference)
                };
                PlannerError::ValidationError { message }
            })?;
            if let Some(name) = &resolved.place_name {
                tracing::info!("📍 {}", name);
            }
            println!("{}", resolved.coordinate);
        }
        Command::Venues { sort, desc, lang } => {
            let session = open_session(cli, config).await?;
            let book = venue_book(config, &session)?;
            let sort = SortDirective {
                column: sort.unwrap_or(Field::Price),
                direction: if *desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                },
            };
            let view = VenuesView::new(&book.list().await?, Some(sort));
            println!("{}", pages::plain_table(lang.unwrap_or(config.default_language), &view));
        }
        Command::Add(args) => {
            let session = open_session(cli, config).await?;
            venue_book(config, &session)?.add(args.clone().into()).await?;
            println!("✅ Venue added");
        }
        Command::Edit { id, venue } => {
            let session = open_session(cli, config).await?;
            venue_book(config, &session)?.edit(id, venue.clone().into()).await?;
            println!("✅ Venue {} updated", id);
        }
        Command::Delete { id } => {
            let session = open_session(cli, config).await?;
            venue_book(config, &session)?.remove(id).await?;
            println!("🗑️ Venue {} deleted", id);
        }
        Command::Export { output } => {
            let session = open_session(cli, config).await?;
            let venues = venue_book(config, &session)?.list().await?;
            let count = match output {
                Some(path) => {
                    let file = std::fs::File::create(path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    export::venues_to_csv(&venues, file)?
                }
                None => export::venues_to_csv(&venues, std::io::stdout().lock())?,
            };
            tracing::info!("📁 Exported {} venues", count);
        }
        Command::Render { route, lang, output } => {
            let route: Route = route
                .parse()
                .map_err(|message| PlannerError::ValidationError { message })?;
            let lang = lang.unwrap_or(config.default_language);

            let session = match config.require_supabase() {
                Ok(()) => Some(open_session(cli, config).await?),
                Err(e) => {
                    tracing::warn!("Rendering without a session: {}", e);
                    None
                }
            };
            let user = session.as_ref().and_then(|s| s.user());
            let error = session.as_ref().and_then(|s| s.error());

            let view = match (&session, &user, route) {
                (Some(session), Some(_), Route::Venues) => {
                    let venues = venue_book(config, session)?.list().await?;
                    let places = GooglePlaces::with_base_url(
                        &config.google_maps_base_url,
                        &config.google_maps_api_key,
                        config.request_timeout_seconds,
                    );
                    let images =
                        LocationImages::new(places, &config.google_maps_api_key, config.load_policy());
                    let found = images.for_venues(&venues).await;
                    Some(VenuesView::new(&venues, Some(SortDirective::ascending(Field::Price))).with_images(found))
                }
                _ => None,
            };

            let ctx = PageContext::new(lang, user.as_ref()).with_error(error.as_deref());
            let html = pages::render(route, &ctx, view.as_ref()).into_string();
            write_output(output.as_deref(), &html)?;
        }
        Command::SignUp => {
            let (email, password) = cli
                .credentials()
                .ok_or(PlannerError::ValidationError {
                    message: "--email and --password are required".to_string(),
                })?;
            let session = Session::new(auth_provider(config)?);
            let user = session.sign_up(email, password).await?;
            match session.error() {
                Some(pending) => println!("📧 {}", pending),
                None => println!("✅ Account created for {}", user.email),
            }
        }
        Command::SignOut => {
            let session = Session::new(auth_provider(config)?);
            session.restore().await?;
            session.sign_out().await?;
            println!("👋 Signed out");
        }
    }

    Ok(())
}

fn auth_provider(config: &AppConfig) -> Result<SupabaseAuth, PlannerError> {
    config.require_supabase()?;
    let auth = SupabaseAuth::new(SupabaseClient::from_config(config));
    Ok(match &config.session_file {
        Some(path) => auth.with_session_file(path),
        None => auth,
    })
}

/// Restores a saved session, then signs in with the command line
/// credentials when given.
async fn open_session(cli: &Cli, config: &AppConfig) -> Result<Session<SupabaseAuth>, PlannerError> {
    let session = Session::new(auth_provider(config)?);
    session.restore().await?;
    if let Some((email, password)) = cli.credentials() {
        session.sign_in(email, password).await?;
    }
    Ok(session)
}

fn venue_book(
    config: &AppConfig,
    session: &Session<SupabaseAuth>,
) -> Result<VenueBook<SupabaseVenueStore>, PlannerError> {
    let token = session.access_token().ok_or(PlannerError::NotSignedIn)?;
    let store = SupabaseVenueStore::new(SupabaseClient::from_config(config)).with_access_token(token);
    Ok(VenueBook::new(store))
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!("📁 Output saved to: {}", path.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(content.as_bytes())?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

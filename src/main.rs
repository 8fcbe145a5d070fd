use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use chrono::{Local, Utc};
use clap::Parser;
use log::{error, info};

use incident_monitor::{
    config::CONFIG,
    seed::seed,
    store::Store,
    timeline::Timeline,
    web::{self, AppState},
};

lazy_static::lazy_static! {
    static ref ARGS: Args = Args::parse();
}

/// Camera incident review dashboard
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Populates the store with demo cameras and incidents for today, then exits
    #[clap(short, long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lazy_static::initialize(&ARGS);

    env_logger::Builder::new()
        .parse_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let store = Arc::new(
        Store::open(&CONFIG.store_path)
            .await
            .with_context(|| format!("failed to open store '{}'", CONFIG.store_path.display()))?,
    );

    if ARGS.seed {
        let day_start = Local::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|x| x.and_local_timezone(Local).earliest())
            .map(|x| x.with_timezone(&Utc))
            .ok_or_else(|| anyhow!("local midnight does not exist today"))?;
        seed(
            &store,
            &mut rand::thread_rng(),
            day_start,
            CONFIG.seed.incident_count,
        )
        .await?;
        return Ok(());
    }

    if let Some(prometheus_bind) = CONFIG.prometheus_bind {
        prometheus_exporter::start(prometheus_bind).context("failed to load prometheus_exporter")?;
    }

    let timeline = Timeline::with_offset_minutes(CONFIG.timeline.utc_offset_minutes)
        .ok_or_else(|| anyhow!("timeline utc offset must be within a day"))?;
    let state = AppState {
        store,
        web_base: CONFIG.web_base.clone(),
        timeline,
    };

    async fn run(state: AppState) -> anyhow::Result<()> {
        let server = axum::Server::try_bind(&CONFIG.web_bind)?;
        info!("listening @ {}", CONFIG.web_bind);
        server
            .serve(
                web::with_logger(web::route(state))
                    .into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await?;
        Ok(())
    }
    loop {
        if let Err(e) = run(state.clone()).await {
            error!("failed to start api server: {:?}", e);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

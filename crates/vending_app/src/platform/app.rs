use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use vending_core::{AppViewModel, Msg};
use vending_engine::{
    AccountProvider, Coordinator, EngineSettings, HttpPriceSource, PricePoller, PriceSource,
    PurchaseOrchestrator, PurchaseRequest, SugarOracle,
};
use vending_logging::{vending_debug, vending_info, vending_warn};

use super::commands::{parse_command, Command, HELP};
use super::config::load_settings;
use super::ledger::DemoLedger;
use super::logging::{self, LogDestination};
use super::ui::render::{price_line, render, render_accounts};

pub async fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::from_env());

    let config_dir = std::env::current_dir().context("resolving working directory")?;
    let settings = load_settings(&config_dir);
    vending_info!("Starting with {:?}", settings);

    let mut poller = PricePoller::new(price_source(&settings)?, settings.poll_interval);
    let coordinator = Coordinator::spawn(settings.initial_state());
    let forward = coordinator.forward_prices(poller.subscribe());
    poller.start();

    let ledger = Arc::new(DemoLedger::new(&settings, poller.subscribe()));
    let orchestrator = Arc::new(PurchaseOrchestrator::new(
        ledger.clone(),
        ledger.clone(),
        poller.subscribe(),
        coordinator.sender(),
        &settings,
    ));
    let renderer = spawn_renderer(coordinator.subscribe(), settings.clone());

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };
        vending_debug!("command {:?}", command);

        match command {
            Command::Help => println!("{}", HELP),
            Command::Accounts => {
                for line in render_accounts(&ledger.accounts(), &settings) {
                    println!("{}", line);
                }
            }
            Command::Price => println!("{}", price_line(poller.current_price())),
            Command::Dismiss => {
                coordinator.send(Msg::DismissClicked);
            }
            Command::Quote(request) => match orchestrator.quote(&request) {
                Some(output) => println!(
                    "{} GC buys {} {}",
                    request.input_amount,
                    output,
                    request.kind.output_token_name().unwrap_or("tokens")
                ),
                None => println!("{} has no quoted output", request.kind),
            },
            Command::Buy(request) => spawn_purchase(orchestrator.clone(), request),
            Command::Quit => break,
        }
    }

    vending_info!("Shutting down");
    poller.stop();
    forward.abort();
    renderer.abort();
    Ok(())
}

fn price_source(settings: &EngineSettings) -> anyhow::Result<Arc<dyn PriceSource>> {
    match &settings.price_http {
        Some(http) => {
            vending_info!("Polling market price from {}", http.url);
            let source = HttpPriceSource::new(http.clone()).context("building price client")?;
            Ok(Arc::new(source))
        }
        None => {
            vending_info!("Using built-in sugar oracle");
            let clock = Arc::new(|| u64::try_from(Utc::now().timestamp()).unwrap_or(0));
            Ok(Arc::new(SugarOracle::new(clock)))
        }
    }
}

/// Purchases run detached so the prompt stays responsive; overlapping ones are allowed.
fn spawn_purchase(orchestrator: Arc<PurchaseOrchestrator>, request: PurchaseRequest) {
    tokio::spawn(async move {
        if let Err(err) = orchestrator.submit_purchase(request).await {
            vending_warn!("purchase not completed: {}", err);
            println!("{}", err);
        }
    });
}

fn spawn_renderer(
    mut views: watch::Receiver<AppViewModel>,
    settings: EngineSettings,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            for line in render(&view, &settings) {
                println!("{}", line);
            }
        }
    })
}

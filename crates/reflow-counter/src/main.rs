use anyhow::Context;
use reflow::{LoggingMiddleware, Store, StoreOptions};
use std::time::Duration;
use tokio::task::LocalSet;

mod actions;
mod effects;
mod logger;
mod reducers;
mod state;

use actions::CounterAction;
use state::AppState;

fn main() -> anyhow::Result<()> {
    let log_file = logger::init()?;

    log::info!("Starting reflow-counter");

    let options = StoreOptions::load();

    // The store is !Send, so everything runs on one thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    let local = LocalSet::new();
    local.block_on(&runtime, run(options));

    log::info!("Exiting reflow-counter");
    println!("Log written to {}", log_file.display());
    Ok(())
}

async fn run(options: StoreOptions) {
    let store = Store::builder(reducers::app_reducer(), AppState::default())
        .middleware(LoggingMiddleware::new())
        .options(options)
        .build();

    let _counter = store.select(
        |state: &AppState| state.counter.value,
        |value: &i64| println!("counter: {}", value),
    );
    let mut loading = store.watch(|state: &AppState| state.loading.loading);

    store.dispatch(CounterAction::Increment);
    store.dispatch(CounterAction::Increment);
    store.dispatch(CounterAction::Increment);
    store.dispatch(effects::reset_when_above(2));

    store.dispatch(effects::load_saved_counter(42, Duration::from_millis(200)));
    store.dispatch(CounterAction::Decrement);

    while let Some(is_loading) = loading.try_recv() {
        println!("loading: {}", is_loading);
    }
    store.settled().await;
    while let Some(is_loading) = loading.try_recv() {
        println!("loading: {}", is_loading);
    }

    let state = store.state();
    println!(
        "final counter: {} after {} actions",
        state.counter.value,
        state.history.len()
    );
}

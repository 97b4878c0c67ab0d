use lapse::core::tasks;
use lapse::prelude::*;
use std::time::Duration;
use tokio::time::sleep;

fn main() {
    let registry = tasks::block_on(SettingsRegistry::new()).unwrap_or_else(|err| {
        eprintln!("Failed to load settings: {err:#}");
        SettingsRegistry::empty()
    });

    let level = registry.log_level().unwrap_or_else(|err| {
        eprintln!("{err}");
        None
    });
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.map_or("info".to_string(), |l| l.to_string())),
    )
    .init();

    let config = match registry.to_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid settings: {}", err);
            LapseConfig::default()
        },
    };

    if let Err(err) = tasks::init(config.tasks.clone().unwrap_or_default()) {
        log::error!("{}", err);
        return;
    }

    tasks::block_on(run(config.stopwatch));
    tasks::shutdown();
}

async fn run(config: StopwatchConfig) {
    let period = config.tick_period;
    let stopwatch = StopwatchController::new(Scheduler::Tokio, &config);
    let mut bag = SubscriptionBag::new();

    stopwatch
        .formatted_time()
        .subscribe(|time| println!("{time}"))
        .disposed_by(&mut bag);
    stopwatch
        .controls()
        .subscribe(|controls| {
            let mut shown = Vec::new();
            if controls.start_visible {
                shown.push("Start");
            }
            if let Some(label) = controls.pause_resume_label {
                shown.push(label);
            }
            if controls.reset_visible {
                shown.push("Reset");
            }
            println!("[{}]", shown.join("] ["));
        })
        .disposed_by(&mut bag);

    stopwatch.start();
    sleep(period * 3 + period / 2).await;

    stopwatch.pause_or_resume();
    sleep(period * 2).await;

    stopwatch.pause_or_resume();
    sleep(period * 2 + period / 2).await;

    stopwatch.reset();
    bag.dispose();
}

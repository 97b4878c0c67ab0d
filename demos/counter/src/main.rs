use lapse::core::tasks;
use lapse::prelude::*;
use std::io::BufRead;

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

    let counter = CounterController::with_config(&config.counter);
    let mut bag = SubscriptionBag::new();
    counter
        .label()
        .subscribe(|label| println!("Counter: {label}"))
        .disposed_by(&mut bag);

    println!("Type `+` to increment, `-` to decrement, `q` to quit.");
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("Failed to read input: {}", err);
                break;
            },
        };

        match line.trim() {
            "+" => counter.increment(),
            "-" => counter.decrement(),
            "q" => break,
            other => println!("Unknown command `{other}`"),
        }
    }

    bag.dispose();
}

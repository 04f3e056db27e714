use std::sync::Arc;

use credlog::{LogKind, logf, logger_config};
use crossbeam_channel::unbounded;

// Fake check: the outcome depends only on the password.
fn check(password: &str) -> LogKind {
    match password {
        "hunter2" => LogKind::ValidLogin,
        "members" => LogKind::ValidLoginSpecial,
        "locked" => LogKind::LockedLogin,
        _ => LogKind::InvalidLogin,
    }
}

fn main() {
    let guard = logger_config()
        .with_env()
        .expect("Invalid CREDLOG_* variables")
        .verbose(true)
        .with_outcome_files("/tmp/credlog_checker")
        .expect("Unable to open result files")
        .init_global()
        .expect("Unable to install logger");
    let dispatcher = Arc::clone(guard.dispatcher());

    let (sender, receiver) = unbounded::<(String, String)>();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let receiver = receiver.clone();
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                log::debug!("worker {worker} started");
                for (user, password) in receiver {
                    logf!(dispatcher, check(&password), "{user}:{password}");
                }
            })
        })
        .collect();
    drop(receiver);

    log::info!("checking 12 accounts with 4 workers");
    let passwords = ["hunter2", "members", "locked", "123456"];
    for i in 0..12 {
        sender
            .send((format!("user{i}"), passwords[i % passwords.len()].into()))
            .unwrap();
    }
    drop(sender);
    for handle in handles {
        handle.join().unwrap();
    }
    log::info!("done, results in /tmp/credlog_checker_*");
    dispatcher.log_code(99, "unknown event code");
}

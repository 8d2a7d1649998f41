use std::env;
use std::process;

use env_logger::{Env, Target};
use log::error;

use megraphics::app;
use megraphics::AppConfig;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let config = AppConfig::from_args(env::args_os().skip(1));

    if let Err(err) = app::run(config) {
        error!("{}", err);
        process::exit(1);
    }
}

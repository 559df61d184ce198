use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use log::LevelFilter;
use std::env;
use std::fs;
use std::str::FromStr;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "logs/wet.log";

fn level_from_env() -> LevelFilter {
    env::var("WET_LOG_LEVEL")
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Info)
}

/// Logs go to the file only; the terminal gets the recommendation or one diagnostic line.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(LOG_DIR)?;

    let log_pattern = "{d(%Y-%m-%d %H:%M:%S)} | {({l}):5.5} | {f}:{L} - {m}{n}";

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(log_pattern)))
        .build(LOG_FILE)?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(
            Root::builder()
                .appender("file")
                .build(level_from_env()),
        )?;

    log4rs::init_config(config)?;

    Ok(())
}

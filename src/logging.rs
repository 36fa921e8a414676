use crate::error::{PitchError, Result};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

const LEVEL_VAR: &str = "PITCHES_LOG";

/// Console logging at the level named by `PITCHES_LOG` (info when unset).
pub fn init() -> Result<()> {
    let level = std::env::var(LEVEL_VAR)
        .ok()
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .map_err(|err| PitchError::Logging(err.to_string()))?;
    log4rs::init_config(config).map_err(|err| PitchError::Logging(err.to_string()))?;
    Ok(())
}

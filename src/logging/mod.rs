mod journal;

use std::{io::Write as _, time::SystemTime};

use anstyle::{AnsiColor, Effects, Style};
use env_logger::{Builder, Env};
use log::Level;

use journal::connected_to_journal;

/// Installs the global logger, filtered by `RUST_LOG` and defaulting to `info`.
///
/// Every line is tagged with `account` when given.
pub fn init(account: Option<&str>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    let account = account.map(|account| format!("{account} ")).unwrap_or_default();
    if connected_to_journal() {
        builder.format(move |buf, record| {
            writeln!(
                buf,
                "<{}>{account}{}: {}",
                syslog_priority(record.level()),
                record.target(),
                record.args()
            )
        });
    } else {
        let subtle = AnsiColor::BrightBlack.on_default();
        builder.format(move |buf, record| {
            write!(buf, "{subtle}[{subtle:#}")?;
            match jiff::Timestamp::try_from(SystemTime::now()) {
                Ok(now) => write!(buf, "{now:.3} ")?,
                Err(_) => write!(buf, "timestamp_error ")?,
            }
            let level_style = level_style(record.level());
            write!(
                buf,
                "{level_style}{}{level_style:#} {account}{}",
                record.level(),
                record.target(),
            )?;
            if let Some(line) = record.line() {
                write!(buf, ":{line}")?;
            }
            write!(buf, "{subtle}]{subtle:#} ")?;
            writeln!(buf, "{}", record.args())
        });
    }
    builder.init();
}

fn syslog_priority(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

fn level_style(level: Level) -> Style {
    match level {
        Level::Error => AnsiColor::Red.on_default().effects(Effects::BOLD),
        Level::Warn => AnsiColor::Yellow.on_default(),
        Level::Info => AnsiColor::Green.on_default(),
        Level::Debug => AnsiColor::Blue.on_default(),
        Level::Trace => AnsiColor::Cyan.on_default(),
    }
}

use chrono::Local;
use log::{set_logger, set_max_level, Level, LevelFilter, Log, Metadata, Record};

pub fn init(level: LevelFilter) {
    set_logger(&Logger).unwrap();
    set_max_level(level);
}

#[derive(Copy, Clone, Debug)]
pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Debug and trace output from dependencies (hyper connection
        // polling, sqlx statement logging) drowns out our own; only the
        // workspace crates log below info.
        metadata.level() <= Level::Info || !is_dependency(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = Local::now().format("%Y-%m-%d %H:%M:%S");

        println!(
            "[{}] [{}] [{}:{}] [{}] {}",
            now,
            record.target(),
            record.file().unwrap_or("???"),
            record.line().unwrap_or(0),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {}
}

fn is_dependency(target: &str) -> bool {
    !target.starts_with("golfday")
}

#[cfg(test)]
mod tests {
    use super::is_dependency;

    #[test]
    fn test_is_dependency() {
        assert!(!is_dependency("golfday_server::http"));
        assert!(!is_dependency("golfday_core::single_elimination"));

        assert!(is_dependency("hyper::proto::h1::conn"));
        assert!(is_dependency("sqlx::query"));
    }
}

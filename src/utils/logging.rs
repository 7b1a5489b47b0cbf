//! Logging setup. The library itself only uses the [`log`] facade; this
//! wires the facade up to a file.

/// Sends log records at `min_level` and above to `log_file`.
#[cfg(feature = "logging")]
pub fn init_logger(
    min_level: log::LevelFilter, log_file: &std::path::Path,
) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            // Note we aren't using local time since it only works on single-threaded processes.
            let offset = time::OffsetDateTime::now_utc();
            let timestamp = offset
                .format(&time::macros::format_description!(
                    // The weird "[[[" is because we need to escape a bracket ("[[") to show one "[".
                    // See https://time-rs.github.io/book/api/format-description.html
                    "[[[year]-[month]-[day]][[[hour]:[minute]:[second][subsecond digits:9]]"
                ))
                .unwrap_or_default();

            out.finish(format_args!(
                "{}[{}][{}] {}",
                timestamp,
                record.target(),
                record.level(),
                message
            ))
        })
        .level(min_level)
        .chain(fern::log_file(log_file)?)
        .apply()?;

    Ok(())
}

#[cfg(all(test, feature = "logging"))]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn logs_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpuload.log");

        init_logger(log::LevelFilter::Warn, &path).unwrap();
        log::warn!("counter query failed");
        log::debug!("filtered out");
        log::logger().flush();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[WARN] counter query failed"));
        assert!(!contents.contains("filtered out"));
    }
}

use std::{fmt::Display, io::Write};

const CRASH_REPORT: &str = "./CRASH_REPORT.txt";

/// Bail out of startup failures the window cannot recover from.
pub trait Crash<T> {
    fn crash(self) -> T;
}

fn write_report(message: &str) -> ! {
    tracing::error!(message, "Catdash crashed");

    if let Ok(mut file) = std::fs::File::create(CRASH_REPORT) {
        let _ = file.write_all(format!("Catdash crashed with the following error:\n{message}").as_bytes());
    }

    std::process::exit(1);
}

impl<T, E> Crash<T> for Result<T, E>
where
    E: Display,
{
    fn crash(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => write_report(&format!("{err:#}")),
        }
    }
}

use std::{
    io::{self, Write},
    path::Path,
};

use anyhow::Context;
use env_logger::{Env, Target};

/// Writes every log line to stderr and to a file.
struct Tee<W> {
    file: W,
}

impl<W: Write> Write for Tee<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Installs the process-wide logger.  Call once, before anything logs.
///
/// The level defaults to `info` and can be overridden with `RUST_LOG`.
pub fn init(log_path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs_err::create_dir_all(dir)?;
    }
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(Tee { file })))
        .try_init()
        .with_context(|| format!("While setting up the logger writing to {log_path:?}"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::Tee;

    #[test]
    fn tee_copies_into_file_side() {
        let mut tee = Tee { file: Vec::new() };
        writeln!(tee, "2025-01-01 - bbref_leaders - INFO - hello").unwrap();
        tee.flush().unwrap();
        assert_eq!(tee.file, b"2025-01-01 - bbref_leaders - INFO - hello\n");
    }
}

use std::{fmt::Debug, io::ErrorKind, path::PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Reads `path` as TOML.  Returns `Ok(None)` if the file does not exist.
pub fn read_toml_if_exists<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<Option<T>> {
    let path = path.into();
    let text = match fs_err::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => Err(e)?,
    };
    toml::from_str(&text).map(Some).with_context(|| {
        format!(
            "While trying to parse {path:?} as {}",
            std::any::type_name::<T>()
        )
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::read_toml_if_exists;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let res = read_toml_if_exists::<_, Sample>(dir.path().join("nope.toml")).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.toml");
        std::fs::write(&path, "name = \"abc\"\ncount = 3\n").unwrap();
        let res = read_toml_if_exists::<_, Sample>(&path).unwrap();
        assert_eq!(
            res,
            Some(Sample {
                name: "abc".to_owned(),
                count: 3
            })
        );
    }

    #[test]
    fn malformed_file_names_path_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "name = ").unwrap();
        let err = read_toml_if_exists::<_, Sample>(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("broken.toml"), "{message}");
        assert!(message.contains("Sample"), "{message}");
    }
}

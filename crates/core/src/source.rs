use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{CompareError, Result};
use crate::types::Options;

/// A source unit given either as literal text or as a file to read.
#[derive(Debug, Clone)]
pub enum SourceInput {
    Text(String),
    Path(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub raw: String,
}

pub(crate) fn supported_encoding(name: &str) -> bool {
    matches!(
        name.trim().to_ascii_lowercase().as_str(),
        "utf-8" | "utf8"
    )
}

pub(crate) fn load_unit(input: &SourceInput, options: &Options) -> Result<SourceUnit> {
    match input {
        SourceInput::Text(text) => Ok(SourceUnit { raw: text.clone() }),
        SourceInput::Path(path) => {
            let bytes = fs::read(path).map_err(|err| {
                io::Error::new(err.kind(), format!("{}: {err}", path.display()))
            })?;
            let raw = String::from_utf8(bytes).map_err(|_| CompareError::Decode {
                what: path.display().to_string(),
                encoding: options.encoding.clone(),
            })?;
            Ok(SourceUnit { raw })
        }
    }
}

pub(crate) fn load_many(inputs: &[SourceInput], options: &Options) -> Result<Vec<SourceUnit>> {
    inputs
        .iter()
        .map(|input| load_unit(input, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn text_input_loads_verbatim() {
        let options = Options::default();
        let unit = load_unit(&SourceInput::Text("int main() {}".to_string()), &options).unwrap();
        assert_eq!(unit.raw, "int main() {}");
    }

    #[test]
    fn path_input_reads_the_file() {
        let options = Options::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"int x = 1;\n").unwrap();

        let unit = load_unit(&SourceInput::Path(file.path().to_path_buf()), &options).unwrap();
        assert_eq!(unit.raw, "int x = 1;\n");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let options = Options::default();
        let input = SourceInput::Path(PathBuf::from("/definitely/not/here.cpp"));
        assert!(matches!(
            load_unit(&input, &options),
            Err(CompareError::Io(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let options = Options::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = load_unit(&SourceInput::Path(file.path().to_path_buf()), &options).unwrap_err();
        assert!(matches!(err, CompareError::Decode { .. }));
    }

    #[test]
    fn encoding_names_are_case_insensitive() {
        assert!(supported_encoding("UTF-8"));
        assert!(supported_encoding("utf8"));
        assert!(!supported_encoding("gbk"));
    }
}

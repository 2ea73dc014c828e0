//! Report output plumbing.
//!
//! The CLI reports all follow the same pattern, build the report content as
//! strings then hand it to a writer that is either a file or `stdout`. This
//! module owns the writer half of that pattern.
use std::{fmt, fs, io, iter::Iterator, path::PathBuf, result};

/// The text module result.
type Result<T> = result::Result<T, Error>;

/// The text Error that can be captured outside the module.
///
/// Currently it contains only a String but can be extended to an enum later on.
#[derive(Debug)]
pub struct Error(String);
/// Include the `ToString` trait for the [`Error`].
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
/// Create a text error from a String.
impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::from(error.as_str())
    }
}
/// Create a text error from a str slice.
impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error(format!("::text: {error}"))
    }
}
/// Create a text error from an `io::Error`.
impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::from(error.to_string())
    }
}

/// Gets a `io::Write` writer for either a file or `stdout`.
///
/// # Arguments
///
/// * `file_option` - if `None` then `stdout` will be used otherwise the file path will be opened.
/// * `append` - if writing to a file, append output if `true` otherwise truncate existing file
///   contents.
pub fn get_writer(file_option: &Option<PathBuf>, append: bool) -> Result<Box<dyn io::Write>> {
    if file_option.is_none() {
        Ok(Box::new(io::stdout()))
    } else {
        let file_path = file_option.as_ref().unwrap();
        let mut open_options = fs::OpenOptions::new();
        if append {
            open_options.append(true).create(true);
        } else {
            open_options.write(true).truncate(true).create(true);
        }
        match open_options.open(file_path.as_path().display().to_string()) {
            Ok(writer) => Ok(Box::new(std::io::BufWriter::new(writer))),
            Err(error) => {
                let errmsg = format!("Error opening {}: {error}", file_path.as_path().display());
                log::error!("{errmsg}");
                Err(Error::from(errmsg))
            }
        }
    }
}

/// Writes a collection of strings.
///
/// # Arguments
///
/// * `writer` is where text will be written.
/// * `string_iter` is the source of what will be written.
pub fn write_strings<T: Iterator<Item = String>>(writer: &mut dyn io::Write, string_iter: T) -> Result<()> {
    for string in string_iter {
        writeln!(writer, "{}", string.as_str())?;
    }
    writer.flush()?;
    Ok(())
}

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use tempfile::NamedTempFile;

use crate::error::ConvertError;

/// Opens `path` for line-oriented reading, decompressing `.gz` files on the fly.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, ConvertError> {
    let metadata = fs::metadata(path).map_err(|err| ConvertError::from_read(path, err))?;
    if metadata.is_dir() {
        return Err(ConvertError::InvalidInput(format!(
            "input path is not a file: {}",
            path.display()
        )));
    }
    let file = File::open(path).map_err(|err| ConvertError::from_read(path, err))?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Output file written to a sibling temp file and moved into place by
/// [`StagedOutput::finish`]. Dropping it unfinished discards the temp file.
///
/// Symlinked destinations are resolved so the link target is replaced. Existing
/// destinations that are not regular files (FIFOs, `/dev/stdout`) are written
/// directly.
pub struct StagedOutput {
    target: OutputTarget,
    destination: PathBuf,
}

enum OutputTarget {
    Staged {
        writer: BufWriter<NamedTempFile>,
        path: PathBuf,
    },
    Direct(BufWriter<File>),
}

impl StagedOutput {
    pub fn create(destination: &Path) -> Result<Self, ConvertError> {
        let to_write_error = |err: io::Error| ConvertError::from_write(destination, err);
        let existing = match fs::metadata(destination) {
            Ok(metadata) => Some(metadata),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(to_write_error(err)),
        };

        if let Some(metadata) = existing.as_ref().filter(|metadata| !metadata.is_file()) {
            if metadata.is_dir() {
                return Err(ConvertError::InvalidInput(format!(
                    "output path is a directory: {}",
                    destination.display()
                )));
            }
            let file = File::create(destination).map_err(to_write_error)?;
            return Ok(Self {
                target: OutputTarget::Direct(BufWriter::new(file)),
                destination: destination.to_path_buf(),
            });
        }

        let path = match existing {
            Some(_) => fs::canonicalize(destination).map_err(to_write_error)?,
            None => destination.to_path_buf(),
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(to_write_error)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(".annoconv-out");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Same mode as File::create, so the umask applies.
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let temp = builder.tempfile_in(&parent).map_err(to_write_error)?;
        if let Some(metadata) = existing {
            fs::set_permissions(temp.path(), metadata.permissions()).map_err(to_write_error)?;
        }

        Ok(Self {
            target: OutputTarget::Staged {
                writer: BufWriter::new(temp),
                path,
            },
            destination: destination.to_path_buf(),
        })
    }

    pub fn finish(self) -> Result<(), ConvertError> {
        let destination = self.destination;
        match self.target {
            OutputTarget::Staged { writer, path } => {
                let temp = writer
                    .into_inner()
                    .map_err(|err| ConvertError::from_write(&destination, err.error()))?;
                temp.persist(&path)
                    .map_err(|err| ConvertError::from_write(&destination, err.error))?;
            }
            OutputTarget::Direct(mut writer) => {
                writer
                    .flush()
                    .map_err(|err| ConvertError::from_write(&destination, err))?;
            }
        }
        Ok(())
    }
}

impl Write for StagedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.target {
            OutputTarget::Staged { writer, .. } => writer.write(buf),
            OutputTarget::Direct(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.target {
            OutputTarget::Staged { writer, .. } => writer.flush(),
            OutputTarget::Direct(writer) => writer.flush(),
        }
    }
}

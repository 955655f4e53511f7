//! Concatenate harvest outputs that share a header.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{HarvestError, Result};

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|source| HarvestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::Reader::from_reader(file))
}

/// Creating the output truncates it, so it must not be one of the inputs
fn refuse_input_as_output<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<()> {
    // A path that does not exist yet cannot be an input
    let Ok(target) = output.canonicalize() else {
        return Ok(());
    };
    for path in inputs {
        let path = path.as_ref();
        let resolved = path.canonicalize().map_err(|source| HarvestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if resolved == target {
            return Err(HarvestError::OutputIsInput {
                path: output.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Write the rows of every input under the first input's header.
///
/// Inputs must all carry the same header; the first mismatch stops the merge.
/// Returns the number of data rows written.
pub fn merge_files<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<usize> {
    let (first, _) = inputs.split_first().ok_or(HarvestError::NoInputs)?;
    let header = reader(first.as_ref())?.headers()?.clone();

    // Validate every header before touching the output
    let mut readers = Vec::with_capacity(inputs.len());
    for path in inputs {
        let path = path.as_ref();
        let mut rdr = reader(path)?;
        if *rdr.headers()? != header {
            return Err(HarvestError::HeaderMismatch {
                path: path.to_path_buf(),
            });
        }
        readers.push((path.to_path_buf(), rdr));
    }

    refuse_input_as_output(inputs, output)?;

    let file = std::fs::File::create(output).map_err(|source| HarvestError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(&header)?;

    let mut rows = 0;
    for (path, mut rdr) in readers {
        let mut from_file = 0;
        for record in rdr.records() {
            writer.write_record(&record?)?;
            from_file += 1;
        }
        debug!(file = %path.display(), rows = from_file, "merged");
        rows += from_file;
    }
    writer.flush().map_err(|source| HarvestError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    info!(inputs = inputs.len(), rows, output = %output.display(), "merge finished");
    Ok(rows)
}

/// Merge output name for a list of inputs, `<first stem>_merged.csv`
pub fn default_output(inputs: &[PathBuf]) -> Option<PathBuf> {
    let first = inputs.first()?;
    let stem = first.file_stem()?.to_string_lossy();
    Some(first.with_file_name(format!("{}_merged.csv", stem)))
}

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// Opens a file and transparently peels off gzip layers to expose the
/// underlying text stream. Pyseer tables are commonly gzipped; BGZF and
/// concatenated members are handled by `MultiGzDecoder`.
pub fn open_input(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    let mut reader: Box<dyn BufRead> = Box::new(BufReader::new(file));

    // Bounded so malformed nested inputs cannot loop forever
    const MAX_DEPTH: usize = 4;

    for _ in 0..MAX_DEPTH {
        let is_gzip = {
            let buf = reader.fill_buf()?;
            // GZIP magic: 1f 8b
            buf.len() >= 2 && buf[0] == 0x1f && buf[1] == 0x8b
        };

        if !is_gzip {
            break;
        }
        tracing::debug!("detected gzip layer");
        reader = Box::new(BufReader::new(MultiGzDecoder::new(reader)));
    }

    Ok(reader)
}

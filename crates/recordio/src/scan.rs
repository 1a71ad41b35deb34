use std::io::Read;

use recordio_frame::{FrameError, FrameReader};
use serde::Serialize;
use tracing::{debug, warn};

/// One step of a record scan.
#[derive(Debug)]
pub enum ScanEvent<'a> {
    Record { index: usize, payload: &'a [u8] },
    Skipped { index: usize, length: u32 },
}

/// Totals gathered while scanning a record stream.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub records: usize,
    pub skipped: usize,
    pub payload_bytes: u64,
    pub min_size: Option<usize>,
    pub max_size: Option<usize>,
}

impl ScanSummary {
    pub(crate) fn observe(&mut self, size: usize) {
        self.records += 1;
        self.payload_bytes += size as u64;
        self.min_size = Some(self.min_size.map_or(size, |min| min.min(size)));
        self.max_size = Some(self.max_size.map_or(size, |max| max.max(size)));
    }
}

/// Read records into `buf` until the stream ends or `limit` records were seen.
///
/// Records that do not fit `buf` are reported as [`ScanEvent::Skipped`] and
/// the scan carries on with the next one.
pub fn scan<R, F>(
    reader: &mut FrameReader<R>,
    buf: &mut [u8],
    limit: Option<usize>,
    mut on_event: F,
) -> Result<ScanSummary, FrameError>
where
    R: Read,
    F: FnMut(ScanEvent<'_>),
{
    let mut summary = ScanSummary::default();

    loop {
        let index = summary.records + summary.skipped;
        if limit.is_some_and(|limit| index >= limit) {
            debug!(limit = index, "record limit reached");
            break;
        }

        match reader.read_record(buf) {
            Ok(n) => {
                summary.observe(n);
                on_event(ScanEvent::Record {
                    index,
                    payload: &buf[..n],
                });
            }
            Err(FrameError::TargetBufferTooSmall { length, capacity }) => {
                warn!(index, length, capacity, "record larger than buffer, skipped");
                summary.skipped += 1;
                on_event(ScanEvent::Skipped { index, length });
            }
            Err(FrameError::EndOfStream) => break,
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}

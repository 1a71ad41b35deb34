use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufWriter, Write};

use recordio_frame::FrameWriter;
use tracing::{debug, info};

use crate::cmd::WriteArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat};
use crate::scan::ScanSummary;

pub fn run(args: WriteArgs, format: OutputFormat) -> CliResult<i32> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(args.append)
        .truncate(!args.append)
        .open(&args.path)
        .map_err(|err| io_error(&format!("failed opening {}", args.path.display()), err))?;
    let mut writer = FrameWriter::new(BufWriter::new(file));
    let mut summary = ScanSummary::default();

    for data in &args.data {
        write_one(&mut writer, data.as_bytes(), &mut summary)?;
    }

    for path in &args.file {
        let payload = fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        write_one(&mut writer, &payload, &mut summary)?;
    }

    if args.lines {
        write_lines(io::stdin().lock(), &mut writer, &mut summary)?;
    }

    writer
        .flush()
        .map_err(|err| frame_error("flush failed", err))?;
    info!(
        path = %args.path.display(),
        records = summary.records,
        bytes = summary.payload_bytes,
        "records written"
    );

    let mut out = io::stdout().lock();
    print_summary(&mut out, &args.path.display().to_string(), &summary, format)
        .map_err(|err| io_error("write failed", err))?;

    Ok(SUCCESS)
}

/// Frame each `\n`-terminated line of `input` as one record, without the newline.
fn write_lines<R: BufRead, W: Write>(
    input: R,
    writer: &mut FrameWriter<W>,
    summary: &mut ScanSummary,
) -> CliResult<()> {
    for line in input.split(b'\n') {
        let mut line = line.map_err(|err| io_error("failed reading stdin", err))?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        write_one(writer, &line, summary)?;
    }
    Ok(())
}

fn write_one<W: Write>(
    writer: &mut FrameWriter<W>,
    payload: &[u8],
    summary: &mut ScanSummary,
) -> CliResult<()> {
    let written = writer
        .write_record(payload)
        .map_err(|err| frame_error("write failed", err))?;
    debug!(size = written, "record written");
    summary.observe(written);
    Ok(())
}

use tracing::{info, warn};

use crate::cmd::{open_reader, DumpArgs};
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{OutputFormat, RecordPrinter};
use crate::scan::scan;

pub fn run(args: DumpArgs, format: OutputFormat) -> CliResult<i32> {
    let mut reader = open_reader(&args.path, &args.read)?;
    let mut buf = vec![0u8; args.read.buffer_size];
    let mut printer = RecordPrinter::new(std::io::stdout().lock(), format);
    let mut print_result = Ok(());

    let scanned = scan(&mut reader, &mut buf, args.count, |event| {
        if print_result.is_ok() {
            print_result = printer.print(&event);
        }
    });

    // Print what was read even if the stream turned out to be malformed.
    print_result.map_err(|err| io_error("write failed", err))?;
    printer
        .finish()
        .map_err(|err| io_error("write failed", err))?;

    let summary = scanned.map_err(|err| frame_error("read failed", err))?;
    if summary.skipped > 0 {
        warn!(
            skipped = summary.skipped,
            buffer_size = args.read.buffer_size,
            "some records did not fit the read buffer"
        );
    }
    info!(
        path = %args.path.display(),
        records = summary.records,
        skipped = summary.skipped,
        "dump complete"
    );

    Ok(SUCCESS)
}

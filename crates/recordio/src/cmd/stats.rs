use crate::cmd::{open_reader, StatsArgs};
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat};
use crate::scan::scan;

pub fn run(args: StatsArgs, format: OutputFormat) -> CliResult<i32> {
    let mut reader = open_reader(&args.path, &args.read)?;
    let mut buf = vec![0u8; args.read.buffer_size];

    let summary =
        scan(&mut reader, &mut buf, None, |_| {}).map_err(|err| frame_error("read failed", err))?;

    let mut out = std::io::stdout().lock();
    print_summary(&mut out, &args.path.display().to_string(), &summary, format)
        .map_err(|err| io_error("write failed", err))?;

    Ok(SUCCESS)
}

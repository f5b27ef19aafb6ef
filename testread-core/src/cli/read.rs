use crate::cli::render::render_read;
use crate::conf::{ReaderConfig, load_config};
use crate::logging::{OutputMode, default_output_mode};
use crate::protocol::decode_messages;
use crate::read::{StreamRead, StreamReadHandler, StreamReadRequest};
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Stream the records belong to
    #[arg(long)]
    pub stream: String,

    /// Newline-delimited protocol messages, `-` for stdin
    #[arg(long, default_value = "-")]
    pub messages: PathBuf,

    /// Maximum number of records to group (1-1000)
    #[arg(long)]
    pub record_limit: Option<usize>,

    /// Reader config file; built-in defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format (pretty on a terminal, json otherwise)
    #[arg(long, value_enum)]
    pub format: Option<OutputMode>,
}

pub fn run_read(args: ReadArgs) -> Result<()> {
    let request = StreamReadRequest {
        stream: args.stream,
        record_limit: args.record_limit,
    };
    // Reject bad limits before touching the input.
    request.validate()?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReaderConfig::default(),
    };

    let handler = StreamReadHandler::new(&config);
    let read = read_from(open_messages(&args.messages)?, &handler, &request)?;

    match args.format.unwrap_or_else(default_output_mode) {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&read)?),
        OutputMode::Pretty => print!("{}", render_read(&read)),
    }

    Ok(())
}

/// Runs a read straight off a line reader.
///
/// Lines are decoded as the grouper pulls them, so nothing past the record
/// limit is read. A read failure ends the input and is reported ahead of any
/// grouping error it caused.
pub fn read_from<R: BufRead>(
    reader: R,
    handler: &StreamReadHandler,
    request: &StreamReadRequest,
) -> Result<StreamRead> {
    let mut read_error = None;
    let messages = decode_messages(reader)
        .map_while(|message| message.map_err(|e| read_error = Some(e)).ok());

    let read = handler.read_stream(messages, request);
    if let Some(e) = read_error {
        return Err(e.into());
    }
    Ok(read?)
}

fn open_messages(path: &Path) -> Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

//! `eamquery transcode` - convert a saved upstream response offline.

use anyhow::Context;
use eamquery_transcode::{OutputFormat, TableSink, TranscodeError, transcode};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tokio::io::{AsyncBufRead, BufReader};

pub async fn run_transcode(file: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut sink = format.sink(BufWriter::new(stdout.lock()));

    if file == Path::new("-") {
        convert(BufReader::new(tokio::io::stdin()), &mut sink).await?;
    } else {
        let input = tokio::fs::File::open(file)
            .await
            .with_context(|| format!("failed to open {}", file.display()))?;
        convert(BufReader::new(input), &mut sink).await?;
    }

    sink.get_mut().flush()?;
    Ok(())
}

async fn convert<R, S>(input: R, sink: &mut S) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    S: TableSink,
{
    match transcode(input, sink).await {
        Ok(stats) => {
            tracing::info!(columns = stats.columns, rows = stats.rows, "Transcoded");
            Ok(())
        }
        Err(TranscodeError::ApplicationFault(message)) => {
            anyhow::bail!("upstream fault: {message}")
        }
        Err(e) => Err(e.into()),
    }
}

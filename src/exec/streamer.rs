// src/exec/streamer.rs

//! Draining a child's stdout/stderr into its output region.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

use crate::document::{DocumentSink, RegionName, Tag, TextIndex};
use crate::errors::StreamError;
use crate::exec::runner::RunningProcess;
use crate::types::{ExitOutcome, StreamKind};

/// Where a command's output goes: its shell's region, at the end of its
/// output tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub region: RegionName,
    pub tag: Tag,
}

/// What happened while draining one stream.
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Chunks forwarded: full lines plus a trailing partial line, if any.
    pub lines: usize,
    pub bytes: usize,
    /// Appends the document refused.
    pub sink_failures: usize,
    /// Read error that ended the drain early.
    pub error: Option<StreamError>,
}

/// Reports of both streams of one process.
#[derive(Debug, Default)]
pub struct StreamSummary {
    pub stdout: DrainReport,
    pub stderr: DrainReport,
}

/// Read `reader` to end-of-stream, forwarding every line (terminator
/// included, final partial line as-is) to `target`.
///
/// A read error ends this stream only. Refused appends are logged and
/// counted, and reading continues so the process never blocks on a full
/// pipe.
pub async fn drain<R, S>(
    reader: R,
    kind: StreamKind,
    sink: &S,
    target: &OutputTarget,
) -> DrainReport
where
    R: AsyncRead + Unpin,
    S: DocumentSink + ?Sized,
{
    let mut reader = BufReader::new(reader);
    let mut report = DrainReport::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => forward(&buf, kind, sink, target, &mut report).await,
            Err(source) => {
                // Bytes read before the failure still belong to the output.
                if !buf.is_empty() {
                    forward(&buf, kind, sink, target, &mut report).await;
                }
                warn!(
                    region = %target.region,
                    tag = %target.tag,
                    stream = %kind,
                    error = %source,
                    "read failed; treating as end of stream"
                );
                report.error = Some(StreamError { kind, source });
                break;
            }
        }
    }

    debug!(
        region = %target.region,
        tag = %target.tag,
        stream = %kind,
        lines = report.lines,
        bytes = report.bytes,
        sink_failures = report.sink_failures,
        "stream drained"
    );
    report
}

async fn forward<S>(
    chunk: &[u8],
    kind: StreamKind,
    sink: &S,
    target: &OutputTarget,
    report: &mut DrainReport,
) where
    S: DocumentSink + ?Sized,
{
    report.lines += 1;
    report.bytes += chunk.len();

    let text = String::from_utf8_lossy(chunk).into_owned();
    let result = sink
        .insert_text(
            &target.region,
            TextIndex::TagEnd(target.tag.clone()),
            text,
            Some(target.tag.clone()),
        )
        .await;

    if let Err(e) = result {
        report.sink_failures += 1;
        warn!(
            region = %target.region,
            tag = %target.tag,
            stream = %kind,
            error = %e,
            "document rejected output; dropping chunk"
        );
    }
}

/// Drain stdout and stderr of `process` concurrently, then wait for it to
/// exit.
///
/// Both readers are dropped (closing the pipes) as soon as their drain
/// ends. Only a failure to collect the exit status is returned as an error.
pub async fn stream_process<S>(
    mut process: RunningProcess,
    sink: &S,
    target: &OutputTarget,
) -> io::Result<(ExitOutcome, StreamSummary)>
where
    S: DocumentSink + ?Sized,
{
    let stdout = process.take_stdout();
    let stderr = process.take_stderr();

    let (stdout, stderr) = tokio::join!(
        async {
            match stdout {
                Some(out) => drain(out, StreamKind::Stdout, sink, target).await,
                None => DrainReport::default(),
            }
        },
        async {
            match stderr {
                Some(err) => drain(err, StreamKind::Stderr, sink, target).await,
                None => DrainReport::default(),
            }
        },
    );

    let outcome = process.wait().await?;
    Ok((outcome, StreamSummary { stdout, stderr }))
}

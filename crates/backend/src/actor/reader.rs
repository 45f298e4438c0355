//! Line stream reader - publishes the records of one file into a bounded queue.

use std::{io, path::PathBuf};

use futures::{Stream, StreamExt};
use tokio::{fs::File, sync::mpsc};
use tokio_util::{
  codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead},
  sync::CancellationToken,
};
use tracing::{debug, trace};

/// Default longest record, matching the config default.
pub const DEFAULT_MAX_RECORD_LEN: usize = 64 * 1024;

/// How a file is cut into records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPolicy {
  /// `\n` or `\r\n` terminated lines
  #[default]
  Lines,
  /// Records separated by a single byte
  Delimiter(u8),
}

impl SplitPolicy {
  fn delimiter(self) -> u8 {
    match self {
      // The trailing `\r` of a CRLF line is trimmed with the other whitespace
      SplitPolicy::Lines => b'\n',
      SplitPolicy::Delimiter(byte) => byte,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
  /// Records longer than this fail the read instead of being truncated
  pub max_record_len: usize,
  pub split: SplitPolicy,
}

impl ReaderOptions {
  pub fn with_max_record_len(max_record_len: usize) -> Self {
    Self {
      max_record_len,
      ..Default::default()
    }
  }
}

impl Default for ReaderOptions {
  fn default() -> Self {
    Self {
      max_record_len: DEFAULT_MAX_RECORD_LEN,
      split: SplitPolicy::Lines,
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
  #[error("failed to open file at path {}: {}", .path.display(), .source)]
  Open {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to read {}: {}", .path.display(), .source)]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("record in {} exceeds the {max} byte buffer", .path.display())]
  RecordTooLong { path: PathBuf, max: usize },
}

enum FrameError {
  TooLong,
  Io(io::Error),
}

/// Stream the records of `path` into `tx`.
///
/// Returns the number of records delivered. The sender is dropped on return,
/// which is how consumers observe end-of-stream; consumers never close the
/// queue themselves. A consumer that drops its receiver early ends the read
/// without error.
///
/// Opening a missing file fails before any record is sent.
pub async fn read_lines(
  path: PathBuf,
  tx: mpsc::Sender<String>,
  options: ReaderOptions,
  cancel: CancellationToken,
) -> Result<usize, StreamError> {
  let file = File::open(&path).await.map_err(|source| StreamError::Open {
    path: path.clone(),
    source,
  })?;
  trace!(path = %path.display(), ?options, "Reader starting");

  let max = options.max_record_len;
  let delimiter = vec![options.split.delimiter()];
  let codec = AnyDelimiterCodec::new_with_max_length(delimiter.clone(), delimiter, max);
  // Decoded lossily: a non-UTF-8 byte never fails the read
  let frames = FramedRead::new(file, codec).map(|frame| match frame {
    Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
    Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => Err(FrameError::TooLong),
    Err(AnyDelimiterCodecError::Io(e)) => Err(FrameError::Io(e)),
  });
  let result = publish(frames, &tx, &cancel).await;

  match result {
    Ok(sent) => {
      debug!(path = %path.display(), records = sent, "Reader finished");
      Ok(sent)
    }
    Err(FrameError::TooLong) => Err(StreamError::RecordTooLong { path, max }),
    Err(FrameError::Io(source)) => Err(StreamError::Read { path, source }),
  }
}

async fn publish<S>(mut frames: S, tx: &mpsc::Sender<String>, cancel: &CancellationToken) -> Result<usize, FrameError>
where
  S: Stream<Item = Result<String, FrameError>> + Unpin,
{
  let mut sent = 0;

  loop {
    let frame = tokio::select! {
      biased;
      _ = cancel.cancelled() => {
        trace!(sent, "Reader cancelled");
        return Ok(sent);
      }
      frame = frames.next() => frame,
    };

    let record = match frame {
      Some(Ok(line)) => trim_record(line),
      Some(Err(e)) => return Err(e),
      None => return Ok(sent),
    };

    tokio::select! {
      biased;
      _ = cancel.cancelled() => {
        trace!(sent, "Reader cancelled during send");
        return Ok(sent);
      }
      result = tx.send(record) => {
        if result.is_err() {
          trace!(sent, "Reader: downstream closed");
          return Ok(sent);
        }
      }
    }
    sent += 1;
  }
}

fn trim_record(line: String) -> String {
  let trimmed = line.trim();
  if trimmed.len() == line.len() {
    line
  } else {
    trimmed.to_string()
  }
}

use crate::core::value::Record;
use crate::decode::decode_file;
use crate::error::DecodeError;
use crate::task::probe::{ProbeVerdict, probe};
use std::path::PathBuf;
use std::time::Duration;

/// One attempt to load an image candidate, tagged so that late answers for
/// a reference the user has since changed can be recognised and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub generation: u64,
    pub index: usize,
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Decode { run_id: u64, path: PathBuf },
    Probe(ProbeRequest),
}

#[derive(Debug)]
pub enum JobOutcome {
    Decoded {
        run_id: u64,
        path: PathBuf,
        result: Result<Vec<Record>, DecodeError>,
    },
    Probed {
        generation: u64,
        index: usize,
        verdict: ProbeVerdict,
    },
}

pub fn execute(job: Job) -> JobOutcome {
    match job {
        Job::Decode { run_id, path } => {
            let result = decode_file(&path);
            if let Err(err) = &result {
                tracing::info!(path = %path.display(), error = %err, "decode failed");
            }
            JobOutcome::Decoded {
                run_id,
                path,
                result,
            }
        }
        Job::Probe(request) => {
            let verdict = probe(&request.url, request.timeout);
            tracing::debug!(
                url = %request.url,
                generation = request.generation,
                index = request.index,
                ?verdict,
                "probe finished"
            );
            JobOutcome::Probed {
                generation: request.generation,
                index: request.index,
                verdict,
            }
        }
    }
}

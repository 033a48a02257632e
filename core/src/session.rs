//! One full harness session: flash the image, then run the report loop.

use std::path::Path;

use anyhow::Result;
use log::*;
use serde::{Deserialize, Serialize};

use crate::controller::{self, RunConfig, RunOutcome};
use crate::loader::FirmwareLoader;
use crate::transport::Transport;
use crate::types::Verdict;
use crate::verifier::Registry;

/// Result of a full session, including the per-report detail when the
/// run phase was reached
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionOutcome {
    pub verdict: Verdict,
    pub run: Option<RunOutcome>,
}

/// Flashes `image` and, if that succeeds, drives the run loop over a
/// freshly opened transport.
///
/// A load failure yields [`Verdict::Skip`] without ever opening the
/// transport: an unprogrammable device is an environment problem, and
/// whatever is currently running on it cannot be assumed to speak the
/// report protocol.
pub fn run_session<T: Transport>(
    loader: &dyn FirmwareLoader,
    image: &Path,
    open_transport: impl FnOnce() -> Result<T>,
    registry: &Registry,
    run_config: &RunConfig,
) -> Result<SessionOutcome> {
    info!("Loading {}", image.display());
    if let Err(e) = loader.load(image) {
        warn!("Load failed, skipping run: {}", e);
        return Ok(SessionOutcome {
            verdict: Verdict::Skip,
            run: None,
        });
    }

    let mut transport = open_transport()?;
    let outcome = controller::run(&mut transport, registry, run_config)?;
    let verdict = outcome.verdict();
    info!(
        "Run {}: {}/{} passed",
        verdict, outcome.passed, outcome.executed
    );
    Ok(SessionOutcome {
        verdict,
        run: Some(outcome),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::testing::StubLoader;
    use crate::transport::testing::ScriptedTransport;
    use crate::verifier::{Check, VerifierKind};
    use std::time::Duration;

    static TABLE: &[Check] = &[Check {
        test_id: 1,
        kind: VerifierKind::EqualPairs,
    }];

    fn run_config() -> RunConfig {
        RunConfig {
            expected_total: 1,
            deadline: Some(Duration::from_secs(5)),
        }
    }

    #[test]
    fn test_load_failure_skips_without_transport() {
        let registry = Registry::new(TABLE).unwrap();
        let loader = StubLoader { succeed: false };
        let outcome = run_session(
            &loader,
            Path::new("testpwm.hex"),
            || -> Result<ScriptedTransport> {
                panic!("transport must not be opened after a load failure")
            },
            &registry,
            &run_config(),
        )
        .unwrap();
        assert_eq!(outcome.verdict, Verdict::Skip);
        assert_eq!(outcome.verdict.exit_code(), 77);
        assert!(outcome.run.is_none());
    }

    #[test]
    fn test_full_session_pass() {
        let registry = Registry::new(TABLE).unwrap();
        let loader = StubLoader { succeed: true };
        let outcome = run_session(
            &loader,
            Path::new("testpwm.hex"),
            || Ok(ScriptedTransport::lines(&["1:2a,2a\n"])),
            &registry,
            &run_config(),
        )
        .unwrap();
        assert_eq!(outcome.verdict, Verdict::Pass);
        assert_eq!(outcome.run.unwrap().executed, 1);
    }
}

// Integration tests: searches driven by real shell commands
#![cfg(unix)]

use anyhow::Result;
use bisector::config::parse_config;
use bisector::logging::LogConfig;
use bisector::oracle::{EnvOracle, RecordingOracle, Verdict};
use bisector::search::{bisect, run_search, sequential_search, NoTransitionReason, SearchMode, SearchOutcome, SearchRange};
use serde_json::json;

fn threshold_oracle(threshold: i64) -> EnvOracle {
    EnvOracle::new(format!("test \"$VALUE\" -lt {}", threshold), "VALUE", 1).with_quiet(true)
}

#[tokio::test]
async fn test_bisection_finds_seven() -> Result<()> {
    let mut oracle = threshold_oracle(7);
    let outcome = bisect(SearchRange::new(1, 20), &mut oracle, &LogConfig::default()).await?;
    assert_eq!(outcome.transition(), Some(7));
    Ok(())
}

#[tokio::test]
async fn test_sequential_finds_seven() -> Result<()> {
    let mut oracle = threshold_oracle(7);
    let outcome = sequential_search(SearchRange::new(1, 20), &mut oracle, &LogConfig::default()).await?;
    assert_eq!(outcome.transition(), Some(7));
    Ok(())
}

#[tokio::test]
async fn test_minimal_range() -> Result<()> {
    let mut oracle = RecordingOracle::new(threshold_oracle(1));
    let outcome = bisect(SearchRange::new(0, 1), &mut oracle, &LogConfig::default()).await?;
    assert_eq!(outcome.transition(), Some(1));
    assert_eq!(oracle.indices(), vec![0, 1, 1]);
    Ok(())
}

#[tokio::test]
async fn test_constant_command_has_no_transition() -> Result<()> {
    let mut oracle = RecordingOracle::new(EnvOracle::new("exit 0", "VALUE", 1));
    let outcome = bisect(SearchRange::new(1, 50), &mut oracle, &LogConfig::default()).await?;
    assert_eq!(
        outcome,
        SearchOutcome::NoTransition {
            reason: NoTransitionReason::EndpointsAgree {
                verdict: Verdict::Pass
            }
        }
    );
    // Only the two endpoints were probed.
    assert_eq!(oracle.probes().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_search_from_config_with_cached_endpoints() -> Result<()> {
    let config = parse_config(json!({
        "cmd": "[ \"$LEVEL\" -lt 30 ]",
        "env_name": "LEVEL",
        "start": 0,
        "end": 64,
        "pass_count": 2,
        "start_ret": 0,
        "end_ret": 1
    }))?;

    let mut oracle = RecordingOracle::new(EnvOracle::from_config(&config, true, LogConfig::default()));
    let outcome = run_search(
        SearchMode::Bisection,
        SearchRange::from_config(&config),
        &mut oracle,
        &LogConfig::new(true),
    )
    .await?;

    assert_eq!(outcome.transition(), Some(30));
    assert!(!oracle.indices().contains(&0));
    Ok(())
}

#[tokio::test]
async fn test_flaky_command_fails_value() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    // First run at any value fails; later runs pass.
    let oracle = EnvOracle::new("if [ -f ran ]; then exit 0; fi; touch ran; exit 1", "VALUE", 3)
        .with_working_dir(dir.path());

    assert_eq!(oracle.verdict_at(4).await, Verdict::Fail);
    assert_eq!(oracle.verdict_at(4).await, Verdict::Pass);
    Ok(())
}

#[tokio::test]
async fn test_modes_agree_on_shell_oracle() -> Result<()> {
    for threshold in [2, 5, 11, 19] {
        let seq = run_search(
            SearchMode::Sequential,
            SearchRange::new(1, 20),
            &mut threshold_oracle(threshold),
            &LogConfig::default(),
        )
        .await?;
        let bis = run_search(
            SearchMode::Bisection,
            SearchRange::new(1, 20),
            &mut threshold_oracle(threshold),
            &LogConfig::default(),
        )
        .await?;
        assert_eq!(seq, bis, "threshold {}", threshold);
        assert_eq!(bis.transition(), Some(threshold));
    }
    Ok(())
}

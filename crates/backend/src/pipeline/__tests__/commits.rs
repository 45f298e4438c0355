//! Top-K repositories by commits pushed, end to end.

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use crate::{
    actor::StreamError,
    pipeline::{
      __tests__::helpers::{Fixture, assert_descending, entry, request, sorted},
      CommitInputs, PipelineError, top_repos_by_commits,
    },
  };

  fn inputs(fx: &Fixture) -> CommitInputs {
    let events = fx.write(
      "events.csv",
      &[
        "e1,PushEvent,a1,r1",
        "e2,PushEvent,a2,r2",
        "e3,WatchEvent,a1,r1",
        "e4,PushEvent,a3,r3",
        "e5,PushEvent",
      ],
    );
    let commits = fx.write(
      "commits.csv",
      &[
        "c1,fix bug,e1",
        "c2,e2",
        "c3,refactor, with a comma,e1",
        "c4,e2",
        "",
        "c5,e3",
        "c6,e2",
        "c7,unknown-event",
        "c8,msg,e1",
        "c9,msg,e2",
      ],
    );
    let repos = fx.write(
      "repos.csv",
      &[
        "r1,repowithpushevent1",
        "not a repo line",
        "r2,repowithpushevent2",
        "r3,repowithoutcommits",
      ],
    );
    CommitInputs { events, commits, repos }
  }

  #[tokio::test]
  async fn test_top_two_by_commits() {
    let fx = Fixture::new();
    let result = top_repos_by_commits(&request(2), inputs(&fx))
      .await
      .expect("pipeline should succeed");

    assert_eq!(
      result,
      vec![entry("repowithpushevent2", 4), entry("repowithpushevent1", 3)]
    );
  }

  #[tokio::test]
  async fn test_push_repos_without_commits_are_candidates() {
    let fx = Fixture::new();
    let result = top_repos_by_commits(&request(10), inputs(&fx))
      .await
      .expect("pipeline should succeed");

    assert_eq!(
      result,
      vec![
        entry("repowithpushevent2", 4),
        entry("repowithpushevent1", 3),
        entry("repowithoutcommits", 0),
      ]
    );
  }

  #[tokio::test]
  async fn test_unresolved_id_is_kept() {
    let fx = Fixture::new();
    let mut inputs = inputs(&fx);
    inputs.repos = fx.write("repos-partial.csv", &["r1,repowithpushevent1"]);

    let result = top_repos_by_commits(&request(2), inputs)
      .await
      .expect("unresolved ids must not fail the run");
    assert_eq!(result, vec![entry("r2", 4), entry("repowithpushevent1", 3)]);
  }

  #[tokio::test]
  async fn test_non_utf8_commit_message_is_counted() {
    let fx = Fixture::new();
    let events = fx.write("events.csv", &["e1,PushEvent,a1,r1"]);
    let repos = fx.write("repos.csv", &["r1,repo1"]);
    let commits = fx.missing("commits.csv");
    std::fs::write(&commits, b"c1,first,e1\nc2,caf\xe9 latin1 msg,e1\nc3,third,e1\n").expect("write fixture");

    let result = top_repos_by_commits(&request(2), CommitInputs { events, commits, repos })
      .await
      .expect("a bad byte in an unused field must not fail the run");
    assert_eq!(result, vec![entry("repo1", 3)]);
  }

  #[tokio::test]
  async fn test_zero_count_is_empty() {
    let fx = Fixture::new();
    let result = top_repos_by_commits(&request(0), inputs(&fx))
      .await
      .expect("pipeline should succeed");
    assert!(result.is_empty());
  }

  #[tokio::test]
  async fn test_missing_commits_file_fails() {
    let fx = Fixture::new();
    let mut inputs = inputs(&fx);
    inputs.commits = fx.missing("commits.csv.gz");

    let err = top_repos_by_commits(&request(2), inputs)
      .await
      .expect_err("missing file must fail");
    assert!(matches!(err, PipelineError::Stream(StreamError::Open { .. })));
  }

  #[tokio::test]
  async fn test_bounded_result_matches_full_sort() {
    let fx = Fixture::new();
    let mut events = Vec::new();
    let mut commits = Vec::new();
    let mut repos = Vec::new();
    let mut expected = Vec::new();

    // repo i gets (i * 7) % 13 commits; several repos share each count
    for i in 0..60u64 {
      events.push(format!("ev{i},PushEvent,actor{i},repo{i}"));
      repos.push(format!("repo{i},name{i}"));
      let n = (i * 7) % 13;
      for c in 0..n {
        commits.push(format!("sha{i}-{c},message,ev{i}"));
      }
      expected.push(n);
    }
    let inputs = CommitInputs {
      events: fx.write_owned("events.csv", &events),
      commits: fx.write_owned("commits.csv", &commits),
      repos: fx.write_owned("repos.csv", &repos),
    };

    let k = 7;
    let result = top_repos_by_commits(&request(k), inputs)
      .await
      .expect("pipeline should succeed");

    expected.sort_unstable_by(|a, b| b.cmp(a));
    expected.truncate(k);
    let values: Vec<u64> = result.iter().map(|e| e.value).collect();

    assert_eq!(result.len(), k);
    assert_descending(&result);
    // Tied keys may differ between runs, the values may not
    assert_eq!(values, expected);
    assert!(result.iter().all(|e| e.key.starts_with("name")));
  }

  #[tokio::test]
  async fn test_rerun_gives_same_multiset() {
    let fx = Fixture::new();
    let first = top_repos_by_commits(&request(10), inputs(&fx)).await.expect("first run");
    let second = top_repos_by_commits(&request(10), inputs(&fx)).await.expect("second run");
    assert_eq!(sorted(first), sorted(second));
  }
}

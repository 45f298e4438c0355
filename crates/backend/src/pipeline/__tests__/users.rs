//! Top-K users by PRs and commits, end to end.

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use crate::{
    actor::StreamError,
    pipeline::{
      __tests__::helpers::{Fixture, assert_descending, entry, request, sorted},
      PipelineError, UserInputs, top_users_by_commits,
    },
  };

  fn inputs(fx: &Fixture) -> UserInputs {
    let events = fx.write(
      "events.csv",
      &[
        "e1,PushEvent,u1,r1",
        "e2,CreateEvent,u1,r1",
        "e3,PushEvent,u2,r2",
        "e4,PushEvent,u3,r3",
        "e5,WatchEvent,u4,r1",
        "e6,CreateEvent,u5,r2",
        "e7,PushEvent,u6,r4",
        "bad,line",
      ],
    );
    let commits = fx.write(
      "commits.csv",
      &[
        "c1,msg,e1",
        "c2,msg,e1",
        "c3,msg,e2",
        "c4,msg,e1",
        "c5,e2",
        "c6,msg,e3",
        "c7,msg,e3",
        "c8,msg,e3",
        "c9,msg,e3",
        "c10,msg,e4",
        "c11,msg,e4",
        "c12,msg,e4",
        "c13,msg,e5",
        "c14,msg,e5",
        "c15,msg,e7",
      ],
    );
    let actors = fx.write(
      "actors.csv",
      &["u1,Apexal", "u2,anggi1234", "u3,onosendi", "u4,watcher", "u5,idle", "u6,tail", "garbage"],
    );
    UserInputs { events, commits, actors }
  }

  #[tokio::test]
  async fn test_top_three_users() {
    let fx = Fixture::new();
    let result = top_users_by_commits(&request(3), inputs(&fx))
      .await
      .expect("pipeline should succeed");

    assert_eq!(
      result,
      vec![entry("Apexal", 5), entry("anggi1234", 4), entry("onosendi", 3)]
    );
  }

  #[tokio::test]
  async fn test_zero_count_actors_are_not_ranked() {
    let fx = Fixture::new();
    let result = top_users_by_commits(&request(10), inputs(&fx))
      .await
      .expect("pipeline should succeed");

    // u4 only has a watch event and u5 a create event with no commits
    assert_eq!(
      result,
      vec![
        entry("Apexal", 5),
        entry("anggi1234", 4),
        entry("onosendi", 3),
        entry("tail", 1),
      ]
    );
  }

  #[tokio::test]
  async fn test_unknown_actor_is_dropped() {
    let fx = Fixture::new();
    let mut inputs = inputs(&fx);
    inputs.actors = fx.write("actors-partial.csv", &["u1,Apexal", "u3,onosendi"]);

    let result = top_users_by_commits(&request(3), inputs)
      .await
      .expect("unknown actors must not fail the run");
    // u2 and u6 have commits but no username
    assert_eq!(result, vec![entry("Apexal", 5), entry("onosendi", 3)]);
  }

  #[tokio::test]
  async fn test_missing_actors_file_fails() {
    let fx = Fixture::new();
    let mut inputs = inputs(&fx);
    inputs.actors = fx.missing("actors.csv.missing");

    let err = top_users_by_commits(&request(3), inputs)
      .await
      .expect_err("missing file must fail");
    assert!(matches!(err, PipelineError::Stream(StreamError::Open { .. })));
  }

  #[tokio::test]
  async fn test_ties_are_compared_as_multiset() {
    let fx = Fixture::new();
    let events = fx.write(
      "events.csv",
      &["e1,PushEvent,u1,r1", "e2,PushEvent,u2,r1", "e3,PushEvent,u3,r1"],
    );
    let commits = fx.write("commits.csv", &["c1,e1", "c2,e2", "c3,e3", "c4,e3"]);
    let actors = fx.write("actors.csv", &["u1,alice", "u2,bob", "u3,carol"]);

    let result = top_users_by_commits(&request(3), UserInputs { events, commits, actors })
      .await
      .expect("pipeline should succeed");

    assert_descending(&result);
    assert_eq!(result[0], entry("carol", 2));
    assert_eq!(
      sorted(result[1..].to_vec()),
      vec![entry("alice", 1), entry("bob", 1)]
    );
  }
}

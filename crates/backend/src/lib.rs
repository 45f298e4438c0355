pub mod actor;
pub mod pipeline;
pub mod ranking;

mod domain;
pub use domain::{config, record};

pub use pipeline::{
  CommitInputs, EventInputs, PipelineError, PipelineOptions, PipelineRequest, UserInputs, top_repos_by_commits,
  top_repos_by_events, top_users_by_commits,
};
pub use ranking::{BoundedRanking, RankedEntry};

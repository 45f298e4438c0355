//! Positional record shapes for the CSV inputs.
//!
//! No quoting or escaping is supported. A line with the wrong number of fields
//! for its shape parses to `None` and the caller skips it.

/// `event_id,event_type,actor_id,repo_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord<'a> {
  pub id: &'a str,
  pub kind: &'a str,
  pub actor_id: &'a str,
  pub repo_id: &'a str,
}

impl<'a> EventRecord<'a> {
  pub const FIELDS: usize = 4;

  pub fn parse(line: &'a str) -> Option<Self> {
    let mut fields = line.split(',');
    let record = Self {
      id: fields.next()?,
      kind: fields.next()?,
      actor_id: fields.next()?,
      repo_id: fields.next()?,
    };
    fields.next().is_none().then_some(record)
  }
}

/// `id,name`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoRecord<'a> {
  pub id: &'a str,
  pub name: &'a str,
}

impl<'a> RepoRecord<'a> {
  pub const FIELDS: usize = 2;

  pub fn parse(line: &'a str) -> Option<Self> {
    let (id, name) = split_pair(line)?;
    Some(Self { id, name })
  }
}

/// `id,username`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorRecord<'a> {
  pub id: &'a str,
  pub username: &'a str,
}

impl<'a> ActorRecord<'a> {
  pub const FIELDS: usize = 2;

  pub fn parse(line: &'a str) -> Option<Self> {
    let (id, username) = split_pair(line)?;
    Some(Self { id, username })
  }
}

/// The event id a commit line refers to.
///
/// Commit lines have a variable number of fields (messages may contain
/// commas), so only the trailing field is trusted.
pub fn commit_event_id(line: &str) -> &str {
  line.rsplit(',').next().unwrap_or(line)
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
  let (first, second) = line.split_once(',')?;
  if second.contains(',') {
    return None;
  }
  Some((first, second))
}

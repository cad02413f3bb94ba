//! Snapshot projection: flat code → value mapping to the nested domain shape.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
  schema::{Field, Group, Node, ProjectionSchema},
  stat::UserSnapshot,
};

/// The nested object produced by [`ProjectionSchema::project`].
///
/// Keys are kept in sorted order, so serialising the same projection twice
/// yields identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectedSnapshot(Map<String, Value>);

impl ProjectedSnapshot {
  /// Look up a value by dotted path, e.g. `general.kills_and_deaths.kills`.
  pub fn get(&self, path: &str) -> Option<&Value> {
    let mut segments = path.split('.');
    let mut current = self.0.get(segments.next()?)?;
    for segment in segments {
      current = current.as_object()?.get(segment)?;
    }
    Some(current)
  }

  pub fn as_map(&self) -> &Map<String, Value> { &self.0 }

  pub fn into_value(self) -> Value { Value::Object(self.0) }
}

impl ProjectionSchema {
  /// Project `snapshot` through this schema.
  ///
  /// Every schema path is present in the output. Codes missing from the
  /// snapshot read as zero; codes the schema does not reference are ignored.
  pub fn project(&self, snapshot: &UserSnapshot) -> ProjectedSnapshot {
    ProjectedSnapshot(project_group(&self.root, snapshot))
  }
}

fn project_group(group: &Group, snapshot: &UserSnapshot) -> Map<String, Value> {
  group
    .iter()
    .map(|(key, node)| {
      let value = match node {
        Node::Field(field) => project_field(field, snapshot),
        Node::Group(child) => Value::Object(project_group(child, snapshot)),
      };
      (key.clone(), value)
    })
    .collect()
}

fn project_field(field: &Field, snapshot: &UserSnapshot) -> Value {
  match field {
    // `as` saturates and maps NaN to zero.
    Field::Count(code) => Value::from(snapshot.get(code).trunc() as i64),
    Field::Hours(code) => Value::from(snapshot.get(code) / 3600.0),
  }
}

//! Query reconstruction
//!
//! Turns a captured [`Context`] into the ordered list of queries a live
//! recommender session would have issued while the developer was typing.

use serde::{Deserialize, Serialize};

use crate::event::{Context, ObjectOrigin, SurroundingExpression};

/// Everything the recommender knows about one invocation site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub receiver_type: String,
    pub required_type: Option<String>,
    pub object_origin: ObjectOrigin,
    pub surrounding_expression: SurroundingExpression,
    pub enclosing_method_return_type: String,
    pub enclosing_method_parameter_size: usize,
    pub enclosing_method_parameters: Vec<String>,
    pub enclosing_method_super: Option<String>,
}

/// A reconstructed query paired with what its site actually invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySelection {
    pub query: Query,
    /// Method identifier chosen at this site; absent when unresolved
    pub selection: Option<String>,
}

/// Recomputes candidate queries from a context
pub trait QueryReconstructor: Send + Sync {
    /// Queries in chronological reconstruction order
    fn reconstruct(&self, context: &Context) -> Vec<QuerySelection>;
}

/// Default reconstructor: one query per recorded invocation
///
/// Enclosing-method features are shared by every query of a context; the
/// invocation contributes receiver, required type, origin and surrounding
/// expression.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextProcessor;

impl ContextProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl QueryReconstructor for ContextProcessor {
    fn reconstruct(&self, context: &Context) -> Vec<QuerySelection> {
        let enclosing = context.enclosing_method.clone().unwrap_or_default();

        context
            .invocations
            .iter()
            .map(|inv| QuerySelection {
                query: Query {
                    receiver_type: inv.receiver_type.clone(),
                    required_type: inv.required_type.clone(),
                    object_origin: inv.object_origin,
                    surrounding_expression: inv.surrounding_expression,
                    enclosing_method_return_type: enclosing.return_type.clone(),
                    enclosing_method_parameter_size: enclosing.parameters.len(),
                    enclosing_method_parameters: enclosing.parameters.clone(),
                    enclosing_method_super: enclosing.super_method.clone(),
                },
                selection: inv.method.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EnclosingMethod, Invocation};

    #[test]
    fn test_reconstruct_one_query_per_invocation() {
        let context = Context {
            enclosing_type: Some("App".into()),
            enclosing_method: Some(EnclosingMethod {
                name: "run".into(),
                return_type: "void".into(),
                parameters: vec!["String".into(), "int".into()],
                super_method: Some("Base.run".into()),
            }),
            invocations: vec![
                Invocation {
                    receiver_type: "List".into(),
                    required_type: Some("int".into()),
                    object_origin: ObjectOrigin::Local,
                    surrounding_expression: SurroundingExpression::Assignment,
                    method: Some("List.size()".into()),
                },
                Invocation {
                    receiver_type: "Map".into(),
                    method: None,
                    ..Default::default()
                },
            ],
        };

        let qs = ContextProcessor::new().reconstruct(&context);
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[0].selection.as_deref(), Some("List.size()"));
        assert_eq!(qs[0].query.receiver_type, "List");
        assert_eq!(qs[0].query.enclosing_method_parameter_size, 2);
        assert_eq!(qs[0].query.enclosing_method_super.as_deref(), Some("Base.run"));
        assert_eq!(qs[1].selection, None);
        assert_eq!(qs[1].query.enclosing_method_return_type, "void");
    }

    #[test]
    fn test_reconstruct_without_enclosing_method() {
        let context = Context {
            invocations: vec![Invocation {
                receiver_type: "Foo".into(),
                method: Some("Foo.bar()".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let qs = ContextProcessor.reconstruct(&context);
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].query.enclosing_method_parameter_size, 0);
        assert!(qs[0].query.enclosing_method_parameters.is_empty());
    }

    #[test]
    fn test_reconstruct_empty_context() {
        assert!(ContextProcessor.reconstruct(&Context::default()).is_empty());
    }
}

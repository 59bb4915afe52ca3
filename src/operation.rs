//! operation helper
//!
//! ties a fixed graphql document to its variables and response shapes.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// graphql operation contract.
///
/// every query and mutation the resource clients send is one implementor,
/// so a schema change on the server means updating the matching impl.
pub trait Operation {
    /// root field of the response `data` object
    const FIELD: &'static str;
    /// graphql query or mutation string
    const QUERY: &'static str;
    /// variables payload sent with the document
    type Variables: Serialize;
    /// type of the root field's value
    type Response: DeserializeOwned;
}

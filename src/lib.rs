//! litmus chaos control plane client
//!
//! this crate provides a small, blocking, typed client for the litmuschaos
//! chaos center. start with [`Client`] and [`ClientConfig`]: the client logs
//! in once and exposes one resource client per domain area (projects,
//! environments, experiments, infrastructure, probes). everything except
//! login and project bootstrap goes through a single graphql endpoint via
//! [`Executor`].
//!
//! ## quick start
//!
//! ```no_run
//! use litmus::{Client, ClientConfig, ListExperimentRequest};
//!
//! # fn example() -> Result<(), litmus::Error> {
//! let client = Client::new(ClientConfig::from_env())?;
//! let experiments = client.experiments().list(ListExperimentRequest::default())?;
//! for experiment in experiments.experiments {
//!     println!("{} {}", experiment.experiment_id, experiment.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## errors
//!
//! every failure is an [`Error`]; [`Error::kind`] classifies it through any
//! context added along the way. when the server returns several graphql
//! errors only the first message is reported.

mod auth;
mod client;
mod config;
mod credentials;
mod error;
mod executor;
mod graphql;
mod operation;
mod pagination;
pub mod queries;
mod resources;
mod rest;
mod transport;

pub use auth::{authenticate, Authenticator};
pub use client::Client;
pub use config::{ClientConfig, DEFAULT_AUTH_PATH, DEFAULT_GRAPHQL_PATH};
pub use credentials::Credentials;
pub use error::{Error, ErrorKind, Result, ResultExt};
pub use executor::Executor;
pub use graphql::{GraphQlError, GraphQlLocation, GraphQlRequest, GraphQlResponse};
pub use operation::Operation;
pub use pagination::{Page, Pagination, Paginator};
pub use resources::*;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

//! Google BigQuery source
//!
//! Talks to the BigQuery v2 REST API with `reqwest`. Authentication is a
//! bearer token taken from `bigquery.access_token`; when it is absent the
//! requests go out unauthenticated and the API's 401 is reported as an
//! authorization error.

pub mod client;
pub mod models;
pub mod source;

pub use client::BigQueryClient;
pub use source::BigQuerySource;

pub mod executor;
pub mod hivesql_client;

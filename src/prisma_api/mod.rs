//! Prisma Cloud CSPM REST client.
//!
//! Only the handful of endpoints the billing report needs:
//! - `POST /login` to trade an access key / secret key for a session token
//! - `GET /cloud/group` to list account groups
//! - `POST /license/api/v1/usage/time_series` for credit usage per time bucket

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
pub mod test_server;

pub use client::{PrismaClient, UsageApi};
pub use error::ApiError;
pub use types::{AccountGroup, Token, UsageQuery, UsageResponse, UsageSeries};
